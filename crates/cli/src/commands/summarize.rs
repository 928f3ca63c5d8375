//! `arabot summarize` — Summarize a local PDF.
//!
//! Runs the same pipeline as the storage trigger, against a local-disk store
//! rooted at the file's directory: the summary lands next to the PDF as
//! `{stem}_summary.txt` (or `{stem}_error.log` on failure).

use arabot_agent::{PdfSummarizer, SummaryOutcome};
use arabot_config::{AppConfig, PdfSummaryConfig};
use arabot_core::provider::Provider;
use arabot_core::storage::StorageEvent;
use arabot_storage::LocalStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The store bucket that maps to the store root itself.
const ROOT_BUCKET: &str = ".";

/// Build a summarizer that reads and writes inside `dir`.
pub fn local_summarizer(
    config: &AppConfig,
    provider: Arc<dyn Provider>,
    dir: &Path,
) -> PdfSummarizer {
    let pdf = PdfSummaryConfig {
        bucket: Some(ROOT_BUCKET.into()),
        folder: String::new(),
        summary_folder: String::new(),
        error_log_folder: String::new(),
        ..config.pdf_summary.clone()
    };
    PdfSummarizer::new(
        Arc::new(LocalStore::new(dir)),
        provider,
        pdf,
        config.prompts.pdf_summary_template.clone(),
        config.model.summary_model(),
    )
}

/// Split a file path into (directory, file name).
fn split(file: &Path) -> Result<(PathBuf, String), String> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("not a file path: {}", file.display()))?
        .to_string();
    let dir = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name))
}

/// Summarize one file; returns the summary file path.
pub async fn summarize_file(summarizer: &PdfSummarizer, dir: &Path, name: &str) -> Result<PathBuf, String> {
    let outcome = summarizer
        .handle(StorageEvent {
            bucket: ROOT_BUCKET.into(),
            name: urlencoding::encode(name).into_owned(),
            event_id: None,
        })
        .await;
    match outcome {
        SummaryOutcome::Summarized { path, .. } => Ok(dir.join(path)),
        SummaryOutcome::Skipped { reason } => Err(format!("skipped: {reason}")),
        SummaryOutcome::Failed {
            error,
            error_log_path,
        } => Err(format!(
            "{error} (log: {})",
            dir.join(error_log_path).display()
        )),
    }
}

pub async fn run(file: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if !file.is_file() {
        return Err(format!("no such file: {}", file.display()).into());
    }
    let (dir, name) = split(file)?;

    let tokens = arabot_providers::token_source_from_config(&config.gcp)?;
    let provider = arabot_providers::build_from_config(&config, tokens)?;
    let summarizer = local_summarizer(&config, provider, &dir);

    let summary_path = summarize_file(&summarizer, &dir, &name).await?;
    let summary = tokio::fs::read_to_string(&summary_path).await?;
    println!("{summary}");

    if let Some(out) = output {
        tokio::fs::write(out, &summary).await?;
        eprintln!("Summary written to {}", out.display());
    }
    eprintln!("Summary saved at {}", summary_path.display());
    Ok(())
}
