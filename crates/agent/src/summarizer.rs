//! PDF summarizer.
//!
//! Triggered by an object-created event: download the PDF, extract its text,
//! ask the model for a summary, and write the summary next to the uploads.
//! Failures are written to an error-log object instead of being raised.

use arabot_config::PdfSummaryConfig;
use arabot_core::error::{ProviderError, StorageError};
use arabot_core::provider::{GenerationRequest, Provider};
use arabot_core::storage::{ObjectStore, StorageEvent};
use arabot_core::text::truncate_chars;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Pulls plain text out of document bytes.
pub type TextExtractor = fn(&[u8]) -> Result<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("download failed: {0}")]
    Download(StorageError),

    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("document contains no extractable text")]
    NoText,

    #[error("model call failed: {0}")]
    Model(#[from] ProviderError),

    #[error("upload failed: {0}")]
    Upload(StorageError),
}

/// Result of handling one storage event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Skipped { reason: String },
    Summarized { bucket: String, path: String },
    Failed { error_log_path: String, error: String },
}

pub struct PdfSummarizer {
    store: Arc<dyn ObjectStore>,
    provider: Arc<dyn Provider>,
    config: PdfSummaryConfig,
    template: String,
    model: String,
    extract: TextExtractor,
}

impl PdfSummarizer {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        provider: Arc<dyn Provider>,
        config: PdfSummaryConfig,
        template: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            store,
            provider,
            config,
            template: template.into(),
            model: model.into(),
            extract: pdf_text,
        }
    }

    /// Replace the PDF text extractor.
    pub fn with_extractor(mut self, extract: TextExtractor) -> Self {
        self.extract = extract;
        self
    }

    pub async fn handle(&self, event: StorageEvent) -> SummaryOutcome {
        let name = decode_object_name(&event.name);
        if let Some(reason) = self.skip_reason(&name) {
            info!(object = %name, reason = %reason, "Skipping object");
            return SummaryOutcome::Skipped { reason };
        }

        let Some(bucket) = self
            .config
            .bucket
            .clone()
            .filter(|b| !b.is_empty())
            .or_else(|| Some(event.bucket.clone()).filter(|b| !b.is_empty()))
        else {
            return SummaryOutcome::Skipped {
                reason: "no bucket configured or in event".into(),
            };
        };

        info!(bucket = %bucket, object = %name, "Summarizing PDF");
        match self.summarize(&bucket, &name).await {
            Ok(path) => {
                info!(bucket = %bucket, path = %path, "Summary written");
                SummaryOutcome::Summarized { bucket, path }
            }
            Err(e) => {
                error!(bucket = %bucket, object = %name, error = %e, "PDF summary failed");
                let error_log_path = error_log_path(&self.config.error_log_folder, &name);
                let log = format!("파일: {name}\n오류: {e}\n");
                if let Err(write_err) = self
                    .store
                    .upload(&bucket, &error_log_path, log.into_bytes(), TEXT_CONTENT_TYPE)
                    .await
                {
                    error!(path = %error_log_path, error = %write_err, "Could not write error log");
                }
                SummaryOutcome::Failed {
                    error_log_path,
                    error: e.to_string(),
                }
            }
        }
    }

    fn skip_reason(&self, name: &str) -> Option<String> {
        if !name.ends_with(".pdf") {
            return Some("not a PDF".into());
        }
        let own_output = [&self.config.summary_folder, &self.config.error_log_folder]
            .into_iter()
            .any(|folder| !folder.is_empty() && name.starts_with(folder.as_str()));
        if own_output {
            return Some("inside an output folder".into());
        }
        if !self.config.folder.is_empty() && !name.starts_with(self.config.folder.as_str()) {
            return Some(format!("outside watched folder '{}'", self.config.folder));
        }
        None
    }

    async fn summarize(&self, bucket: &str, name: &str) -> Result<String, SummaryError> {
        let bytes = self
            .store
            .download(bucket, name)
            .await
            .map_err(SummaryError::Download)?;
        debug!(object = %name, bytes = bytes.len(), "Downloaded PDF");

        let extract = self.extract;
        let text = tokio::task::spawn_blocking(move || extract(&bytes))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    SummaryError::Extraction("parser panicked".into())
                } else {
                    SummaryError::Extraction(e.to_string())
                }
            })?
            .map_err(SummaryError::Extraction)?;
        if text.trim().is_empty() {
            return Err(SummaryError::NoText);
        }
        debug!(object = %name, chars = text.chars().count(), "Extracted PDF text");

        let prompt = self
            .template
            .replace("{text}", truncate_chars(&text, self.config.max_input_chars));
        let request =
            GenerationRequest::new(&self.model, prompt).with_config(self.config.generation.clone());
        let summary = self.provider.generate(request).await?.text;

        let path = summary_path(&self.config.summary_folder, name);
        self.store
            .upload(bucket, &path, summary.into_bytes(), TEXT_CONTENT_TYPE)
            .await
            .map_err(SummaryError::Upload)?;
        Ok(path)
    }
}

/// Default extractor backed by `pdf-extract`.
pub fn pdf_text(bytes: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string())
}

/// Decode an object name as delivered by the trigger (`+` means space).
pub fn decode_object_name(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

fn base_stem(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.strip_suffix(".pdf").unwrap_or(base)
}

/// `{summary_folder}{stem}_summary.txt`
pub fn summary_path(summary_folder: &str, name: &str) -> String {
    format!("{summary_folder}{}_summary.txt", base_stem(name))
}

/// `{error_log_folder}{stem}_error.log`
pub fn error_log_path(error_log_folder: &str, name: &str) -> String {
    format!("{error_log_folder}{}_error.log", base_stem(name))
}
