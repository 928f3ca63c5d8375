//! `arabot doctor` — Diagnose configuration and credentials.

use arabot_config::{AppConfig, ModelBackend, StorageBackend};

/// One finding: `Ok(label)` passes, `Err(label)` needs attention.
pub type Check = Result<String, String>;

/// Inspect a loaded configuration without touching the network.
pub fn checks(config: &AppConfig) -> Vec<Check> {
    let mut out = Vec::new();

    out.push(match config.model.backend {
        ModelBackend::Vertex => match &config.gcp.project {
            Some(p) => Ok(format!("Vertex AI project: {p} ({})", config.gcp.location)),
            None => Err("Vertex AI backend without a project — set GOOGLE_CLOUD_PROJECT".into()),
        },
        ModelBackend::Gemini => match &config.model.api_key {
            Some(_) => Ok("Gemini API key configured".into()),
            None => Err("Gemini backend without an API key — set GEMINI_API_KEY".into()),
        },
    });

    out.push(match &config.slack.bot_token {
        Some(_) => Ok("Slack bot token configured".into()),
        None => Err("No Slack bot token — /slack/events will be disabled (SLACK_BOT_TOKEN)".into()),
    });
    out.push(match &config.slack.signing_secret {
        Some(_) => Ok("Slack signing secret configured".into()),
        None => Err("No Slack signing secret — requests will NOT be verified".into()),
    });

    out.push(match (&config.storage.backend, &config.pdf_summary.bucket) {
        (StorageBackend::Local, _) => Ok(format!("Local storage at {}", config.storage.local_root)),
        (StorageBackend::Gcs, Some(b)) => Ok(format!("Cloud Storage bucket: {b}")),
        (StorageBackend::Gcs, None) => {
            Err("No BUCKET_NAME — the bucket from each event will be used".into())
        }
    });

    out
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Arabot Doctor — Configuration Diagnostics");
    println!("=========================================\n");

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ok    Config valid");
            config
        }
        Err(e) => {
            println!("  FAIL  Config invalid: {e}");
            return Err(e.into());
        }
    };

    let mut issues = 0;
    for check in checks(&config) {
        match check {
            Ok(msg) => println!("  ok    {msg}"),
            Err(msg) => {
                println!("  warn  {msg}");
                issues += 1;
            }
        }
    }

    println!();
    println!("  Chat model:    {}", config.model.model_id);
    println!("  Summary model: {}", config.model.summary_model());
    let g = &config.pdf_summary.generation;
    println!(
        "  Summary generation: max_tokens={} temperature={} top_p={} top_k={}",
        g.max_output_tokens, g.temperature, g.top_p, g.top_k
    );

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_flag_missing_credentials() {
        let failures = checks(&AppConfig::default())
            .into_iter()
            .filter(Result::is_err)
            .count();
        assert_eq!(failures, 4);
    }

    #[test]
    fn configured_credentials_pass() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| match key {
            "GEMINI_API_KEY" => Some("key".into()),
            "SLACK_BOT_TOKEN" => Some("xoxb-1".into()),
            "SLACK_SIGNING_SECRET" => Some("secret".into()),
            "BUCKET_NAME" => Some("docs".into()),
            _ => None,
        });
        assert!(checks(&config).iter().all(Result::is_ok));
    }
}
