//! `arabot classify` — Show the rule a message would take.
//!
//! Runs only the text-level decision; no history or pages are fetched.

use arabot_agent::Intent;
use arabot_agent::classifier::decide;
use arabot_agent::strip_mentions;
use arabot_config::{AppConfig, ClassifierPolicy};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Decision {
    pub intent: Intent,
    pub stripped: String,
    pub urls: Vec<String>,
}

pub fn decision(policy: &ClassifierPolicy, text: &str, thread: Option<&str>) -> Decision {
    let stripped = strip_mentions(text);
    Decision {
        intent: decide(policy, stripped, thread),
        stripped: stripped.to_string(),
        urls: arabot_agent::extract_urls(stripped)
            .into_iter()
            .map(String::from)
            .collect(),
    }
}

pub fn run(text: &str, thread: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let result = decision(&config.classifier, text, thread);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
