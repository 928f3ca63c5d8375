//! HTTP page fetcher.

use crate::extract::readable_text;
use arabot_core::error::ScrapeError;
use arabot_core::fetch::PageFetcher;
use arabot_core::text::truncate_chars;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Fetches a page over HTTP and returns its readable text.
///
/// No retries: a timeout or error status is a scrape failure and the caller
/// falls back to the raw message text.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
    max_chars: usize,
}

impl HttpPageFetcher {
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        max_chars: usize,
    ) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ScrapeError::Request {
                url: String::new(),
                reason: format!("HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
            max_chars,
        })
    }

    pub fn from_config(config: &arabot_config::ScraperConfig) -> Result<Self, ScrapeError> {
        Self::new(
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
            config.max_chars,
        )
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ScrapeError::InvalidUrl {
            url: url.into(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScrapeError::InvalidUrl {
                url: url.into(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                ScrapeError::Timeout {
                    url: url.into(),
                    timeout_secs: self.timeout_secs,
                }
            } else {
                ScrapeError::Request {
                    url: url.into(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.into(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ScrapeError::Timeout {
                    url: url.into(),
                    timeout_secs: self.timeout_secs,
                }
            } else {
                ScrapeError::Request {
                    url: url.into(),
                    reason: e.to_string(),
                }
            }
        })?;

        let text = readable_text(&html);
        if text.is_empty() {
            return Err(ScrapeError::EmptyContent(url.into()));
        }

        let text = truncate_chars(&text, self.max_chars).to_string();
        debug!(url = %url, chars = text.chars().count(), "Scraped page");
        Ok(text)
    }
}
