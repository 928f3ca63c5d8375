//! PageFetcher trait — fetching readable text from a web page.

use crate::error::ScrapeError;
use async_trait::async_trait;

/// Fetches a URL and returns its readable text.
///
/// Implementations bound the request with a timeout and cap the returned text
/// at a fixed number of characters. Every failure is a `ScrapeError`, which
/// callers treat as non-fatal.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> std::result::Result<String, ScrapeError>;
}
