//! Error types for the Arabot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator boundary has its own error enum.

use thiserror::Error;

/// The top-level error type for Arabot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Channel errors ---
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    // --- Scrape errors ---
    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // --- Credential errors ---
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model returned no text: {0}")]
    EmptyResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    #[error("History unavailable for {channel}: {reason}")]
    HistoryUnavailable { channel: String, reason: String },

    #[error("Message delivery failed to {channel}: {reason}")]
    DeliveryFailed { channel: String, reason: String },

    #[error("Platform API error in {method}: {error}")]
    Api { method: String, error: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}

/// A failed page fetch. Always recoverable: callers fall back to raw text.
#[derive(Debug, Clone, Error)]
pub enum ScrapeError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Timed out fetching {url} after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("No readable text at {0}")]
    EmptyContent(String),

    #[error("Failed to fetch {url}: {reason}")]
    Request { url: String, reason: String },
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Object not found: gs://{bucket}/{path}")]
    NotFound { bucket: String, path: String },

    #[error("Download failed for {path}: {reason}")]
    DownloadFailed { path: String, reason: String },

    #[error("Upload failed for {path}: {reason}")]
    UploadFailed { path: String, reason: String },

    #[error("Storage backend not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("No credentials available: {0}")]
    Unavailable(String),

    #[error("Token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("Malformed token response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn scrape_error_names_url() {
        let err = ScrapeError::Timeout {
            url: "https://example.com/a".into(),
            timeout_secs: 5,
        };
        assert!(err.to_string().contains("https://example.com/a"));
        assert!(err.to_string().contains("5s"));
    }

    #[test]
    fn storage_error_converts_into_top_level() {
        let err: Error = StorageError::NotFound {
            bucket: "docs".into(),
            path: "a.pdf".into(),
        }
        .into();
        assert!(err.to_string().contains("gs://docs/a.pdf"));
    }
}
