//! Google OAuth access-token sources.
//!
//! On Cloud Run / Cloud Functions the metadata server hands out short-lived
//! tokens for the attached service account. Locally a static token (e.g.
//! from `gcloud auth print-access-token`) can be configured instead.

use arabot_core::credentials::{AccessToken, AccessTokenSource};
use arabot_core::error::CredentialError;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens are refreshed this long before they expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// A fixed token that never refreshes.
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenSource for StaticTokenSource {
    async fn access_token(&self) -> Result<AccessToken, CredentialError> {
        Ok(AccessToken::permanent(self.token.clone()))
    }
}

/// Fetches service-account tokens from the GCE metadata server and caches
/// them until shortly before expiry.
pub struct MetadataTokenSource {
    url: String,
    client: reqwest::Client,
    cached: Mutex<Option<AccessToken>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl MetadataTokenSource {
    pub fn new(metadata_host: &str) -> Result<Self, CredentialError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| CredentialError::Unavailable(e.to_string()))?;
        Ok(Self {
            url: format!("{}{TOKEN_PATH}", metadata_host.trim_end_matches('/')),
            client,
            cached: Mutex::new(None),
        })
    }

    async fn fetch(&self) -> Result<AccessToken, CredentialError> {
        let response = self
            .client
            .get(&self.url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| CredentialError::Unavailable(format!("metadata server: {e}")))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialError::TokenEndpoint { status, body });
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| CredentialError::Malformed(e.to_string()))?;

        debug!(expires_in = ?parsed.expires_in, "Fetched access token from metadata server");

        Ok(match parsed.expires_in {
            Some(secs) => AccessToken::expiring_in(parsed.access_token, Duration::from_secs(secs)),
            None => AccessToken::permanent(parsed.access_token),
        })
    }
}

#[async_trait]
impl AccessTokenSource for MetadataTokenSource {
    async fn access_token(&self) -> Result<AccessToken, CredentialError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(REFRESH_MARGIN)) {
            return Ok(token.clone());
        }
        let token = self.fetch().await?;
        *cached = Some(token.clone());
        Ok(token)
    }
}

/// Pick a token source from configuration: a configured static token wins,
/// otherwise the metadata server.
pub fn token_source_from_config(
    config: &arabot_config::GcpConfig,
) -> Result<Arc<dyn AccessTokenSource>, CredentialError> {
    match &config.access_token {
        Some(token) => Ok(Arc::new(StaticTokenSource::new(token.clone()))),
        None => Ok(Arc::new(MetadataTokenSource::new(&config.metadata_host)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn static_source_returns_configured_token() {
        let source = StaticTokenSource::new("ya29.local");
        assert_eq!(source.access_token().await.unwrap().token, "ya29.local");
    }

    #[tokio::test]
    async fn metadata_token_is_cached() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            TOKEN_PATH,
            get(move |headers: HeaderMap| {
                let counter = counter.clone();
                async move {
                    assert_eq!(headers.get("metadata-flavor").unwrap(), "Google");
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!({
                        "access_token": "ya29.meta",
                        "expires_in": 3599,
                        "token_type": "Bearer"
                    }))
                }
            }),
        );
        let host = serve(router).await;
        let source = MetadataTokenSource::new(&host).unwrap();

        assert_eq!(source.access_token().await.unwrap().token, "ya29.meta");
        assert_eq!(source.access_token().await.unwrap().token, "ya29.meta");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn metadata_error_status_is_reported() {
        let router = Router::new().route(
            TOKEN_PATH,
            get(|| async { (axum::http::StatusCode::NOT_FOUND, "no sa") }),
        );
        let host = serve(router).await;
        let source = MetadataTokenSource::new(&host).unwrap();

        let err = source.access_token().await.unwrap_err();
        assert!(matches!(err, CredentialError::TokenEndpoint { status: 404, .. }));
    }

    #[test]
    fn static_token_preferred_from_config() {
        let config = arabot_config::GcpConfig {
            access_token: Some("ya29.cfg".into()),
            ..Default::default()
        };
        assert!(token_source_from_config(&config).is_ok());
    }
}
