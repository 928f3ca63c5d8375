//! Provider construction from configuration.

use crate::gemini::GeminiProvider;
use arabot_config::{AppConfig, ModelBackend};
use arabot_core::credentials::AccessTokenSource;
use arabot_core::error::ProviderError;
use arabot_core::provider::Provider;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured model provider.
///
/// The Vertex backend needs a project; the public API backend needs a key.
pub fn build_from_config(
    config: &AppConfig,
    tokens: Arc<dyn AccessTokenSource>,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let timeout = Duration::from_secs(config.model.request_timeout_secs);
    let base_url = config.model.api_base.as_deref();

    let provider = match config.model.backend {
        ModelBackend::Vertex => {
            let project = config.gcp.project.clone().ok_or_else(|| {
                ProviderError::NotConfigured(
                    "vertex backend needs gcp.project (or GOOGLE_CLOUD_PROJECT)".into(),
                )
            })?;
            GeminiProvider::vertex(project, &config.gcp.location, tokens, base_url, timeout)?
        }
        ModelBackend::Gemini => {
            let api_key = config.model.api_key.clone().ok_or_else(|| {
                ProviderError::NotConfigured(
                    "gemini backend needs model.api_key (or GEMINI_API_KEY)".into(),
                )
            })?;
            GeminiProvider::api_key(api_key, base_url, timeout)?
        }
    };

    tracing::info!(
        provider = provider.name(),
        model = %config.model.model_id,
        "Model provider ready"
    );
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcp_auth::StaticTokenSource;

    fn tokens() -> Arc<dyn AccessTokenSource> {
        Arc::new(StaticTokenSource::new("t"))
    }

    #[test]
    fn vertex_without_project_is_not_configured() {
        let config = AppConfig::default();
        let err = build_from_config(&config, tokens()).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn vertex_with_project_builds() {
        let mut config = AppConfig::default();
        config.gcp.project = Some("proj".into());
        let provider = build_from_config(&config, tokens()).unwrap();
        assert_eq!(provider.name(), "vertex");
    }

    #[test]
    fn api_key_backend_builds() {
        let mut config = AppConfig::default();
        config.model.backend = ModelBackend::Gemini;
        assert!(build_from_config(&config, tokens()).is_err());

        config.model.api_key = Some("key".into());
        let provider = build_from_config(&config, tokens()).unwrap();
        assert_eq!(provider.name(), "gemini");
    }
}
