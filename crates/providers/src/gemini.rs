//! Gemini provider implementation.
//!
//! Talks to the `generateContent` endpoint through one of two front doors:
//! - Vertex AI: `https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:generateContent`
//!   with an OAuth bearer token.
//! - Generative Language API: `https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent?key=...`
//!
//! Both accept and return the same JSON body, so only URL and auth differ.

use arabot_core::credentials::AccessTokenSource;
use arabot_core::error::ProviderError;
use arabot_core::provider::*;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// How requests are authenticated and where they are sent.
enum Endpoint {
    Vertex {
        base_url: String,
        project: String,
        location: String,
        tokens: Arc<dyn AccessTokenSource>,
    },
    ApiKey {
        base_url: String,
        api_key: String,
    },
}

/// A Gemini model provider.
pub struct GeminiProvider {
    name: String,
    endpoint: Endpoint,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Vertex AI provider. `base_url` defaults to the regional endpoint.
    pub fn vertex(
        project: impl Into<String>,
        location: impl Into<String>,
        tokens: Arc<dyn AccessTokenSource>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let location = location.into();
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{location}-aiplatform.googleapis.com/v1"));
        Ok(Self {
            name: "vertex".into(),
            endpoint: Endpoint::Vertex {
                base_url,
                project: project.into(),
                location,
                tokens,
            },
            client: build_client(timeout)?,
        })
    }

    /// Generative Language API provider keyed by an API key.
    pub fn api_key(
        api_key: impl Into<String>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            name: "gemini".into(),
            endpoint: Endpoint::ApiKey {
                base_url: base_url
                    .unwrap_or(GEMINI_API_BASE)
                    .trim_end_matches('/')
                    .to_string(),
                api_key: api_key.into(),
            },
            client: build_client(timeout)?,
        })
    }

    fn generate_url(&self, model: &str) -> String {
        match &self.endpoint {
            Endpoint::Vertex {
                base_url,
                project,
                location,
                ..
            } => format!(
                "{base_url}/projects/{project}/locations/{location}/publishers/google/models/{model}:generateContent"
            ),
            Endpoint::ApiKey { base_url, .. } => {
                format!("{base_url}/models/{model}:generateContent")
            }
        }
    }

    /// Convert our request into the Gemini wire body.
    fn to_api_request(request: &GenerationRequest) -> ApiRequest {
        ApiRequest {
            contents: vec![ApiContent {
                role: "user".into(),
                parts: vec![ApiPart {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: request.system_instruction.as_ref().map(|s| ApiSystemInstruction {
                parts: vec![ApiPart { text: s.clone() }],
            }),
            generation_config: ApiGenerationConfig {
                max_output_tokens: request.config.max_output_tokens,
                temperature: request.config.temperature,
                top_p: request.config.top_p,
                top_k: request.config.top_k,
            },
        }
    }

    /// Pull the generated text out of a response body.
    ///
    /// Text parts of the first candidate are concatenated. A response with no
    /// text (safety block, empty candidate list) is an error.
    fn from_api_response(
        response: ApiResponse,
        requested_model: &str,
    ) -> Result<GenerationResponse, ProviderError> {
        let candidate = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                let reason = response
                    .prompt_feedback
                    .and_then(|f| f.block_reason)
                    .unwrap_or_else(|| "no candidates".into());
                ProviderError::EmptyResponse(reason)
            })?;

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse(
                candidate
                    .finish_reason
                    .unwrap_or_else(|| "empty text".into()),
            ));
        }

        let usage = response.usage_metadata.map(|u| {
            let prompt = u.prompt_token_count.unwrap_or(0);
            let completion = u.candidates_token_count.unwrap_or(0);
            Usage {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: u.total_token_count.unwrap_or(prompt + completion),
            }
        });

        Ok(GenerationResponse {
            text,
            model: response
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            usage,
        })
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))
}

#[async_trait]
impl arabot_core::Provider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationResponse, ProviderError> {
        let url = self.generate_url(&request.model);
        let body = Self::to_api_request(&request);

        debug!(
            provider = %self.name,
            model = %request.model,
            prompt_chars = request.prompt.chars().count(),
            "Sending generateContent request"
        );

        let mut builder = self.client.post(&url).json(&body);
        builder = match &self.endpoint {
            Endpoint::Vertex { tokens, .. } => {
                let token = tokens
                    .access_token()
                    .await
                    .map_err(|e| ProviderError::AuthenticationFailed(e.to_string()))?;
                builder.bearer_auth(token.token)
            }
            Endpoint::ApiKey { api_key, .. } => builder.query(&[("key", api_key)]),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(e.to_string())
            } else {
                ProviderError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(5);
            return Err(ProviderError::RateLimited { retry_after_secs });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid credentials or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gemini returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        Self::from_api_response(api_response, &request.model)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        match &self.endpoint {
            Endpoint::Vertex { tokens, .. } => Ok(tokens.access_token().await.is_ok()),
            Endpoint::ApiKey { base_url, api_key } => {
                let response = self
                    .client
                    .get(format!("{base_url}/models"))
                    .query(&[("key", api_key)])
                    .send()
                    .await
                    .map_err(|e| ProviderError::Network(e.to_string()))?;
                Ok(response.status().is_success())
            }
        }
    }
}

// --- Gemini API types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    contents: Vec<ApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiSystemInstruction>,
    generation_config: ApiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct ApiContent {
    role: String,
    parts: Vec<ApiPart>,
}

#[derive(Debug, Serialize)]
struct ApiSystemInstruction {
    parts: Vec<ApiPart>,
}

#[derive(Debug, Serialize)]
struct ApiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    candidates: Option<Vec<ApiCandidate>>,
    usage_metadata: Option<ApiUsage>,
    prompt_feedback: Option<ApiPromptFeedback>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCandidate {
    content: Option<ApiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseContent {
    #[serde(default)]
    parts: Vec<ApiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ApiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsage {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcp_auth::StaticTokenSource;
    use arabot_core::Provider;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    fn static_tokens() -> Arc<dyn AccessTokenSource> {
        Arc::new(StaticTokenSource::new("ya29.test"))
    }

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn vertex_url_layout() {
        let provider = GeminiProvider::vertex(
            "my-proj",
            "asia-northeast3",
            static_tokens(),
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            provider.generate_url("gemini-2.5-flash"),
            "https://asia-northeast3-aiplatform.googleapis.com/v1/projects/my-proj/locations/asia-northeast3/publishers/google/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(provider.name(), "vertex");
    }

    #[test]
    fn api_key_url_layout() {
        let provider = GeminiProvider::api_key("k", None, Duration::from_secs(5)).unwrap();
        assert_eq!(
            provider.generate_url("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_shape() {
        let request = GenerationRequest::new("m", "요약해줘").with_system_instruction("persona");
        let body = serde_json::to_value(GeminiProvider::to_api_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "요약해줘");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "persona");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 4096);
        assert_eq!(body["generationConfig"]["topK"], 40);
    }

    #[test]
    fn request_without_system_instruction_omits_field() {
        let body =
            serde_json::to_value(GeminiProvider::to_api_request(&GenerationRequest::new("m", "hi")))
                .unwrap();
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn response_parts_are_concatenated() {
        let raw = r#"{
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "world"}]}, "finishReason": "STOP"}],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 3, "totalTokenCount": 13},
            "modelVersion": "gemini-2.5-flash-001"
        }"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        let response = GeminiProvider::from_api_response(parsed, "gemini-2.5-flash").unwrap();
        assert_eq!(response.text, "Hello, world");
        assert_eq!(response.model, "gemini-2.5-flash-001");
        assert_eq!(response.usage.unwrap().total_tokens, 13);
    }

    #[test]
    fn blocked_prompt_is_empty_response() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        let err = GeminiProvider::from_api_response(parsed, "m").unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse(ref r) if r == "SAFETY"));
    }

    #[test]
    fn candidate_without_text_is_empty_response() {
        let raw = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            GeminiProvider::from_api_response(parsed, "m"),
            Err(ProviderError::EmptyResponse(_))
        ));
    }

    #[tokio::test]
    async fn vertex_generate_sends_bearer_token() {
        let router = Router::new().route(
            "/projects/p/locations/l/publishers/google/models/m:generateContent",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let prompt = body["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                Json(serde_json::json!({
                    "candidates": [{"content": {"parts": [{"text": format!("{auth}|{prompt}")}]}}]
                }))
            }),
        );
        let base = serve(router).await;

        let provider =
            GeminiProvider::vertex("p", "l", static_tokens(), Some(&base), Duration::from_secs(5))
                .unwrap();
        let response = provider
            .generate(GenerationRequest::new("m", "ping"))
            .await
            .unwrap();
        assert_eq!(response.text, "Bearer ya29.test|ping");
        assert_eq!(response.model, "m");
    }

    #[tokio::test]
    async fn status_codes_map_to_errors() {
        let router = Router::new()
            .route(
                "/models/limited:generateContent",
                post(|| async { StatusCode::TOO_MANY_REQUESTS }),
            )
            .route(
                "/models/denied:generateContent",
                post(|| async { StatusCode::FORBIDDEN }),
            )
            .route(
                "/models/broken:generateContent",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            );
        let base = serve(router).await;
        let provider = GeminiProvider::api_key("k", Some(&base), Duration::from_secs(5)).unwrap();

        let limited = provider
            .generate(GenerationRequest::new("limited", "x"))
            .await
            .unwrap_err();
        assert!(matches!(limited, ProviderError::RateLimited { .. }));

        let denied = provider
            .generate(GenerationRequest::new("denied", "x"))
            .await
            .unwrap_err();
        assert!(matches!(denied, ProviderError::AuthenticationFailed(_)));

        let broken = provider
            .generate(GenerationRequest::new("broken", "x"))
            .await
            .unwrap_err();
        assert!(matches!(
            broken,
            ProviderError::ApiError { status_code: 500, ref message } if message == "boom"
        ));
    }
}
