//! HTTP gateway for Arabot.
//!
//! Exposes the Slack Events API endpoint, the storage trigger endpoint and a
//! health check. Slack events are acknowledged immediately and answered on a
//! spawned task; storage events are summarized inline.
//!
//! Built on Axum.

pub mod dedup;

use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use arabot_agent::{ChatResponder, IntentClassifier, PdfSummarizer, PromptAssembler};
use arabot_channels::{SignatureVerifier, SlackClient, SlackEnvelope};
use arabot_config::AppConfig;
use arabot_core::storage::StorageEvent;
use arabot_fetch::HttpPageFetcher;
use dedup::DedupGuard;

/// Shared application state for the gateway.
pub struct AppState {
    /// `None` when no Slack bot token is configured
    pub responder: Option<Arc<ChatResponder>>,
    pub summarizer: Arc<PdfSummarizer>,
    /// `None` disables request signature checks
    pub verifier: Option<SignatureVerifier>,
    pub dedup: DedupGuard,
}

pub type SharedState = Arc<AppState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/slack/events", post(slack_events_handler))
        .route("/storage/events", post(storage_events_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Build the pipelines and their clients from configuration.
///
/// Every outside client is constructed once here and shared via `Arc`.
pub fn build_state(config: &AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let tokens = arabot_providers::token_source_from_config(&config.gcp)?;
    let provider = arabot_providers::build_from_config(config, tokens.clone())?;
    let store = arabot_storage::build_from_config(&config.storage, tokens)?;

    let responder = match config.slack.bot_token {
        Some(_) => {
            let platform = Arc::new(SlackClient::from_config(&config.slack)?);
            let fetcher = Arc::new(HttpPageFetcher::from_config(&config.scraper)?);
            let classifier =
                IntentClassifier::new(platform.clone(), fetcher, config.classifier.clone());
            let responder = ChatResponder::new(
                classifier,
                PromptAssembler::new(config.prompts.clone()),
                provider.clone(),
                platform,
                &config.model.model_id,
            )
            .with_generation(config.model.chat_generation.clone())
            .with_ignore_bots(config.slack.ignore_bot_messages);
            Some(Arc::new(responder))
        }
        None => {
            warn!("No Slack bot token configured; /slack/events is disabled");
            None
        }
    };

    let verifier = match &config.slack.signing_secret {
        Some(secret) => Some(SignatureVerifier::new(
            secret.clone(),
            config.slack.max_signature_age_secs,
        )),
        None => {
            warn!("No Slack signing secret configured; request signatures are NOT verified");
            None
        }
    };

    let summarizer = PdfSummarizer::new(
        store,
        provider,
        config.pdf_summary.clone(),
        config.prompts.pdf_summary_template.clone(),
        config.model.summary_model(),
    );

    Ok(AppState {
        responder,
        summarizer: Arc::new(summarizer),
        verifier,
        dedup: DedupGuard::new(Duration::from_secs(config.gateway.dedup_ttl_secs)),
    })
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = Arc::new(build_state(&config)?);
    let app = build_router(state, config.gateway.max_body_bytes);

    info!(addr = %addr, model = %config.model.model_id, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn slack_events_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Slack retries when the ack was slow; the first delivery is already being handled.
    if let Some(retry) = header(&headers, "X-Slack-Retry-Num") {
        debug!(retry = %retry, "Ignoring Slack retry");
        return StatusCode::OK.into_response();
    }

    if let Some(verifier) = &state.verifier {
        let verdict = verifier.verify(
            header(&headers, "X-Slack-Request-Timestamp"),
            header(&headers, "X-Slack-Signature"),
            &body,
            chrono::Utc::now().timestamp(),
        );
        if let Err(e) = verdict {
            warn!(error = %e, "Rejected Slack request");
            return (StatusCode::FORBIDDEN, "Invalid request").into_response();
        }
    }

    let envelope: SlackEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!(error = %e, "Unparseable Slack payload");
            return StatusCode::OK.into_response();
        }
    };

    match envelope {
        SlackEnvelope::UrlVerification { challenge } => challenge.into_response(),
        SlackEnvelope::EventCallback { event_id, event } if event.is_app_mention() => {
            let Some(responder) = state.responder.clone() else {
                return StatusCode::SERVICE_UNAVAILABLE.into_response();
            };
            if let Some(id) = event_id.as_deref() {
                if !state.dedup.first_seen(id) {
                    info!(event_id = %id, "Duplicate Slack event dropped");
                    return StatusCode::OK.into_response();
                }
            }

            let message = event.into_inbound(event_id);
            info!(
                channel = %message.channel_id,
                threaded = message.thread().is_some(),
                "Mention received"
            );
            tokio::spawn(async move {
                responder.handle(message).await;
            });
            StatusCode::OK.into_response()
        }
        _ => StatusCode::OK.into_response(),
    }
}

/// Object reference in a storage notification.
#[derive(Debug, Deserialize)]
struct ObjectRef {
    bucket: String,
    name: String,
}

/// A finalized-object notification, raw or wrapped in a CloudEvent.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoragePayload {
    CloudEvent { data: ObjectRef },
    Raw(ObjectRef),
}

impl StoragePayload {
    fn into_object(self) -> ObjectRef {
        match self {
            Self::CloudEvent { data } => data,
            Self::Raw(object) => object,
        }
    }
}

async fn storage_events_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let object = match serde_json::from_slice::<StoragePayload>(&body) {
        Ok(payload) => payload.into_object(),
        Err(e) => {
            warn!(error = %e, "Malformed storage notification");
            return (StatusCode::BAD_REQUEST, "expected {bucket, name}").into_response();
        }
    };

    let event_id = header(&headers, "ce-id").map(String::from);
    if let Some(id) = event_id.as_deref() {
        if !state.dedup.first_seen(id) {
            info!(event_id = %id, "Duplicate storage event dropped");
            return Json(serde_json::json!({ "status": "duplicate" })).into_response();
        }
    }

    let outcome = state
        .summarizer
        .handle(StorageEvent {
            bucket: object.bucket,
            name: object.name,
            event_id,
        })
        .await;
    Json(outcome).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arabot_config::{ClassifierPolicy, PdfSummaryConfig, PromptConfig};
    use arabot_core::channel::ChatPlatform;
    use arabot_core::error::{ChannelError, ProviderError, ScrapeError};
    use arabot_core::fetch::PageFetcher;
    use arabot_core::message::HistoryMessage;
    use arabot_core::provider::{GenerationRequest, GenerationResponse, Provider};
    use arabot_storage::InMemoryStore;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use tower::ServiceExt;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";

    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<GenerationResponse, ProviderError> {
            Ok(GenerationResponse {
                text: format!("echo: {}", request.prompt),
                model: request.model,
                usage: None,
            })
        }
    }

    #[derive(Default)]
    struct RecordingPlatform {
        posted: Mutex<Vec<(String, String, Option<String>)>>,
    }

    #[async_trait]
    impl ChatPlatform for RecordingPlatform {
        fn name(&self) -> &str {
            "recording"
        }

        async fn channel_history(
            &self,
            _channel_id: &str,
            _limit: usize,
        ) -> Result<Vec<HistoryMessage>, ChannelError> {
            Ok(Vec::new())
        }

        async fn thread_replies(
            &self,
            _channel_id: &str,
            _thread_id: &str,
        ) -> Result<Vec<HistoryMessage>, ChannelError> {
            Ok(Vec::new())
        }

        async fn post_message(
            &self,
            channel_id: &str,
            text: &str,
            thread_id: Option<&str>,
        ) -> Result<(), ChannelError> {
            self.posted.lock().unwrap().push((
                channel_id.to_string(),
                text.to_string(),
                thread_id.map(String::from),
            ));
            Ok(())
        }
    }

    struct NoPages;

    #[async_trait]
    impl PageFetcher for NoPages {
        async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
            Err(ScrapeError::EmptyContent(url.to_string()))
        }
    }

    struct Harness {
        state: SharedState,
        platform: Arc<RecordingPlatform>,
        store: InMemoryStore,
    }

    fn harness(verify: bool) -> Harness {
        let platform = Arc::new(RecordingPlatform::default());
        let provider: Arc<dyn Provider> = Arc::new(EchoProvider);
        let store = InMemoryStore::new();
        let classifier =
            IntentClassifier::new(platform.clone(), Arc::new(NoPages), ClassifierPolicy::default());
        let responder = ChatResponder::new(
            classifier,
            PromptAssembler::new(PromptConfig::default()),
            provider.clone(),
            platform.clone(),
            "gemini-2.5-flash",
        );
        let summarizer = PdfSummarizer::new(
            Arc::new(store.clone()),
            provider,
            PdfSummaryConfig::default(),
            "{text}",
            "gemini-2.5-flash",
        );
        let state = Arc::new(AppState {
            responder: Some(Arc::new(responder)),
            summarizer: Arc::new(summarizer),
            verifier: verify.then(|| SignatureVerifier::new(SECRET, 300)),
            dedup: DedupGuard::new(Duration::from_secs(600)),
        });
        Harness {
            state,
            platform,
            store,
        }
    }

    fn app(h: &Harness) -> Router {
        build_router(h.state.clone(), 1024 * 1024)
    }

    fn slack_request(body: &str) -> Request<Body> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = SignatureVerifier::new(SECRET, 300).sign(&timestamp, body.as_bytes());
        Request::builder()
            .method("POST")
            .uri("/slack/events")
            .header("content-type", "application/json")
            .header("X-Slack-Request-Timestamp", timestamp)
            .header("X-Slack-Signature", signature)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn mention(event_id: &str, text: &str) -> String {
        serde_json::json!({
            "type": "event_callback",
            "event_id": event_id,
            "event": {
                "type": "app_mention",
                "text": text,
                "user": "U123",
                "channel": "C1",
                "ts": "1700000000.000100"
            }
        })
        .to_string()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn wait_for_posts(platform: &RecordingPlatform, count: usize) {
        for _ in 0..100 {
            if platform.posted.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn health_endpoint() {
        let h = harness(true);
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app(&h).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn url_verification_echoes_challenge() {
        let h = harness(true);
        let body = r#"{"type":"url_verification","challenge":"3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P"}"#;

        let response = app(&h).oneshot(slack_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P"
        );
    }

    #[tokio::test]
    async fn bad_signature_is_forbidden() {
        let h = harness(true);
        let req = Request::builder()
            .method("POST")
            .uri("/slack/events")
            .header("X-Slack-Request-Timestamp", chrono::Utc::now().timestamp().to_string())
            .header("X-Slack-Signature", "v0=deadbeef")
            .body(Body::from(mention("Ev1", "hi")))
            .unwrap();

        let response = app(&h).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(response).await, "Invalid request");
    }

    #[tokio::test]
    async fn missing_signature_is_forbidden() {
        let h = harness(true);
        let req = Request::builder()
            .method("POST")
            .uri("/slack/events")
            .body(Body::from(mention("Ev1", "hi")))
            .unwrap();

        let response = app(&h).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn mention_is_acked_and_answered() {
        let h = harness(true);

        let response = app(&h)
            .oneshot(slack_request(&mention("Ev1", "<@U0BOT> 안녕!")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        wait_for_posts(&h.platform, 1).await;
        let posted = h.platform.posted.lock().unwrap().clone();
        assert_eq!(
            posted,
            vec![("C1".to_string(), "echo: 안녕!".to_string(), None)]
        );
    }

    #[tokio::test]
    async fn duplicate_event_is_processed_once() {
        let h = harness(true);
        let body = mention("EvDup", "<@U0BOT> 안녕!");

        for _ in 0..2 {
            let response = app(&h).oneshot(slack_request(&body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        wait_for_posts(&h.platform, 1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(h.platform.posted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn retries_are_acked_without_processing() {
        let h = harness(true);
        let mut req = slack_request(&mention("EvRetry", "<@U0BOT> 안녕!"));
        req.headers_mut()
            .insert("x-slack-retry-num", "1".parse().unwrap());

        let response = app(&h).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(h.platform.posted.lock().unwrap().is_empty());
        assert!(h.state.dedup.is_empty());
    }

    #[tokio::test]
    async fn garbage_body_is_acked() {
        let h = harness(true);
        let response = app(&h).oneshot(slack_request("not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn non_mention_events_are_ignored() {
        let h = harness(false);
        let body = serde_json::json!({
            "type": "event_callback",
            "event_id": "EvMsg",
            "event": { "type": "message", "text": "hello", "channel": "C1" }
        })
        .to_string();
        let req = Request::builder()
            .method("POST")
            .uri("/slack/events")
            .body(Body::from(body))
            .unwrap();

        let response = app(&h).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(h.platform.posted.lock().unwrap().is_empty());
    }

    fn storage_request(body: serde_json::Value, ce_id: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/storage/events")
            .header("content-type", "application/json");
        if let Some(id) = ce_id {
            builder = builder.header("ce-id", id);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn storage_event_skips_non_pdf() {
        let h = harness(false);
        let req = storage_request(
            serde_json::json!({ "bucket": "uploads", "name": "ai-pdf-folder/a.txt" }),
            None,
        );

        let response = app(&h).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "skipped");
    }

    #[tokio::test]
    async fn cloud_event_failure_reports_error_log() {
        let h = harness(false);
        h.store
            .insert("uploads", "ai-pdf-folder/bad.pdf", b"not a pdf".to_vec())
            .await;
        let req = storage_request(
            serde_json::json!({ "data": { "bucket": "uploads", "name": "ai-pdf-folder/bad.pdf" } }),
            Some("ce-1"),
        );

        let response = app(&h).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error_log_path"], "ai-pdf-folder/error_logs/bad_error.log");
        assert!(h
            .store
            .get("uploads", "ai-pdf-folder/error_logs/bad_error.log")
            .await
            .is_some());
    }

    #[tokio::test]
    async fn duplicate_storage_event_is_dropped() {
        let h = harness(false);
        let body = serde_json::json!({ "bucket": "uploads", "name": "ai-pdf-folder/x.txt" });

        let first = app(&h)
            .oneshot(storage_request(body.clone(), Some("ce-dup")))
            .await
            .unwrap();
        let second = app(&h)
            .oneshot(storage_request(body, Some("ce-dup")))
            .await
            .unwrap();

        assert!(body_text(first).await.contains("skipped"));
        assert!(body_text(second).await.contains("duplicate"));
    }

    #[tokio::test]
    async fn malformed_storage_event_is_rejected() {
        let h = harness(false);
        let req = storage_request(serde_json::json!({ "bucket": "uploads" }), None);

        let response = app(&h).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let h = harness(false);
        let router = build_router(h.state.clone(), 64);
        let req = storage_request(
            serde_json::json!({ "bucket": "uploads", "name": "x".repeat(200) }),
            None,
        );

        let response = router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
