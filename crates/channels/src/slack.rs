//! Slack Web API client.
//!
//! Implements `ChatPlatform` over `conversations.history`,
//! `conversations.replies` and `chat.postMessage`. Slack answers HTTP 200
//! for most failures and reports them as `{"ok": false, "error": "..."}`, so
//! both layers are checked.

use crate::events::is_bot_author;
use arabot_core::channel::ChatPlatform;
use arabot_core::error::ChannelError;
use arabot_core::message::HistoryMessage;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Slack Web API client authenticated with a bot token.
pub struct SlackClient {
    api_base: String,
    bot_token: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    text: String,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    bot_id: Option<String>,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}

impl From<ApiMessage> for HistoryMessage {
    fn from(m: ApiMessage) -> Self {
        HistoryMessage {
            is_from_bot: is_bot_author(m.bot_id.as_deref(), m.user.as_deref(), m.subtype.as_deref()),
            text: m.text,
            message_id: m.ts,
        }
    }
}

impl SlackClient {
    pub fn new(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChannelError::NotConfigured(format!("HTTP client: {e}")))?;
        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            client,
        })
    }

    /// Build from the `[slack]` config section. Requires a bot token.
    pub fn from_config(config: &arabot_config::SlackConfig) -> Result<Self, ChannelError> {
        let token = config
            .bot_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ChannelError::NotConfigured("slack.bot_token (SLACK_BOT_TOKEN) is not set".into()))?;
        Self::new(
            &config.api_base,
            token,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    async fn get(&self, method: &str, query: &[(&str, &str)]) -> Result<ApiEnvelope, ChannelError> {
        let response = self
            .client
            .get(format!("{}/{method}", self.api_base))
            .bearer_auth(&self.bot_token)
            .query(query)
            .send()
            .await
            .map_err(|e| ChannelError::Network(e.to_string()))?;
        Self::read_envelope(method, response).await
    }

    async fn read_envelope(
        method: &str,
        response: reqwest::Response,
    ) -> Result<ApiEnvelope, ChannelError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::Api {
                method: method.into(),
                error: format!("HTTP {}", status.as_u16()),
            });
        }
        let envelope: ApiEnvelope = response.json().await.map_err(|e| ChannelError::Api {
            method: method.into(),
            error: format!("unreadable response: {e}"),
        })?;
        if !envelope.ok {
            return Err(ChannelError::Api {
                method: method.into(),
                error: envelope.error.unwrap_or_else(|| "unknown_error".into()),
            });
        }
        Ok(envelope)
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    fn name(&self) -> &str {
        "slack"
    }

    async fn channel_history(
        &self,
        channel_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryMessage>, ChannelError> {
        let limit = limit.to_string();
        let envelope = self
            .get(
                "conversations.history",
                &[("channel", channel_id), ("limit", &limit)],
            )
            .await
            .map_err(|e| ChannelError::HistoryUnavailable {
                channel: channel_id.into(),
                reason: e.to_string(),
            })?;
        debug!(channel = %channel_id, count = envelope.messages.len(), "Fetched channel history");
        Ok(envelope.messages.into_iter().map(HistoryMessage::from).collect())
    }

    async fn thread_replies(
        &self,
        channel_id: &str,
        thread_id: &str,
    ) -> Result<Vec<HistoryMessage>, ChannelError> {
        let envelope = self
            .get(
                "conversations.replies",
                &[("channel", channel_id), ("ts", thread_id)],
            )
            .await
            .map_err(|e| ChannelError::HistoryUnavailable {
                channel: channel_id.into(),
                reason: e.to_string(),
            })?;
        debug!(channel = %channel_id, thread = %thread_id, count = envelope.messages.len(), "Fetched thread");
        Ok(envelope.messages.into_iter().map(HistoryMessage::from).collect())
    }

    async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        thread_id: Option<&str>,
    ) -> Result<(), ChannelError> {
        let mut body = serde_json::json!({
            "channel": channel_id,
            "text": text,
        });
        if let Some(thread) = thread_id {
            body["thread_ts"] = serde_json::json!(thread);
        }

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(&self.bot_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::DeliveryFailed {
                channel: channel_id.into(),
                reason: e.to_string(),
            })?;

        Self::read_envelope("chat.postMessage", response)
            .await
            .map_err(|e| ChannelError::DeliveryFailed {
                channel: channel_id.into(),
                reason: e.to_string(),
            })?;

        info!(
            channel = %channel_id,
            thread = ?thread_id,
            content_len = text.len(),
            "Posted Slack message"
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, ChannelError> {
        let response = self
            .client
            .post(format!("{}/auth.test", self.api_base))
            .bearer_auth(&self.bot_token)
            .send()
            .await
            .map_err(|e| ChannelError::Network(e.to_string()))?;
        Ok(Self::read_envelope("auth.test", response).await.is_ok())
    }
}
