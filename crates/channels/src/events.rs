//! Slack Events API payloads.
//!
//! Only the two envelope types the bot acts on are modeled; everything else
//! deserializes to `SlackEnvelope::Other` and is acknowledged without action.

use arabot_core::message::InboundMessage;
use serde::Deserialize;

/// Slackbot posts as this pseudo-user.
pub const SLACKBOT_USER: &str = "USLACKBOT";

/// The outer body of an Events API request.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackEnvelope {
    /// Sent once when the request URL is configured.
    UrlVerification { challenge: String },

    EventCallback {
        #[serde(default)]
        event_id: Option<String>,
        event: SlackEvent,
    },

    #[serde(other)]
    Other,
}

/// The inner `event` object. Every field is optional in practice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
}

impl SlackEvent {
    pub fn is_app_mention(&self) -> bool {
        self.kind == "app_mention"
    }

    pub fn is_from_bot(&self) -> bool {
        is_bot_author(
            self.bot_id.as_deref(),
            self.user.as_deref(),
            self.subtype.as_deref(),
        )
    }

    /// Flatten into the domain message. Missing fields become empty values.
    pub fn into_inbound(self, event_id: Option<String>) -> InboundMessage {
        let is_bot = self.is_from_bot();
        InboundMessage {
            text: self.text.unwrap_or_default(),
            channel_id: self.channel.unwrap_or_default(),
            thread_id: self.thread_ts.filter(|t| !t.is_empty()),
            sender_id: self.user.unwrap_or_default(),
            is_bot,
            message_id: self.ts,
            event_id,
        }
    }
}

/// Whether a Slack message was written by a bot or Slackbot.
pub fn is_bot_author(bot_id: Option<&str>, user: Option<&str>, subtype: Option<&str>) -> bool {
    bot_id.is_some_and(|b| !b.is_empty())
        || user == Some(SLACKBOT_USER)
        || subtype == Some("bot_message")
}
