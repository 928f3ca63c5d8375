//! Message domain types.
//!
//! These are the request-scoped value objects that flow through the chat bot:
//! Webhook payload → `InboundMessage` → classifier (+ `HistoryMessage` snapshot,
//! `ExtractedContent` from pages) → prompt → model → reply.

use serde::{Deserialize, Serialize};

/// A message that triggered the bot, as delivered by the chat platform.
///
/// Missing payload fields are represented as empty strings or `None`; the
/// classifier never rejects a message for being malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Raw message text, mention markup included
    #[serde(default)]
    pub text: String,

    /// Channel the message was posted in
    #[serde(default)]
    pub channel_id: String,

    /// Thread anchor, when the message is a threaded reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,

    /// Platform user ID of the sender
    #[serde(default)]
    pub sender_id: String,

    /// Whether the sender is a bot
    #[serde(default)]
    pub is_bot: bool,

    /// Platform ID (timestamp) of this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Delivery ID used by the gateway for idempotency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl InboundMessage {
    /// Create a top-level channel message.
    pub fn new(channel_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            channel_id: channel_id.into(),
            ..Self::default()
        }
    }

    /// Builder: place this message in a thread.
    pub fn in_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Builder: set the platform message ID.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// The thread ID, treating an empty string as "not in a thread".
    pub fn thread(&self) -> Option<&str> {
        self.thread_id.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// A prior message in a thread or channel, flattened for prompt context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub text: String,

    pub is_from_bot: bool,

    /// Platform ID (timestamp), when the collaborator provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl HistoryMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_from_bot: false,
            message_id: None,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_from_bot: true,
            message_id: None,
        }
    }

    /// Builder: set the platform message ID.
    pub fn with_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }
}

/// Where a piece of extracted content came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum SourceLabel {
    /// Readable text scraped from this URL
    Url(String),
    /// The URL could not be scraped; the body is the raw message text
    ScrapeFailed(String),
    /// Message text used as-is
    PlainText,
}

/// Text taken from a message or a linked page, tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub source: SourceLabel,
    pub body: String,
}

impl ExtractedContent {
    pub fn scraped(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            source: SourceLabel::Url(url.into()),
            body: body.into(),
        }
    }

    pub fn scrape_failed(url: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            source: SourceLabel::ScrapeFailed(url.into()),
            body: raw_text.into(),
        }
    }

    pub fn plain(body: impl Into<String>) -> Self {
        Self {
            source: SourceLabel::PlainText,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_thread_id_is_not_a_thread() {
        let msg = InboundMessage::new("C1", "hi").in_thread("  ");
        assert_eq!(msg.thread(), None);

        let threaded = InboundMessage::new("C1", "hi").in_thread("1700000000.0001");
        assert_eq!(threaded.thread(), Some("1700000000.0001"));
    }

    #[test]
    fn inbound_message_tolerates_missing_fields() {
        let msg: InboundMessage = serde_json::from_str(r#"{"channel_id":"C1"}"#).unwrap();
        assert_eq!(msg.text, "");
        assert!(msg.thread_id.is_none());
        assert!(!msg.is_bot);
    }

    #[test]
    fn source_label_serialization() {
        let item = ExtractedContent::scraped("https://example.com", "body");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains(r#""kind":"url""#));
        assert!(json.contains("https://example.com"));

        let plain = serde_json::to_string(&ExtractedContent::plain("x")).unwrap();
        assert!(plain.contains("plain_text"));
    }
}
