//! Slack integration for Arabot.
//!
//! - [`SlackClient`] implements `arabot_core::ChatPlatform` over the Web API
//! - [`SignatureVerifier`] checks inbound request signatures
//! - [`events`] models the Events API payloads the gateway receives

pub mod events;
pub mod signature;
pub mod slack;

pub use events::{SlackEnvelope, SlackEvent};
pub use signature::{SignatureError, SignatureVerifier};
pub use slack::SlackClient;
