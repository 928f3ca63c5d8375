//! ChatPlatform trait — the abstraction over the chat service.
//!
//! The bot needs three things from a chat platform: the recent messages of a
//! channel, the messages of a thread, and a way to post a reply.

use crate::error::ChannelError;
use crate::message::HistoryMessage;
use async_trait::async_trait;

/// The chat platform collaborator.
///
/// History methods return messages in the order the platform delivers them;
/// callers rely on that order and never re-sort.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Human-readable platform name (e.g., "slack").
    fn name(&self) -> &str;

    /// Recent top-level messages of a channel, at most `limit`.
    async fn channel_history(
        &self,
        channel_id: &str,
        limit: usize,
    ) -> std::result::Result<Vec<HistoryMessage>, ChannelError>;

    /// All messages of a thread, starting with the thread anchor.
    async fn thread_replies(
        &self,
        channel_id: &str,
        thread_id: &str,
    ) -> std::result::Result<Vec<HistoryMessage>, ChannelError>;

    /// Post a message to a channel, optionally inside a thread.
    async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        thread_id: Option<&str>,
    ) -> std::result::Result<(), ChannelError>;

    /// Health check — are the credentials valid?
    async fn health_check(&self) -> std::result::Result<bool, ChannelError> {
        Ok(true)
    }
}
