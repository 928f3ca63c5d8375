//! Intent classification.
//!
//! Maps one inbound message to exactly one [`Classification`] using ordered
//! rules:
//!
//! 1. **Thread**: the message is a threaded reply. The thread's messages
//!    become the conversation context.
//! 2. **News from history**: the text names a news/report topic *and* asks for
//!    analysis. Recent channel messages are mined for articles; the trigger's
//!    own URL is not scraped.
//! 3. **News from message**: the text is long or contains a URL. The text (or
//!    the pages it links to) is analyzed directly.
//! 4. **General**: everything else.
//!
//! The rule choice ([`decide`]) is IO-free. Only [`IntentClassifier::classify`]
//! talks to collaborators, and the only failure it propagates is missing
//! history.

use crate::mention::strip_mentions;
use crate::urls::{contains_url, extract_urls};
use arabot_config::ClassifierPolicy;
use arabot_core::channel::ChatPlatform;
use arabot_core::error::{ChannelError, ScrapeError};
use arabot_core::fetch::PageFetcher;
use arabot_core::message::{ExtractedContent, HistoryMessage, InboundMessage};
use arabot_core::text::char_len;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Which rule matched, before any collaborator is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Thread,
    NewsFromHistory,
    NewsFromMessage,
    General,
}

/// Where analyzed news content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsOrigin {
    ChannelHistory,
    MessageText,
}

/// The outcome of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    ThreadDiscussion {
        thread_id: String,
        history: Vec<HistoryMessage>,
        /// `"{role}: {content}"` lines in delivery order
        context: String,
    },
    NewsAnalysisRequest {
        origin: NewsOrigin,
        contents: Vec<ExtractedContent>,
    },
    GeneralConversation {
        text: String,
    },
}

impl Classification {
    pub fn intent(&self) -> Intent {
        match self {
            Self::ThreadDiscussion { .. } => Intent::Thread,
            Self::NewsAnalysisRequest {
                origin: NewsOrigin::ChannelHistory,
                ..
            } => Intent::NewsFromHistory,
            Self::NewsAnalysisRequest {
                origin: NewsOrigin::MessageText,
                ..
            } => Intent::NewsFromMessage,
            Self::GeneralConversation { .. } => Intent::General,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifyError {
    #[error("could not read conversation history: {0}")]
    HistoryUnavailable(#[from] ChannelError),
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| !k.is_empty() && text.contains(k.as_str()))
}

/// Pick the rule for an already mention-stripped text.
pub fn decide(policy: &ClassifierPolicy, stripped: &str, thread_id: Option<&str>) -> Intent {
    if thread_id.is_some_and(|t| !t.trim().is_empty()) {
        return Intent::Thread;
    }
    if contains_any(stripped, &policy.topic_keywords)
        && contains_any(stripped, &policy.request_keywords)
    {
        return Intent::NewsFromHistory;
    }
    if char_len(stripped) > policy.long_text_threshold || contains_url(stripped) {
        return Intent::NewsFromMessage;
    }
    Intent::General
}

/// Format thread messages as prompt context, one `"{role}: {content}"` line each.
pub fn thread_context(history: &[HistoryMessage]) -> String {
    history
        .iter()
        .map(|m| {
            let role = if m.is_from_bot { "model" } else { "user" };
            format!("{role}: {}", strip_mentions(&m.text))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Classifies inbound messages, fetching history and pages as the rules need.
pub struct IntentClassifier {
    platform: Arc<dyn ChatPlatform>,
    fetcher: Arc<dyn PageFetcher>,
    policy: ClassifierPolicy,
}

impl IntentClassifier {
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        fetcher: Arc<dyn PageFetcher>,
        policy: ClassifierPolicy,
    ) -> Self {
        Self {
            platform,
            fetcher,
            policy,
        }
    }

    pub fn policy(&self) -> &ClassifierPolicy {
        &self.policy
    }

    pub async fn classify(&self, message: &InboundMessage) -> Result<Classification, ClassifyError> {
        let stripped = strip_mentions(&message.text);
        let intent = decide(&self.policy, stripped, message.thread());
        info!(channel = %message.channel_id, intent = ?intent, "Classified message");

        match intent {
            Intent::Thread => {
                // decide() only returns Thread when a thread id is present
                let thread_id = message.thread().unwrap_or_default().to_string();
                let history = self
                    .platform
                    .thread_replies(&message.channel_id, &thread_id)
                    .await?;
                let context = thread_context(&history);
                Ok(Classification::ThreadDiscussion {
                    thread_id,
                    history,
                    context,
                })
            }
            Intent::NewsFromHistory => {
                let contents = self.collect_from_history(message).await?;
                Ok(Classification::NewsAnalysisRequest {
                    origin: NewsOrigin::ChannelHistory,
                    contents,
                })
            }
            Intent::NewsFromMessage => Ok(Classification::NewsAnalysisRequest {
                origin: NewsOrigin::MessageText,
                contents: self.collect_from_text(stripped).await,
            }),
            Intent::General => Ok(Classification::GeneralConversation {
                text: stripped.to_string(),
            }),
        }
    }

    /// Mine the recent channel window, minus the triggering message.
    async fn collect_from_history(
        &self,
        message: &InboundMessage,
    ) -> Result<Vec<ExtractedContent>, ClassifyError> {
        let history = self
            .platform
            .channel_history(&message.channel_id, self.policy.history_window)
            .await?;
        let candidates = exclude_trigger(history, message.message_id.as_deref());

        let mut contents = Vec::new();
        for entry in candidates {
            let urls = extract_urls(&entry.text);
            if urls.is_empty() {
                if contains_any(&entry.text, &self.policy.news_keywords)
                    && char_len(&entry.text) > self.policy.history_min_chars
                {
                    contents.push(ExtractedContent::plain(entry.text.clone()));
                }
                continue;
            }

            for (url, result) in urls.iter().zip(self.fetch_all(&urls).await) {
                match result {
                    Ok(body) => contents.push(ExtractedContent::scraped(*url, body)),
                    Err(e) => {
                        debug!(url = %url, error = %e, "Scrape failed, keeping message text");
                        contents.push(ExtractedContent::scrape_failed(*url, entry.text.clone()));
                    }
                }
            }
        }

        debug!(items = contents.len(), "Collected content from channel history");
        Ok(contents)
    }

    /// Scrape links in the text; fall back to the text itself.
    async fn collect_from_text(&self, stripped: &str) -> Vec<ExtractedContent> {
        let urls = extract_urls(stripped);
        let mut contents: Vec<ExtractedContent> = urls
            .iter()
            .zip(self.fetch_all(&urls).await)
            .filter_map(|(url, result)| match result {
                Ok(body) => Some(ExtractedContent::scraped(*url, body)),
                Err(e) => {
                    debug!(url = %url, error = %e, "Scrape failed, skipping");
                    None
                }
            })
            .collect();

        if contents.is_empty() {
            contents.push(ExtractedContent::plain(stripped));
        }
        contents
    }

    /// Fetch all URLs concurrently; results keep the order of `urls`.
    async fn fetch_all(&self, urls: &[&str]) -> Vec<Result<String, ScrapeError>> {
        join_all(urls.iter().map(|url| self.fetcher.fetch_text(url))).await
    }
}

/// Drop the triggering message from the history window.
///
/// With a known message id, the matching entry is removed. Otherwise the
/// first entry (the newest one, which is the trigger itself) is skipped.
fn exclude_trigger(history: Vec<HistoryMessage>, trigger_id: Option<&str>) -> Vec<HistoryMessage> {
    match trigger_id {
        Some(id) => history
            .into_iter()
            .filter(|m| m.message_id.as_deref() != Some(id))
            .collect(),
        None => history.into_iter().skip(1).collect(),
    }
}
