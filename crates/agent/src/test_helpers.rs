//! Shared test doubles for pipeline tests.

use arabot_core::channel::ChatPlatform;
use arabot_core::error::{ChannelError, ProviderError, ScrapeError};
use arabot_core::fetch::PageFetcher;
use arabot_core::message::HistoryMessage;
use arabot_core::provider::{GenerationRequest, GenerationResponse, Provider, Usage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A provider that returns scripted results in order and records every request.
///
/// Once the script runs out, the last entry repeats.
pub struct ScriptedProvider {
    script: Mutex<Vec<Result<String, ProviderError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);

        let mut script = self.script.lock().unwrap();
        let next = if script.len() > 1 {
            script.remove(0)
        } else {
            script
                .first()
                .cloned()
                .unwrap_or_else(|| Err(ProviderError::EmptyResponse("script empty".into())))
        };
        next.map(|text| GenerationResponse {
            text,
            model,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

/// A posted message: (channel, text, thread).
pub type Posted = (String, String, Option<String>);

/// An in-memory chat platform with fixed history and a record of posts.
#[derive(Default)]
pub struct InMemoryPlatform {
    pub channel: Vec<HistoryMessage>,
    pub thread: Vec<HistoryMessage>,
    pub history_error: Option<ChannelError>,
    pub post_error: Option<ChannelError>,
    pub(crate) posted: Mutex<Vec<Posted>>,
    pub(crate) history_calls: Mutex<Vec<(String, usize)>>,
}

impl InMemoryPlatform {
    pub fn with_channel(channel: Vec<HistoryMessage>) -> Self {
        Self {
            channel,
            ..Self::default()
        }
    }

    pub fn with_thread(thread: Vec<HistoryMessage>) -> Self {
        Self {
            thread,
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            history_error: Some(ChannelError::HistoryUnavailable {
                channel: "C1".into(),
                reason: "ratelimited".into(),
            }),
            ..Self::default()
        }
    }

    pub fn posted(&self) -> Vec<Posted> {
        self.posted.lock().unwrap().clone()
    }

    pub fn history_calls(&self) -> Vec<(String, usize)> {
        self.history_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatPlatform for InMemoryPlatform {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn channel_history(
        &self,
        channel_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryMessage>, ChannelError> {
        self.history_calls
            .lock()
            .unwrap()
            .push((channel_id.to_string(), limit));
        match &self.history_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.channel.iter().take(limit).cloned().collect()),
        }
    }

    async fn thread_replies(
        &self,
        _channel_id: &str,
        _thread_id: &str,
    ) -> Result<Vec<HistoryMessage>, ChannelError> {
        match &self.history_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.thread.clone()),
        }
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
        match &self.post_error {
            // Fail only the first delivery so the error reply can go through.
            Some(e) if self.posted.lock().unwrap().len() == 1 => Err(e.clone()),
            _ => Ok(()),
        }
    }
}

/// A page fetcher backed by a URL → body map. Unknown URLs fail.
#[derive(Default)]
pub struct MapFetcher {
    pages: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl MapFetcher {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(u, b)| (u.to_string(), b.to_string()))
                .collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MapFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Timeout {
            url: url.to_string(),
            timeout_secs: 5,
        })
    }
}
