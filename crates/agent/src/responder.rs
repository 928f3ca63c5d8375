//! The chat reply pipeline: classify → assemble → generate → post.

use crate::classifier::IntentClassifier;
use crate::context::{AssembledPrompt, PromptAssembler};
use arabot_core::channel::ChatPlatform;
use arabot_core::message::InboundMessage;
use arabot_core::provider::{GenerationConfig, GenerationRequest, Provider};
use std::sync::Arc;
use tracing::{error, info, warn};

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Bot-authored; nothing was posted
    Ignored,
    /// A reply (model output or canned text) was delivered
    Replied,
    /// The pipeline failed; an error reply was attempted
    Failed(String),
}

/// Handles one mention end to end.
///
/// `handle` owns its failures: every error ends up in the log and, when the
/// platform accepts it, in the channel as an error reply.
pub struct ChatResponder {
    classifier: IntentClassifier,
    assembler: PromptAssembler,
    provider: Arc<dyn Provider>,
    platform: Arc<dyn ChatPlatform>,
    model: String,
    generation: GenerationConfig,
    ignore_bots: bool,
}

impl ChatResponder {
    pub fn new(
        classifier: IntentClassifier,
        assembler: PromptAssembler,
        provider: Arc<dyn Provider>,
        platform: Arc<dyn ChatPlatform>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            assembler,
            provider,
            platform,
            model: model.into(),
            generation: GenerationConfig::default(),
            ignore_bots: true,
        }
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_ignore_bots(mut self, ignore: bool) -> Self {
        self.ignore_bots = ignore;
        self
    }

    pub async fn handle(&self, message: InboundMessage) -> HandleOutcome {
        if self.ignore_bots && message.is_bot {
            info!(channel = %message.channel_id, "Ignoring bot-authored message");
            return HandleOutcome::Ignored;
        }

        match self.reply(&message).await {
            Ok(()) => HandleOutcome::Replied,
            Err(reason) => {
                error!(channel = %message.channel_id, error = %reason, "Failed to answer mention");
                let text = self.assembler.error_reply(&reason);
                if let Err(e) = self
                    .platform
                    .post_message(&message.channel_id, &text, message.thread())
                    .await
                {
                    warn!(channel = %message.channel_id, error = %e, "Could not deliver error reply");
                }
                HandleOutcome::Failed(reason)
            }
        }
    }

    async fn reply(&self, message: &InboundMessage) -> Result<(), String> {
        let classification = self
            .classifier
            .classify(message)
            .await
            .map_err(|e| e.to_string())?;

        let text = match self.assembler.assemble(&classification) {
            AssembledPrompt::Canned(text) => text,
            AssembledPrompt::Generate { persona, prompt } => {
                let request = GenerationRequest::new(&self.model, prompt)
                    .with_system_instruction(self.assembler.system_instruction(persona))
                    .with_config(self.generation.clone());
                let response = self
                    .provider
                    .generate(request)
                    .await
                    .map_err(|e| e.to_string())?;
                if let Some(usage) = &response.usage {
                    info!(
                        model = %response.model,
                        intent = ?classification.intent(),
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        "Generated reply"
                    );
                }
                response.text
            }
        };

        self.platform
            .post_message(&message.channel_id, &text, message.thread())
            .await
            .map_err(|e| e.to_string())
    }
}
