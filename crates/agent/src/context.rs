//! Prompt assembly.
//!
//! Turns a [`Classification`] into the prompt and persona for one model call,
//! or into a canned reply when there is nothing to send to the model.

use crate::classifier::{Classification, NewsOrigin};
use arabot_config::PromptConfig;
use arabot_core::message::{ExtractedContent, SourceLabel};

/// Which system instruction accompanies the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    /// In-depth news/report analyst
    Analysis,
    /// Friendly conversational assistant
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembledPrompt {
    Generate { persona: Persona, prompt: String },
    /// Reply with this text without calling the model.
    Canned(String),
}

pub struct PromptAssembler {
    prompts: PromptConfig,
}

impl PromptAssembler {
    pub fn new(prompts: PromptConfig) -> Self {
        Self { prompts }
    }

    pub fn assemble(&self, classification: &Classification) -> AssembledPrompt {
        match classification {
            Classification::ThreadDiscussion { context, .. } => AssembledPrompt::Generate {
                persona: Persona::General,
                prompt: fill(&self.prompts.thread_template, "{context}", context),
            },
            Classification::NewsAnalysisRequest {
                origin: NewsOrigin::ChannelHistory,
                contents,
            } => {
                if contents.is_empty() {
                    return AssembledPrompt::Canned(self.prompts.no_content_reply.clone());
                }
                let sections = contents
                    .iter()
                    .map(render_section)
                    .collect::<Vec<_>>()
                    .join("\n\n");
                AssembledPrompt::Generate {
                    persona: Persona::Analysis,
                    prompt: fill(&self.prompts.history_analysis_template, "{content}", &sections),
                }
            }
            Classification::NewsAnalysisRequest {
                origin: NewsOrigin::MessageText,
                contents,
            } => {
                let bodies = contents
                    .iter()
                    .map(|c| c.body.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                AssembledPrompt::Generate {
                    persona: Persona::Analysis,
                    prompt: fill(&self.prompts.message_analysis_template, "{content}", &bodies),
                }
            }
            Classification::GeneralConversation { text } => AssembledPrompt::Generate {
                persona: Persona::General,
                prompt: text.clone(),
            },
        }
    }

    pub fn system_instruction(&self, persona: Persona) -> &str {
        match persona {
            Persona::Analysis => &self.prompts.analysis_system,
            Persona::General => &self.prompts.general_system,
        }
    }

    /// The user-visible message for a failed request.
    pub fn error_reply(&self, error: &dyn std::fmt::Display) -> String {
        format!("{}{error}", self.prompts.error_reply_prefix)
    }
}

fn fill(template: &str, placeholder: &str, value: &str) -> String {
    template.replace(placeholder, value)
}

fn render_section(item: &ExtractedContent) -> String {
    let header = match &item.source {
        SourceLabel::Url(url) => format!("기사 원문 내용: {url}"),
        SourceLabel::ScrapeFailed(_) => "기사 요약(스크래핑 실패)".to_string(),
        SourceLabel::PlainText => "텍스트 뉴스".to_string(),
    };
    format!("--- [{header}] ---\n{}", item.body)
}
