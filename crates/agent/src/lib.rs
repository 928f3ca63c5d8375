//! The request pipelines of Arabot.
//!
//! Chat bot, per mention:
//!
//! 1. **Strip** leading mention markup from the text
//! 2. **Classify** into thread / news-from-history / news-from-message / general
//! 3. **Gather** thread replies, channel history or scraped pages as the rule needs
//! 4. **Assemble** the prompt and pick the persona
//! 5. **Generate** with the model and post the reply (in-thread when threaded)
//!
//! PDF summarizer, per uploaded object: download → extract → summarize →
//! write `{stem}_summary.txt`, or `{stem}_error.log` on failure.

pub mod classifier;
pub mod context;
pub mod mention;
pub mod responder;
pub mod summarizer;
pub mod urls;

#[cfg(test)]
mod test_helpers;

pub use classifier::{Classification, ClassifyError, Intent, IntentClassifier, NewsOrigin};
pub use context::{AssembledPrompt, Persona, PromptAssembler};
pub use mention::strip_mentions;
pub use responder::{ChatResponder, HandleOutcome};
pub use summarizer::{PdfSummarizer, SummaryError, SummaryOutcome};
pub use urls::{contains_url, extract_urls};
