//! Model provider implementations for Arabot.
//!
//! `GeminiProvider` implements `arabot_core::Provider` for both Vertex AI and
//! the public Generative Language API. `gcp_auth` supplies the OAuth tokens
//! Vertex AI and Cloud Storage need.

pub mod gcp_auth;
pub mod gemini;
pub mod router;

pub use gcp_auth::{MetadataTokenSource, StaticTokenSource, token_source_from_config};
pub use gemini::GeminiProvider;
pub use router::build_from_config;
