//! # Arabot Core
//!
//! Domain types, collaborator traits, and error definitions shared by the
//! chat bot and the PDF summarizer. This crate has **no framework
//! dependencies**: every outside system (model API, chat platform, web pages,
//! object storage, credentials) is a trait here, and the adapters live in
//! their own crates.
//!
//! ## Design Philosophy
//!
//! - Pipelines receive `Arc<dyn Trait>` collaborators built once at startup
//! - Tests swap in scripted or in-memory implementations
//! - All crates depend inward on core

pub mod channel;
pub mod credentials;
pub mod error;
pub mod fetch;
pub mod message;
pub mod provider;
pub mod storage;
pub mod text;

// Re-export key types at crate root for ergonomics
pub use channel::ChatPlatform;
pub use credentials::{AccessToken, AccessTokenSource};
pub use error::{Error, Result};
pub use fetch::PageFetcher;
pub use message::{ExtractedContent, HistoryMessage, InboundMessage, SourceLabel};
pub use provider::{GenerationConfig, GenerationRequest, GenerationResponse, Provider, Usage};
pub use storage::{ObjectStore, StorageEvent};
