//! Web page fetching for Arabot.
//!
//! [`HttpPageFetcher`] implements `arabot_core::PageFetcher`: one GET with a
//! browser-like User-Agent and a short timeout, then [`extract::readable_text`]
//! turns the HTML into plain text.

pub mod extract;
pub mod http;

pub use extract::readable_text;
pub use http::HttpPageFetcher;
