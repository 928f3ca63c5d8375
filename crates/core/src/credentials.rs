//! Access-token sources for cloud APIs.
//!
//! Both the Vertex AI provider and the Cloud Storage client authenticate with
//! an OAuth2 bearer token. Where the token comes from (metadata server, a
//! static value for local runs) is hidden behind this trait.

use crate::error::CredentialError;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// A bearer token plus the instant it stops being usable.
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Option<Instant>,
}

impl AccessToken {
    /// A token that never expires (static configuration).
    pub fn permanent(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    /// A token valid for `ttl` from now. A `ttl` too large to represent as
    /// an `Instant` yields a token with no expiry.
    pub fn expiring_in(token: impl Into<String>, ttl: Duration) -> Self {
        Self {
            token: token.into(),
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    /// Whether the token is still valid `margin` from now.
    pub fn is_fresh(&self, margin: Duration) -> bool {
        match self.expires_at {
            None => true,
            Some(at) => Instant::now()
                .checked_add(margin)
                .is_some_and(|deadline| deadline < at),
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> std::result::Result<AccessToken, CredentialError>;
}
