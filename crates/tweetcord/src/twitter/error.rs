//! Feed API error types.

use thiserror::Error;

/// Errors returned by the feed provider.
///
/// Everything except [`FeedError::RateLimited`] is a transport-class
/// failure: the current cycle is skipped and polling continues normally.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The API answered 429. Polling must pause for the cooldown period.
    #[error("rate limited by feed API (reset at {reset_at:?})")]
    RateLimited {
        /// Epoch seconds from `x-rate-limit-reset`, if present.
        reset_at: Option<i64>,
    },

    /// The username lookup returned no account.
    #[error("account @{0} not found")]
    NotFound(String),

    /// Network or protocol failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status other than 429.
    #[error("feed API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("invalid feed API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FeedError {
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
