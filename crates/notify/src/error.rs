//! Error types for webhook delivery.

use thiserror::Error;

/// Why a single delivery attempt failed.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Request never produced a response (DNS, TLS, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Webhook answered with a non-success status
    #[error("webhook returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Webhook throttled the request
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Channel is missing required settings
    #[error("Channel not configured: {0}")]
    NotConfigured(String),
}
