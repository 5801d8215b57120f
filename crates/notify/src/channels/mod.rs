//! Notification channel implementations.

pub mod dry_run;
pub mod webhook;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::message::WebhookMessage;

/// Trait for notification channels (chat webhooks, log sinks, etc.).
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Deliver a message. Implementations make exactly one attempt.
    async fn send(&self, message: &WebhookMessage) -> Result<(), ChannelError>;
}
