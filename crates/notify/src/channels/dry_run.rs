//! Channel that logs messages instead of delivering them.

use async_trait::async_trait;
use tracing::info;

use crate::error::ChannelError;
use crate::message::WebhookMessage;
use crate::NotifyChannel;

/// Logs every message at info level and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunChannel;

#[async_trait]
impl NotifyChannel for DryRunChannel {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn send(&self, message: &WebhookMessage) -> Result<(), ChannelError> {
        info!(channel = "dry-run", content = %message.content, "Notification suppressed");
        Ok(())
    }
}
