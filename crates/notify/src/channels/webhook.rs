//! Discord-style webhook notification channel.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::message::WebhookMessage;
use crate::NotifyChannel;

/// Request timeout for a single webhook delivery.
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat webhook channel posting `{"content": ...}` bodies.
///
/// The URL is used verbatim, so a thread suffix such as `?thread_id=...`
/// routes messages into that thread.
pub struct WebhookChannel {
    webhook_url: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    /// Create a webhook channel for the given URL.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, ChannelError> {
        let webhook_url = webhook_url.into();
        if webhook_url.trim().is_empty() {
            return Err(ChannelError::NotConfigured("webhook URL".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()?;

        Ok(Self {
            webhook_url,
            client,
        })
    }

    /// The URL messages are posted to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl NotifyChannel for WebhookChannel {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn send(&self, message: &WebhookMessage) -> Result<(), ChannelError> {
        debug!(channel = "webhook", len = message.content.len(), "Sending notification");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(channel = "webhook", status = %status, "Notification sent successfully");
            return Ok(());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<f64>().ok())
                .map_or(0, |secs| secs.ceil() as u64);
            warn!(channel = "webhook", retry_after_secs, "Webhook rate limited");
            return Err(ChannelError::RateLimited { retry_after_secs });
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            channel = "webhook",
            status = %status,
            body = %body,
            "Webhook request failed"
        );

        Err(ChannelError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
