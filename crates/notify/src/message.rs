//! Webhook message payloads.

use serde::{Deserialize, Serialize};

/// A plain-text chat message.
///
/// Serializes to the Discord-compatible webhook body `{"content": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    /// Message text, rendered as-is by the chat client.
    pub content: String,
}

impl WebhookMessage {
    /// Create a message with the given text.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_content_only() {
        let message = WebhookMessage::new("hello\nworld");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json, serde_json::json!({"content": "hello\nworld"}));
    }
}
