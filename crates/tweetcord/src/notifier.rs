//! Formats posts as chat messages and hands them to a notify channel.

use std::sync::Arc;

use notify::{ChannelError, NotifyChannel, WebhookMessage};

use crate::twitter::Post;

/// Mirror domain used for permalinks so chat clients render an embed.
pub const PERMALINK_BASE: &str = "https://fxtwitter.com";

/// Link to a post on the embed-friendly mirror.
#[must_use]
pub fn permalink(account: &str, post_id: &str) -> String {
    format!("{PERMALINK_BASE}/{account}/status/{post_id}")
}

/// Sends one chat message per post for a single account.
#[derive(Clone)]
pub struct PostNotifier {
    channel: Arc<dyn NotifyChannel>,
    account: String,
}

impl PostNotifier {
    #[must_use]
    pub fn new(channel: Arc<dyn NotifyChannel>, account: impl Into<String>) -> Self {
        Self {
            channel,
            account: account.into(),
        }
    }

    /// Name of the channel messages go through.
    #[must_use]
    pub fn channel_name(&self) -> &'static str {
        self.channel.name()
    }

    /// Text announcing `post`.
    #[must_use]
    pub fn message(&self, post: &Post) -> WebhookMessage {
        WebhookMessage::new(format!(
            "New tweet from @{}:\n{}",
            self.account,
            permalink(&self.account, &post.id)
        ))
    }

    /// Deliver the announcement for `post`. One attempt, no retry.
    pub async fn notify(&self, post: &Post) -> Result<(), ChannelError> {
        self.channel.send(&self.message(post)).await
    }
}
