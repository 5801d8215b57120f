//! Chat webhook delivery for tweetcord.
//!
//! # Usage
//!
//! ```no_run
//! use notify::{NotifyChannel, WebhookChannel, WebhookMessage};
//!
//! # async fn run() -> Result<(), notify::ChannelError> {
//! let channel = WebhookChannel::new("https://discord.com/api/webhooks/1/abc")?;
//! channel.send(&WebhookMessage::new("hello")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`NotifyChannel`] trait defines the interface for notification channels
//! - [`WebhookChannel`] posts Discord-compatible `{"content": ...}` bodies
//! - [`DryRunChannel`] logs messages without sending them
//!
//! Channels make a single delivery attempt; retry policy belongs to the caller.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod error;
pub mod message;

pub use channels::dry_run::DryRunChannel;
pub use channels::webhook::WebhookChannel;
pub use channels::NotifyChannel;
pub use error::ChannelError;
pub use message::WebhookMessage;
