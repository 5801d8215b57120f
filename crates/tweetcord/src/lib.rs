//! Forwards new posts from one Twitter/X account to a chat webhook.
//!
//! This crate provides:
//! - Account resolution and timeline polling against the Twitter API v2
//! - A persisted watermark so restarts do not re-announce posts
//! - The poll/dedupe/notify state machine with rate-limit cooldown
//! - An optional liveness endpoint

pub mod config;
pub mod health;
pub mod monitor;
pub mod notifier;
pub mod state;
pub mod twitter;
pub mod watermark;

// Re-export main types
pub use config::{Config, RunMode};
pub use monitor::{CycleOutcome, MonitorConfig, MonitorError, MonitorLoop, RunSummary};
pub use notifier::PostNotifier;
pub use state::{FileStateStore, MemoryStateStore, StateError, StateStore};
pub use twitter::{AccountId, FeedClient, FeedError, FeedSource, Post};
pub use watermark::Watermark;
