//! Twitter/X API v2 access.
//!
//! Resolves a username to its account id and fetches the latest page of
//! original posts (no retweets, no replies).

mod client;
mod error;
mod types;

pub use client::{FeedClient, FeedSource, DEFAULT_API_BASE, PAGE_SIZE};
pub use error::FeedError;
pub use types::{AccountId, Post};
