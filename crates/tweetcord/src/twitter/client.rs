//! Twitter API v2 client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use super::error::FeedError;
use super::types::{AccountId, Post, TimelineResponse, UserLookupResponse};

/// Public Twitter API v2 base URL.
pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/2";

/// Posts requested per timeline fetch.
pub const PAGE_SIZE: u8 = 5;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of posts for a single account.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Resolve a username (without `@`) to its account id.
    async fn resolve_account(&self, username: &str) -> Result<AccountId, FeedError>;

    /// Fetch the most recent page of original posts, newest first.
    async fn fetch_recent(&self, account: &AccountId) -> Result<Vec<Post>, FeedError>;
}

/// Bearer-token client for the Twitter API.
pub struct FeedClient {
    base_url: String,
    bearer_token: String,
    client: Client,
}

impl FeedClient {
    /// Create a client against the public API.
    pub fn new(bearer_token: impl Into<String>) -> Result<Self, FeedError> {
        Self::with_base_url(DEFAULT_API_BASE, bearer_token)
    }

    /// Create a client against a custom base URL (proxies, tests).
    pub fn with_base_url(
        base_url: impl Into<String>,
        bearer_token: impl Into<String>,
    ) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
            client,
        })
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FeedError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .query(query)
            .send()
            .await?;

        check_status(response).await?.text().await.map_err(Into::into)
    }
}

/// Map 429 and other non-success statuses to [`FeedError`].
async fn check_status(response: Response) -> Result<Response, FeedError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let reset_at = response
            .headers()
            .get("x-rate-limit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok());
        return Err(FeedError::RateLimited { reset_at });
    }

    let body = response.text().await.unwrap_or_default();
    Err(FeedError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn resolve_account(&self, username: &str) -> Result<AccountId, FeedError> {
        let url = format!("{}/users/by/username/{username}", self.base_url);
        debug!(username, "Resolving account id");

        let body = self.get(&url, &[]).await?;
        let parsed: UserLookupResponse = serde_json::from_str(&body)?;

        match parsed.data {
            Some(user) => Ok(AccountId(user.id)),
            None => {
                warn!(username, body = %body, "Username lookup returned no data");
                Err(FeedError::NotFound(username.to_string()))
            }
        }
    }

    async fn fetch_recent(&self, account: &AccountId) -> Result<Vec<Post>, FeedError> {
        let url = format!("{}/users/{account}/tweets", self.base_url);
        let page_size = PAGE_SIZE.to_string();

        let body = self
            .get(
                &url,
                &[
                    ("max_results", page_size.as_str()),
                    ("exclude", "retweets,replies"),
                    ("tweet.fields", "created_at"),
                ],
            )
            .await?;
        let parsed: TimelineResponse = serde_json::from_str(&body)?;

        let mut posts = parsed.data.unwrap_or_default();
        posts.truncate(usize::from(PAGE_SIZE));
        debug!(account = %account, count = posts.len(), "Fetched recent posts");
        Ok(posts)
    }
}
