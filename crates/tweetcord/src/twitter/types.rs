//! Twitter data types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable account identifier resolved from a username.
///
/// Looked up once per process and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A post as returned by the user timeline endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Opaque post id. Equality on this field is the only identity check.
    pub id: String,
    /// When the post was created. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a post with no timestamp.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
        }
    }
}

/// `GET /users/by/username/{name}` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct UserLookupResponse {
    pub data: Option<UserData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserData {
    pub id: String,
}

/// `GET /users/{id}/tweets` response body. `data` is absent for an empty page.
#[derive(Debug, Deserialize)]
pub(crate) struct TimelineResponse {
    #[serde(default)]
    pub data: Option<Vec<Post>>,
}
