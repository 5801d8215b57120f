//! Watermark persistence.
//!
//! The stored record is the bare post id: no newline, no metadata.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Default location of the watermark file.
pub const DEFAULT_STATE_FILE: &str = "logs/last_tweet_id.txt";

/// Failure reading or writing the stored watermark.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write state file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable storage for a single watermark value.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the stored watermark. Missing or blank records are `None`.
    async fn load(&self) -> Result<Option<String>, StateError>;

    /// Replace the stored watermark with `id`.
    async fn save(&self, id: &str) -> Result<(), StateError>;
}

/// Plain-text file holding the watermark.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_FILE)
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self) -> Result<Option<String>, StateError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No state file found, starting fresh");
                return Ok(None);
            }
            Err(source) => {
                return Err(StateError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let id = content.trim();
        if id.is_empty() {
            info!(path = %self.path.display(), "State file is empty, starting fresh");
            return Ok(None);
        }

        info!(path = %self.path.display(), last_id = id, "Loaded watermark");
        Ok(Some(id.to_string()))
    }

    async fn save(&self, id: &str) -> Result<(), StateError> {
        let write_err = |source: std::io::Error| StateError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        tokio::fs::write(&self.path, id).await.map_err(write_err)?;

        debug!(path = %self.path.display(), last_id = id, "Saved watermark");
        Ok(())
    }
}

/// Process-local store used when persistence is turned off.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    value: Mutex<Option<String>>,
}

impl MemoryStateStore {
    #[must_use]
    pub fn new(initial: Option<String>) -> Self {
        Self {
            value: Mutex::new(initial),
        }
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<Option<String>, StateError> {
        Ok(self.value.lock().await.clone())
    }

    async fn save(&self, id: &str) -> Result<(), StateError> {
        *self.value.lock().await = Some(id.to_string());
        Ok(())
    }
}
