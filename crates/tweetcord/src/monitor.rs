//! Poll, dedupe, notify loop.
//!
//! The loop is an explicit state machine:
//!
//! ```text
//! Init -> Resolving -> Polling -> (Sleeping | RateLimitCooldown) -> Polling -> ... -> Terminated
//! ```
//!
//! The watermark and resolved account travel inside the phase values, so
//! the loop is the only owner of both. Every sleep races the shutdown token.
//!
//! Delivery is best effort. The watermark is saved once, after every post in
//! the batch has been attempted, so a crash mid-batch re-sends that batch on
//! the next start, and a failed delivery is never retried.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::RunMode;
use crate::notifier::PostNotifier;
use crate::state::StateStore;
use crate::twitter::{AccountId, FeedError, FeedSource};
use crate::watermark::Watermark;

/// Default pause between polls in continuous mode (8 hours).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(28_800);

/// Default pause after the feed API answers 429 (15 minutes).
pub const DEFAULT_RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(900);

/// Added to every cooldown so the retry lands after the rate-limit window.
pub const COOLDOWN_BUFFER: Duration = Duration::from_secs(5);

/// Loop settings.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Username being monitored, without `@`.
    pub account: String,
    pub run_mode: RunMode,
    pub poll_interval: Duration,
    pub rate_limit_cooldown: Duration,
}

impl MonitorConfig {
    /// Continuous monitoring of `account` with default timings.
    #[must_use]
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            run_mode: RunMode::Continuous,
            poll_interval: DEFAULT_POLL_INTERVAL,
            rate_limit_cooldown: DEFAULT_RATE_LIMIT_COOLDOWN,
        }
    }

    /// Total wait after a rate-limit response.
    #[must_use]
    pub fn cooldown_with_buffer(&self) -> Duration {
        self.rate_limit_cooldown + COOLDOWN_BUFFER
    }
}

/// Fatal loop errors.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The account could not be resolved, so it can never be polled.
    #[error("could not resolve account @{username}: {source}")]
    Resolution {
        username: String,
        #[source]
        source: FeedError,
    },
}

/// What a single poll cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// New posts were found and each was attempted once.
    Forwarded {
        attempted: usize,
        failed: usize,
        /// Id the watermark advanced to.
        newest: String,
    },
    /// Posts were returned but none are ahead of the watermark.
    UpToDate,
    /// The feed returned no posts.
    Empty,
    /// The feed API asked us to back off.
    RateLimited,
    /// The fetch failed; this cycle is skipped.
    TransportFailure,
}

/// Counters for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Poll cycles executed, including rate-limited ones.
    pub cycles: usize,
    /// Notifications delivered successfully.
    pub forwarded: usize,
    pub delivery_failures: usize,
    pub cooldowns: usize,
    pub transport_failures: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::Forwarded {
                attempted, failed, ..
            } => {
                self.forwarded += attempted - failed;
                self.delivery_failures += failed;
            }
            CycleOutcome::RateLimited => self.cooldowns += 1,
            CycleOutcome::TransportFailure => self.transport_failures += 1,
            CycleOutcome::UpToDate | CycleOutcome::Empty => {}
        }
    }
}

/// Account and watermark carried between phases once resolution succeeded.
#[derive(Debug)]
struct Tracking {
    account: AccountId,
    watermark: Watermark,
}

#[derive(Debug)]
enum Phase {
    Init,
    Resolving(Watermark),
    Polling(Tracking),
    RateLimitCooldown(Tracking),
    Sleeping(Tracking),
    Terminated,
}

/// Monitors one account and forwards its new posts.
pub struct MonitorLoop {
    config: MonitorConfig,
    feed: Arc<dyn FeedSource>,
    store: Arc<dyn StateStore>,
    notifier: PostNotifier,
    shutdown: CancellationToken,
}

impl MonitorLoop {
    #[must_use]
    pub fn new(
        config: MonitorConfig,
        feed: Arc<dyn FeedSource>,
        store: Arc<dyn StateStore>,
        notifier: PostNotifier,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            feed,
            store,
            notifier,
            shutdown,
        }
    }

    /// Run until `Once` mode finishes a cycle or shutdown is requested.
    pub async fn run(&self) -> Result<RunSummary, MonitorError> {
        let mut summary = RunSummary::default();
        let mut phase = Phase::Init;

        loop {
            debug!(phase = ?phase, "Monitor phase");
            phase = match phase {
                Phase::Init => Phase::Resolving(self.load_watermark().await),

                Phase::Resolving(watermark) => {
                    let username = self.config.account.as_str();
                    match self.feed.resolve_account(username).await {
                        Ok(account) => {
                            info!(username, account = %account, "Resolved account");
                            Phase::Polling(Tracking { account, watermark })
                        }
                        Err(source) => {
                            error!(username, error = %source, "Could not resolve account, exiting");
                            return Err(MonitorError::Resolution {
                                username: username.to_string(),
                                source,
                            });
                        }
                    }
                }

                Phase::Polling(mut tracking) => {
                    let outcome = self
                        .poll_cycle(&tracking.account, &mut tracking.watermark)
                        .await;
                    summary.record(&outcome);
                    if outcome == CycleOutcome::RateLimited {
                        Phase::RateLimitCooldown(tracking)
                    } else {
                        Phase::Sleeping(tracking)
                    }
                }

                Phase::RateLimitCooldown(tracking) => {
                    let wait = self.config.cooldown_with_buffer();
                    warn!(secs = wait.as_secs(), "Rate limit exceeded, cooling down");
                    if self.pause(wait).await {
                        Phase::Polling(tracking)
                    } else {
                        Phase::Terminated
                    }
                }

                Phase::Sleeping(tracking) => match self.config.run_mode {
                    RunMode::Once => Phase::Terminated,
                    RunMode::Continuous => {
                        let wait = self.config.poll_interval;
                        info!(secs = wait.as_secs(), "Sleeping until next poll");
                        if self.pause(wait).await {
                            Phase::Polling(tracking)
                        } else {
                            Phase::Terminated
                        }
                    }
                },

                Phase::Terminated => {
                    info!(
                        cycles = summary.cycles,
                        forwarded = summary.forwarded,
                        delivery_failures = summary.delivery_failures,
                        cooldowns = summary.cooldowns,
                        transport_failures = summary.transport_failures,
                        "Monitor stopped"
                    );
                    return Ok(summary);
                }
            };
        }
    }

    /// Fetch one page, forward unseen posts oldest-first, then persist the
    /// newest id. Never fails: every error maps to an outcome.
    pub async fn poll_cycle(
        &self,
        account: &AccountId,
        watermark: &mut Watermark,
    ) -> CycleOutcome {
        let batch = match self.feed.fetch_recent(account).await {
            Ok(batch) => batch,
            Err(e) if e.is_rate_limited() => {
                warn!(error = %e, "Feed API rate limit hit");
                return CycleOutcome::RateLimited;
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch posts, skipping this cycle");
                return CycleOutcome::TransportFailure;
            }
        };

        if batch.is_empty() {
            info!("Feed returned no posts");
            return CycleOutcome::Empty;
        }

        let unseen = watermark.unseen(&batch);
        let Some(newest) = unseen.first().map(|post| post.id.clone()) else {
            info!(last_id = ?watermark.last_id(), "No new posts");
            return CycleOutcome::UpToDate;
        };

        info!(count = unseen.len(), newest = %newest, "Found new posts");

        let mut failed = 0;
        for post in unseen.iter().rev() {
            match self.notifier.notify(post).await {
                Ok(()) => info!(post_id = %post.id, "Forwarded post"),
                Err(e) => {
                    failed += 1;
                    error!(
                        post_id = %post.id,
                        channel = self.notifier.channel_name(),
                        error = %e,
                        "Failed to deliver notification"
                    );
                }
            }
        }

        watermark.advance(newest.clone());
        if let Err(e) = self.store.save(&newest).await {
            error!(
                last_id = %newest,
                error = %e,
                "Failed to persist watermark, posts may be re-sent after a restart"
            );
        }

        CycleOutcome::Forwarded {
            attempted: unseen.len(),
            failed,
            newest,
        }
    }

    async fn load_watermark(&self) -> Watermark {
        match self.store.load().await {
            Ok(last_id) => Watermark::new(last_id),
            Err(e) => {
                error!(error = %e, "Failed to load watermark, starting fresh");
                Watermark::empty()
            }
        }
    }

    /// Sleep for `duration`. Returns `false` if shutdown interrupted it.
    async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            biased;
            () = self.shutdown.cancelled() => {
                info!("Shutdown requested, stopping monitor");
                false
            }
            () = tokio::time::sleep(duration) => true,
        }
    }
}
