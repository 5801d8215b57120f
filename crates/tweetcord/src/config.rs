//! Command-line and environment configuration.
//!
//! Every flag can also be supplied through the environment variable named in
//! its help text; `.env` files are loaded before parsing.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::monitor::MonitorConfig;
use crate::state::DEFAULT_STATE_FILE;
use crate::twitter::DEFAULT_API_BASE;

/// How long the monitor keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Poll forever, sleeping the poll interval between cycles.
    Continuous,
    /// Run a single poll cycle and exit.
    Once,
}

/// tweetcord - forward new posts from a Twitter/X account to a chat webhook.
#[derive(Clone, Parser)]
#[command(name = "tweetcord")]
#[command(about = "Forward new posts from a Twitter/X account to a chat webhook")]
#[command(version)]
pub struct Config {
    /// Twitter API v2 bearer token
    #[arg(long, env = "BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: String,

    /// Account to monitor (leading @ is optional)
    #[arg(long, env = "TWITTER_USERNAME", value_parser = parse_username)]
    pub username: String,

    /// Chat webhook URL, including any thread suffix
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: String,

    /// Keep polling or run a single cycle
    #[arg(long, env = "RUN_MODE", value_enum, default_value_t = RunMode::Continuous)]
    pub run_mode: RunMode,

    /// Seconds between polls in continuous mode
    #[arg(
        long,
        env = "POLL_INTERVAL_SECS",
        default_value_t = 28_800,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_secs: u64,

    /// Seconds to pause after the API reports a rate limit
    #[arg(
        long,
        env = "RATE_LIMIT_COOLDOWN_SECS",
        default_value_t = 900,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub rate_limit_cooldown_secs: u64,

    /// File holding the id of the last forwarded post
    #[arg(long, env = "STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,

    /// Keep the watermark in memory only
    #[arg(long = "no-persist", env = "DISABLE_PERSISTENCE")]
    pub no_persist: bool,

    /// Serve a health check endpoint alongside the monitor
    #[arg(long, env = "HEALTH_ENABLED")]
    pub health: bool,

    /// Health check port
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Twitter API base URL
    #[arg(long, env = "TWITTER_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Log messages instead of posting them to the webhook
    #[arg(long, env = "NOTIFY_DISABLED")]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_limit_cooldown_secs)
    }

    #[must_use]
    pub fn persist(&self) -> bool {
        !self.no_persist
    }

    /// Address the health endpoint binds to.
    #[must_use]
    pub fn health_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// Settings for the monitor loop.
    #[must_use]
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            account: self.username.clone(),
            run_mode: self.run_mode,
            poll_interval: self.poll_interval(),
            rate_limit_cooldown: self.rate_limit_cooldown(),
        }
    }
}

fn parse_username(raw: &str) -> Result<String, String> {
    let name = raw.trim().trim_start_matches('@');
    if name.is_empty() {
        return Err("username must not be empty".to_string());
    }
    Ok(name.to_string())
}
