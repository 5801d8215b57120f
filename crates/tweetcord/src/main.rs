//! tweetcord - forward new Twitter/X posts to a chat webhook.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use notify::{DryRunChannel, NotifyChannel, WebhookChannel};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tweetcord::health;
use tweetcord::{
    Config, FeedClient, FileStateStore, MemoryStateStore, MonitorLoop, PostNotifier, StateStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();
    let config = Config::parse();
    init_tracing(&config);

    info!(
        username = %config.username,
        run_mode = ?config.run_mode,
        poll_interval_secs = config.poll_interval_secs,
        rate_limit_cooldown_secs = config.rate_limit_cooldown_secs,
        persist = config.persist(),
        state_file = %config.state_file.display(),
        health = config.health,
        dry_run = config.dry_run,
        "Starting tweetcord"
    );

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received SIGINT, shutting down");
            signal_token.cancel();
        }
    });

    let health_handle = config.health.then(|| {
        let addr = config.health_addr();
        let token = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = health::serve(addr, token).await {
                error!(error = %e, addr = %addr, "Health endpoint failed");
            }
        })
    });

    let feed = FeedClient::with_base_url(config.api_base.clone(), config.bearer_token.clone())
        .context("Failed to build Twitter API client")?;

    let channel: Arc<dyn NotifyChannel> = if config.dry_run {
        info!("Notifications disabled, messages will only be logged");
        Arc::new(DryRunChannel)
    } else {
        Arc::new(WebhookChannel::new(config.webhook_url.clone()).context("Invalid webhook URL")?)
    };

    let store: Arc<dyn StateStore> = if config.persist() {
        Arc::new(FileStateStore::new(config.state_file.clone()))
    } else {
        info!("Persistence disabled, watermark kept in memory");
        Arc::new(MemoryStateStore::default())
    };

    let monitor = MonitorLoop::new(
        config.monitor_config(),
        Arc::new(feed),
        store,
        PostNotifier::new(channel, config.username.clone()),
        shutdown.clone(),
    );

    let result = monitor.run().await;

    // Stop the health endpoint together with the monitor.
    shutdown.cancel();
    if let Some(handle) = health_handle {
        if let Err(e) = handle.await {
            warn!(error = %e, "Health endpoint task panicked");
        }
    }

    result?;
    info!("tweetcord exited");
    Ok(())
}

fn init_tracing(config: &Config) {
    let default_directives = if config.verbose {
        "tweetcord=debug,notify=debug,info"
    } else {
        "tweetcord=info,notify=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
