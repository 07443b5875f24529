//! eventwatch CLI
//!
//! Polls the events API and posts every change to the Discord webhook named
//! by `DISCORD_WEBHOOK_URL`. Runs until interrupted.

use std::path::PathBuf;

use clap::Parser;
use eventwatch::{
    error::Result,
    models::Config,
    pipeline::{Timing, supervise},
    services::{ApiEventSource, WebhookNotifier},
    storage::LocalStorage,
};
use tokio::sync::watch;

/// eventwatch - TruckersMP event change notifier
#[derive(Parser, Debug)]
#[command(
    name = "eventwatch",
    version,
    about = "Posts TruckersMP event changes to a Discord webhook"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "eventwatch.toml")]
    config: PathBuf,

    /// Override the snapshot file location
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Override the poll interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("TruckersMP Event Bot starting...");

    let mut config = Config::load_or_default(&cli.config);
    if let Some(path) = cli.snapshot {
        config.storage.snapshot_file = path;
    }
    if let Some(secs) = cli.interval {
        config.watch.poll_interval_secs = secs;
    }

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let webhook_url = Config::webhook_url()?;

    let store = LocalStorage::new(&config.storage.snapshot_file);
    let source = ApiEventSource::new(&config.source)?;
    let notifier =
        WebhookNotifier::new(&config.notifier, &config.source.user_agent, webhook_url)?;

    log::info!("Watching {}", config.source.api_url);
    log::info!("Snapshot file: {}", store.path().display());

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Interrupt received, stopping after the current cycle...");
                let _ = stop_tx.send(true);
            }
            Err(e) => log::error!("Unable to listen for interrupt signal: {}", e),
        }
    });

    let restarts = supervise(
        &store,
        &source,
        &notifier,
        Timing::from(&config.watch),
        stop_rx,
    )
    .await;

    log::info!(
        "Bot stopped by user after {} scheduled restarts. Exiting cleanly.",
        restarts
    );

    Ok(())
}
