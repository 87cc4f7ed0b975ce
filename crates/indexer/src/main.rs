//! Chunk indexer binary.

use anyhow::{Context, Result};
use chunkdex_indexer::{IndexingDaemon, settings};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Publish the chunks of a storage volume to the reverse directory
#[derive(Parser, Debug)]
#[command(name = "chunkdex-indexer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "CHUNKDEX_CONFIG",
        default_value = "config/indexer.toml"
    )]
    config: String,

    /// Run a single pass and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("chunkdex-indexer v{}", env!("CARGO_PKG_VERSION"));

    let config_path = Path::new(&args.config);
    if !config_path.exists() && !settings::has_env_config() {
        anyhow::bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: chunkdex-indexer --config /path/to/indexer.toml\n  \
             2. Environment variables: CHUNKDEX_INDEXER__VOLUME=/srv/node/vol1 chunkdex-indexer\n\n\
             See config/indexer.example.toml for example configuration."
        );
    }

    let config = settings::load(config_path).context("failed to load configuration")?;
    let mut daemon =
        IndexingDaemon::from_config(&config).context("failed to initialize indexer")?;

    if args.once {
        let stats = daemon.run_once().await.context("indexing pass failed")?;
        tracing::info!(
            successes = stats.successes,
            errors = stats.errors,
            "Single pass complete"
        );
        return Ok(());
    }

    daemon.run().await;
    Ok(())
}
