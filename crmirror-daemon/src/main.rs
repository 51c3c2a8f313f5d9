//! crmirror - Headless Sync Daemon
//!
//! Keeps a set of local JSON files and a set of cluster-resident custom
//! resources mutually consistent:
//! - Polls every configured mapping on a fixed interval
//! - Propagates whichever side changed since the last synchronization
//! - Resolves genuine conflicts by policy (file wins by default)
//!
//! Configured entirely through environment variables / flags; see `--help`.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod credentials;

use cli::Cli;
use crmirror_client::HttpResourceClient;
use crmirror_core::{scheduler, SyncContext};
use crmirror_types::MappingSet;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚀 crmirror starting...");

    let mappings = MappingSet::parse(&cli.file_map)?;
    if mappings.is_empty() {
        anyhow::bail!("FILE_MAP contains no mappings");
    }
    let interval = cli.interval()?;
    let coordinates = cli.coordinates();
    let client_config = credentials::resolve(&cli)?;

    info!(
        "📊 {} mapping(s) for {} in namespace {}",
        mappings.len(),
        coordinates.api_version(),
        coordinates.namespace
    );

    let client = Arc::new(HttpResourceClient::new(client_config, coordinates)?);
    let ctx = Arc::new(SyncContext::new(
        mappings.into_vec(),
        client,
        cli.policy(),
        interval,
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let workers = tokio::spawn(scheduler::run(ctx, shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutdown requested; draining in-flight ticks...");
    let _ = shutdown_tx.send(true);
    workers.await?;

    info!("✅ crmirror stopped cleanly");
    Ok(())
}
