//! pathways-monitor - Partner monitoring and alerting service
//!
//! Periodically scans every partner's operational data for anomalies
//! (attendance gaps, lagging survey completion, unpublished surveys, data
//! inconsistencies) and raises deduplicated alerts with notifications.

use anyhow::Result;
use clap::Parser;
use pathways_common::config::resolve_database_path;
use pathways_common::db::init_database;
use pathways_monitor::{MonitorConfig, Scheduler};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pathways-monitor", about = "Pathways partner monitoring service")]
struct Args {
    /// Path to the SQLite database file
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification before any database delays
    info!(
        "Starting Pathways Monitor (pathways-monitor) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let db_path = resolve_database_path(args.database.as_deref());
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;
    let config = MonitorConfig::load(&pool).await?;

    let scheduler = Arc::new(Scheduler::new(pool, config));
    scheduler.run();

    info!("Monitor running; press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested, exiting");

    Ok(())
}
