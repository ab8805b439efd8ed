//! config-center - configuration cache and counter service
//!
//! Loads configuration, connects both stores and keeps the fast store in
//! sync with the relational store until interrupted.

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use config_center::utils::logging::init_tracing;
use config_center::{Config, ConfigCenter};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "config-center", version, about = "Configuration cache and rate-limit counter service")]
struct Cli {
    /// YAML configuration file; environment variables are used when absent
    #[arg(short, long, env = "CONFIG_CENTER_CONFIG")]
    config: Option<PathBuf>,

    /// Run one snapshot sync and exit
    #[arg(long)]
    sync_once: bool,

    /// Overrides the configured log filter
    #[arg(long, env = "CONFIG_CENTER_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps the context chain readable
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .await?
            .with_env_overrides()
            .context("applying environment overrides")?,
        None => Config::from_env()?,
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate()?;
    init_tracing(&config.logging)?;

    let center = ConfigCenter::init(config)
        .await
        .context("initializing stores")?;
    let health = center.health().await;
    info!(
        "Stores ready: database={}, fast_store={} ({})",
        health.database, health.fast_store, health.fast_store_backend
    );

    if cli.sync_once {
        let report = center.sync_once().await?;
        info!(
            "Synced {} namespaces, {} rules, {} matchers, {} upstreams, {} locations",
            report.namespaces, report.rules, report.matchers, report.upstreams, report.locations
        );
        center.shutdown().await;
        return Ok(());
    }

    center.start_sync();
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    center.shutdown().await;
    Ok(())
}
