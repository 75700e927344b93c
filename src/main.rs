//! javnfo - incremental catalog scraper
//!
//! Matches local media files to catalog entries by code, scrapes release
//! metadata from the catalog's detail pages, downloads and crops cover art,
//! and emits library-manager-compatible `movie.nfo` files. Reruns are
//! incremental: a persisted ledger skips finished releases and retries
//! only failures.

mod cli;
mod config;
mod error;
mod services;

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::CliOptions;
use crate::config::Config;
use crate::services::{CatalogClient, Ledger, code_matcher, runner};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "javnfo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env()?;
    let options = CliOptions::from_args();
    if let Some(root) = options.root_dir {
        config.root_dir = root;
    }
    if let Some(ledger) = options.ledger_path {
        config.ledger_path = ledger;
    }
    if let Some(pattern) = options.code_pattern {
        config.code_pattern = pattern;
    }

    tracing::info!(root = %config.root_dir, ledger = %config.ledger_path, "Starting javnfo");

    let pattern = Regex::new(&config.code_pattern).context("Invalid code pattern")?;
    let releases = code_matcher::scan(Path::new(&config.root_dir), &pattern)?;
    tracing::info!(count = releases.len(), "Matched local releases");

    // A malformed ledger aborts here; resetting it silently would re-scrape
    // every release.
    let ledger_path = Path::new(&config.ledger_path).to_path_buf();
    let mut ledger = Ledger::load(&ledger_path)?;
    tracing::info!(entries = ledger.len(), "Ledger loaded");

    let client = CatalogClient::new(&config)?;
    runner::run(&client, &releases, &mut ledger).await;

    ledger.save(&ledger_path)?;
    tracing::info!(ledger = %ledger_path.display(), "Ledger persisted");

    Ok(())
}
