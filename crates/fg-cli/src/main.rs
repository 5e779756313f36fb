//! Fable gacha operator CLI
//!
//! Usage:
//!   fable-gacha locate               - Refresh the per-bracket page boundaries
//!   fable-gacha pull [--seed N]      - Roll once and print the pull as JSON
//!   fable-gacha rate ROLE POPULARITY - Print the star rating

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fg_catalog::AniListClient;
use fg_core::{Role, rate};
use fg_locator::{BoundaryCache, JsonFileStore, PageLocator};
use fg_pool::{Gacha, PoolBuilder};
use fg_rng::ChaChaSource;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "fable-gacha", about = "Fable gacha pool engine", version)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk every bracket to its last page and store the result
    Locate {
        /// Boundary map (overrides the config)
        #[arg(long)]
        boundary_file: Option<PathBuf>,
    },
    /// Roll once and print the pull
    Pull {
        /// Seed for a reproducible roll
        #[arg(long)]
        seed: Option<u64>,
        /// Boundary map (overrides the config)
        #[arg(long)]
        boundary_file: Option<PathBuf>,
    },
    /// Print the star rating for a role and popularity
    Rate {
        role: Role,
        popularity: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Locate { boundary_file } => locate(config, boundary_file).await,
        Commands::Pull {
            seed,
            boundary_file,
        } => pull(config, seed, boundary_file).await,
        Commands::Rate { role, popularity } => {
            let rating = rate(role, popularity);
            println!("{rating} ({} stars)", rating.stars());
            Ok(())
        }
    }
}

async fn locate(config: AppConfig, boundary_file: Option<PathBuf>) -> Result<()> {
    let store = JsonFileStore::new(boundary_file.unwrap_or_else(|| config.boundary_file.clone()));
    let brackets: Vec<_> = config.gacha()?.brackets.values().copied().collect();
    let client =
        AniListClient::new(config.catalog.clone()).context("Failed to build catalog client")?;

    log::info!(
        "[Locator] Walking {} brackets, boundaries in {}",
        brackets.len(),
        store.path().display()
    );

    let locator = PageLocator::new(client, config.query, config.locator);
    let report = locator
        .run(brackets, &store)
        .await
        .with_context(|| format!("Locator run against {} failed", store.path().display()))?;

    for outcome in &report.outcomes {
        println!(
            "{:<16} {:>5} -> {:<5} {:?}, {} probes",
            outcome.bracket.key(),
            outcome
                .previous
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
            outcome.page,
            outcome.reason,
            outcome.probes
        );
    }

    if report.changed {
        println!("Boundaries updated: {}", store.path().display());
    } else {
        println!("No changes");
    }

    Ok(())
}

async fn pull(config: AppConfig, seed: Option<u64>, boundary_file: Option<PathBuf>) -> Result<()> {
    let gacha_config = config.gacha()?;
    let store = JsonFileStore::new(boundary_file.unwrap_or_else(|| config.boundary_file.clone()));
    let client =
        AniListClient::new(config.catalog.clone()).context("Failed to build catalog client")?;

    let rng = match seed {
        Some(seed) => ChaChaSource::from_seed(seed),
        None => ChaChaSource::new(),
    };

    let builder = PoolBuilder::new(client, Arc::new(BoundaryCache::new(store)), rng)
        .with_spec(config.query)
        .with_config(config.pool);
    let gacha = Gacha::new(builder, gacha_config);

    let pull = gacha.roll().await.context("Pull failed")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&pull).context("Failed to encode pull")?
    );

    Ok(())
}
