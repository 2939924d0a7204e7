//! `romm-sync` command line entry point.
//!
//! Prints resolved device paths and artwork plans as JSON so sync scripts on the device can
//! consume them.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use romm_sync::artwork::{extract_manifest, plan_artwork_downloads};
use romm_sync::config::SyncConfig;
use romm_sync::models::CatalogRecord;
use romm_sync::resolver::FilesystemResolver;
use romm_sync::topology::{StorageTopology, TopologyCell};
use romm_sync::urls::saves_url;

#[derive(Debug, Parser)]
#[command(name = "romm-sync", version, about = "Resolve save paths and artwork for RomM")]
struct Cli {
    /// Configuration file; defaults to `romm-sync.json` in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print save and ROM directories for a platform.
    Paths {
        /// Platform slug, e.g. `gba`.
        #[arg(long)]
        platform: String,
    },
    /// Print the artwork manifest and download plan of a catalog record.
    Artwork {
        /// JSON file holding one catalog record as returned by the server.
        #[arg(long)]
        record: PathBuf,
        /// Server host, overriding the configuration.
        #[arg(long)]
        host: Option<String>,
        /// Artwork root, overriding the configuration.
        #[arg(long)]
        artwork_root: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SyncConfig::from_path(path)?,
        None => SyncConfig::discover(&std::env::current_dir()?)?,
    };

    let output = match cli.command {
        Command::Paths { platform } => paths(&config, &platform)?,
        Command::Artwork {
            record,
            host,
            artwork_root,
        } => {
            let host = host.unwrap_or_else(|| config.host.clone());
            let artwork_root = artwork_root.unwrap_or_else(|| config.artwork_root.clone());
            artwork(&record, &host, &artwork_root)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn paths(config: &SyncConfig, platform: &str) -> Result<serde_json::Value> {
    let topology = StorageTopology::detect(&config.storage, config.current_sd);
    let cell = Arc::new(TopologyCell::new(topology));
    let resolver = FilesystemResolver::new(config.storage.clone(), Arc::clone(&cell));

    let paths = resolver.platform_paths(platform)?;
    let topology = cell.snapshot();
    Ok(json!({
        "topology": topology.as_ref(),
        "paths": paths,
    }))
}

fn artwork(record_path: &Path, host: &str, artwork_root: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(record_path)
        .with_context(|| format!("failed to read record {}", record_path.display()))?;
    let record: CatalogRecord = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse record {}", record_path.display()))?;

    let manifest = extract_manifest(&record);
    let downloads = plan_artwork_downloads(&record, host, artwork_root)?;
    tracing::info!(rom_id = record.id, artwork = downloads.len(), "planned artwork downloads");

    let saves = if host.trim().is_empty() {
        None
    } else {
        Some(saves_url(host, record.id)?)
    };

    Ok(json!({
        "rom_id": record.id,
        "manifest": manifest,
        "downloads": downloads,
        "saves_url": saves,
    }))
}
