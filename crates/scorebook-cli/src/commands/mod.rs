//! Subcommand implementations and the options they share

pub mod config;
pub mod migrate;
pub mod scores;
pub mod sync;

use clap::Args;
use scorebook_core::SyncConfig;
use scorebook_engine::SyncEngine;
use serde::Serialize;
use std::path::PathBuf;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Options accepted by every subcommand; each overrides the loaded config
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// SQLite database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding score page images
    #[arg(long, global = true)]
    pub uploads: Option<PathBuf>,

    /// Public path prefix for image URLs
    #[arg(long, global = true)]
    pub route: Option<String>,

    /// Largest accepted page image, in bytes
    #[arg(long, global = true)]
    pub max_bytes: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

impl GlobalArgs {
    /// Defaults, then the config file and environment, then these flags
    pub fn load_config(&self) -> Result<SyncConfig, Box<dyn std::error::Error>> {
        let mut config = SyncConfig::load(self.config.as_deref())?;
        if let Some(db) = &self.db {
            config.database_path = db.clone();
        }
        if let Some(uploads) = &self.uploads {
            config.upload_dir = uploads.clone();
        }
        if let Some(route) = &self.route {
            config.upload_route = route.clone();
        }
        if let Some(max_bytes) = self.max_bytes {
            config.max_upload_bytes = max_bytes;
        }
        Ok(config.normalized()?)
    }

    pub fn engine(&self) -> Result<SyncEngine, Box<dyn std::error::Error>> {
        Ok(SyncEngine::new(self.load_config()?))
    }
}

/// Write `value` to stdout as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
