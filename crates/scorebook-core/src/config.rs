//! Engine configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then `SCOREBOOK_*`
//! environment variables (e.g. `SCOREBOOK_MAX_UPLOAD_BYTES=1048576`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{Result, ScorebookError};

pub const ENV_PREFIX: &str = "SCOREBOOK";
pub const DEFAULT_DATABASE_PATH: &str = "data/db.sqlite";
pub const DEFAULT_UPLOAD_DIR: &str = "data/uploads/scores";
pub const DEFAULT_UPLOAD_ROUTE: &str = "/uploads/scores";
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;
pub const DEFAULT_WRITE_BUDGET_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Directory holding score page images
    pub upload_dir: PathBuf,
    /// Public path prefix images are served under
    pub upload_route: String,
    /// Largest accepted decoded image, per page
    pub max_upload_bytes: u64,
    /// Upper bound on time spent writing blobs during one sync
    pub write_budget_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            upload_route: DEFAULT_UPLOAD_ROUTE.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            write_budget_secs: DEFAULT_WRITE_BUDGET_SECS,
        }
    }
}

impl SyncConfig {
    /// Load configuration from defaults, `file` (if given) and the environment
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a source cannot be read or parsed, or if
    /// the resulting values are out of range.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        );

        let loaded: SyncConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ScorebookError::InvalidConfig {
                message: e.to_string(),
            })?;
        loaded.normalized()
    }

    /// Validate ranges and canonicalize the upload route
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero size limit or write budget.
    pub fn normalized(mut self) -> Result<Self> {
        if self.max_upload_bytes == 0 {
            return Err(ScorebookError::InvalidConfig {
                message: "max_upload_bytes must be positive".to_string(),
            });
        }
        if self.write_budget_secs == 0 {
            return Err(ScorebookError::InvalidConfig {
                message: "write_budget_secs must be positive".to_string(),
            });
        }
        self.upload_route = normalize_route(&self.upload_route);
        Ok(self)
    }

    pub fn write_budget(&self) -> Duration {
        Duration::from_secs(self.write_budget_secs)
    }
}

/// Leading slash, no trailing slash
pub fn normalize_route(route: &str) -> String {
    let trimmed = route.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_route() {
        assert_eq!(normalize_route("uploads/scores/"), "/uploads/scores");
        assert_eq!(normalize_route("/img"), "/img");
        assert_eq!(normalize_route("/"), "");
    }

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.write_budget(), Duration::from_secs(60));
        assert_eq!(config.upload_route, "/uploads/scores");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "upload_route = \"media/\"\nmax_upload_bytes = 1024").unwrap();

        let config = SyncConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.upload_route, "/media");
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.upload_dir, PathBuf::from(DEFAULT_UPLOAD_DIR));
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let config = SyncConfig {
            max_upload_bytes: 0,
            ..SyncConfig::default()
        };
        assert!(matches!(
            config.normalized(),
            Err(ScorebookError::InvalidConfig { .. })
        ));
    }
}
