//! # Catalog Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SALVAGE_DB_PATH=./data/salvage.db                                  │
//! │     SALVAGE_REQUEST_TIMEOUT_MS=2000                                    │
//! │     SALVAGE_DEFAULT_LIMIT=50                                           │
//! │     SALVAGE_LOG=debug                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/catalog/catalog.toml (Linux)                             │
//! │     ~/Library/Application Support/com.salvage.catalog/catalog.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "salvage.db"
//! max_connections = 5
//!
//! [catalog]
//! default_limit = 25
//! request_timeout_ms = 5000
//! facet_classification = true
//! facet_vendor = true
//!
//! [logging]
//! level = "info,salvage=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use salvage_core::{PageSize, DEFAULT_PAGE_SIZE};
use salvage_db::DbConfig;

use crate::error::{CatalogError, CatalogResult};

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("salvage.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

/// Per-request behavior of the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Page size used when a request names none. Must be an allowed size.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Budget for the concurrent fetch of one request (milliseconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Compute classification facet counts.
    #[serde(default = "default_true")]
    pub facet_classification: bool,

    /// Compute vendor facet counts.
    #[serde(default = "default_true")]
    pub facet_vendor: bool,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_request_timeout() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            default_limit: default_limit(),
            request_timeout_ms: default_request_timeout(),
            facet_classification: true,
            facet_vendor: true,
        }
    }
}

impl CatalogSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Configured default page size, falling back to the built-in default
    /// for a value that did not pass validation.
    pub fn default_page_size(&self) -> PageSize {
        PageSize::new(self.default_limit).unwrap_or_default()
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    crate::logging::DEFAULT_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: default_log_level(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl CatalogConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (catalog.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CatalogResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading catalog config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load catalog config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CatalogResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CatalogError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Catalog config saved");
        Ok(())
    }

    pub fn validate(&self) -> CatalogResult<()> {
        if self.catalog.request_timeout_ms == 0 {
            return Err(CatalogError::Config(
                "request_timeout_ms must be greater than 0".into(),
            ));
        }

        if PageSize::new(self.catalog.default_limit).is_err() {
            return Err(CatalogError::Config(format!(
                "default_limit must be one of {:?}, got {}",
                PageSize::ALLOWED,
                self.catalog.default_limit
            )));
        }

        if self.database.max_connections == 0 {
            return Err(CatalogError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from a variable lookup. Unparseable values are
    /// ignored with a warning.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("SALVAGE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(timeout) = var("SALVAGE_REQUEST_TIMEOUT_MS") {
            match timeout.parse::<u64>() {
                Ok(ms) => self.catalog.request_timeout_ms = ms,
                Err(_) => warn!(value = %timeout, "Ignoring invalid SALVAGE_REQUEST_TIMEOUT_MS"),
            }
        }

        if let Some(limit) = var("SALVAGE_DEFAULT_LIMIT") {
            match limit.parse::<PageSize>() {
                Ok(size) => self.catalog.default_limit = size.get(),
                Err(_) => warn!(value = %limit, "Ignoring invalid SALVAGE_DEFAULT_LIMIT"),
            }
        }

        if let Some(level) = var("SALVAGE_LOG") {
            self.logging.level = level;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "salvage", "catalog")
            .map(|dirs| dirs.config_dir().join("catalog.toml"))
    }

    /// Connection settings for [`salvage_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert_eq!(config.catalog.default_limit, 25);
        assert_eq!(config.catalog.request_timeout(), Duration::from_secs(5));
        assert!(config.catalog.facet_classification);
        assert!(config.catalog.facet_vendor);
        assert_eq!(config.logging.level, "info,salvage=debug,sqlx=warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: CatalogConfig = toml::from_str(
            r#"
            [catalog]
            default_limit = 50
            facet_vendor = false
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.default_limit, 50);
        assert!(!config.catalog.facet_vendor);
        assert_eq!(config.catalog.request_timeout_ms, 5000);
        assert_eq!(config.database.path, PathBuf::from("salvage.db"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = CatalogConfig::default();

        config.catalog.request_timeout_ms = 0;
        assert!(config.validate().unwrap_err().is_config_error());

        config.catalog.request_timeout_ms = 100;
        config.catalog.default_limit = 30;
        assert!(config.validate().is_err());

        config.catalog.default_limit = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CatalogConfig::default();
        config.apply_overrides(vars(&[
            ("SALVAGE_DB_PATH", "/tmp/yard.db"),
            ("SALVAGE_REQUEST_TIMEOUT_MS", "750"),
            ("SALVAGE_DEFAULT_LIMIT", "12"),
            ("SALVAGE_LOG", "warn"),
        ]));

        assert_eq!(config.database.path, PathBuf::from("/tmp/yard.db"));
        assert_eq!(config.catalog.request_timeout_ms, 750);
        assert_eq!(config.catalog.default_limit, 12);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let mut config = CatalogConfig::default();
        config.apply_overrides(vars(&[
            ("SALVAGE_REQUEST_TIMEOUT_MS", "soon"),
            ("SALVAGE_DEFAULT_LIMIT", "30"),
        ]));

        assert_eq!(config.catalog.request_timeout_ms, 5000);
        assert_eq!(config.catalog.default_limit, 25);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("salvage-catalog-missing/catalog.toml");
        let config = CatalogConfig::load_or_default(Some(path));
        assert_eq!(config.catalog.default_page_size(), PageSize::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("salvage-catalog-{}", std::process::id()));
        let path = dir.join("catalog.toml");

        let mut config = CatalogConfig::default();
        config.catalog.default_limit = 50;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[catalog]"));

        let loaded: CatalogConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.catalog, config.catalog);

        std::fs::remove_dir_all(&dir).ok();
    }
}
