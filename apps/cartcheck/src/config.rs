//! # App Configuration
//!
//! Layered configuration for the cartcheck app.
//!
//! ## Precedence
//! ```text
//! built-in defaults  <  cartcheck.toml  <  environment variables
//! ```
//!
//! ## File Format
//! ```toml
//! [database]
//! path = "/var/lib/cartcheck/catalog.db"
//! max_connections = 5
//! acquire_timeout_secs = 30
//!
//! [logging]
//! filter = "info,cartcheck=debug,sqlx=warn"
//! ```
//!
//! ## Environment Variables
//! - `CARTCHECK_DB_PATH`: catalog database file
//! - `CARTCHECK_MAX_CONNECTIONS`: pool size
//! - `CARTCHECK_LOG`: tracing filter (`RUST_LOG` still wins at subscriber init)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use cartcheck_db::DbConfig;

use crate::error::ConfigError;

/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "info,cartcheck=debug,sqlx=warn";

/// Config file name looked up in the platform config directory.
const CONFIG_FILE_NAME: &str = "cartcheck.toml";

// =============================================================================
// Configuration
// =============================================================================

/// Top-level app configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSection,
    pub logging: LoggingSection,

    /// File the values were read from, if any. Loading runs before the
    /// tracing subscriber exists, so callers log this once it does.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// `[database]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// Catalog database file.
    pub path: PathBuf,

    /// Maximum pool connections.
    pub max_connections: u32,

    /// Seconds a validation waits for a free connection.
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        DatabaseSection {
            path: PathBuf::from("./cartcheck_dev.db"),
            max_connections: 5,
            acquire_timeout_secs: 30,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `tracing_subscriber::EnvFilter` directive string.
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, the platform default
    /// location is used if a file is there, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => AppConfig::default(),
            },
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses TOML config text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `CARTCHECK_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("CARTCHECK_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("CARTCHECK_MAX_CONNECTIONS") {
            self.database.max_connections = max.parse().map_err(|_| {
                ConfigError::Invalid(format!("CARTCHECK_MAX_CONNECTIONS is not a number: {}", max))
            })?;
        }

        if let Some(filter) = lookup("CARTCHECK_LOG") {
            self.logging.filter = filter;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if self.database.acquire_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "database.acquire_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Builds the pool configuration for the catalog database.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path)
            .max_connections(self.database.max_connections)
            .acquire_timeout(Duration::from_secs(self.database.acquire_timeout_secs))
    }
}

/// Default config file location (`<config dir>/cartcheck/cartcheck.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "cartcheck", "cartcheck")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
