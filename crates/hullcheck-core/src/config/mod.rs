//! Configuration types for Hullcheck.
//!
//! Configuration is loaded from a single YAML file (`hullcheck.yaml` by
//! default). Every field has a default, so an absent file yields a working
//! setup that stores records under `.hullcheck/audits.json`.
//!
//! ```yaml
//! store:
//!   backend: file
//!   directory: /var/lib/hullcheck
//!   key: audits
//! log:
//!   level: debug
//! ```

pub mod store;

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use store::{StorageBackend, StoreConfig};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "HULLCHECK_CONFIG";

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "hullcheck.yaml";

/// Complete Hullcheck configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HullcheckConfig {
    /// Audit store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive, e.g. "info" or "hullcheck_audit=debug".
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl HullcheckConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from the first source that applies:
    /// an explicit path, `HULLCHECK_CONFIG`, `hullcheck.yaml` in the working
    /// directory, or built-in defaults.
    ///
    /// An explicitly named file must exist; the implicit default file is
    /// optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = env::var(CONFIG_ENV)
            && !path.is_empty()
        {
            return Self::from_file(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            return Self::from_file(fallback);
        }
        Ok(Self::default())
    }
}
