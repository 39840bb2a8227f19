//! TOML configuration for the launcher.
//!
//! Provides two loading methods:
//! - `default_config()` - The embedded defaults compiled into the binary
//! - `load_config(path)` - A user config file, falling back per field to the defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{LauncherError, Result};
use crate::process::params::GeneticParameters;

/// Default configuration embedded in the binary at compile time.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// File name of the user configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub runtime: RuntimeConfig,
    pub defaults: GeneticParameters,
    pub logging: LoggingConfig,
}

/// Where the runtime comes from and whether to look for updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// GitHub `owner/name` publishing the runtime releases.
    pub repository: String,
    pub api_base: String,
    pub check_updates: bool,
    /// A locally built runtime. When set, nothing is downloaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            repository: "Seggan/duosplit".to_string(),
            api_base: "https://api.github.com".to_string(),
            check_updates: true,
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            defaults: GeneticParameters::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl LauncherConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: LauncherConfig =
            toml::from_str(content).map_err(|e| LauncherError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| LauncherError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.runtime.api_base).map_err(|e| {
            LauncherError::Config(format!(
                "runtime.api_base '{}' is not a valid URL: {}",
                self.runtime.api_base, e
            ))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(LauncherError::Config(format!(
                "runtime.api_base must be an http(s) URL, got '{}'",
                self.runtime.api_base
            )));
        }

        let mut parts = self.runtime.repository.split('/');
        let valid_repo = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
        );
        if !valid_repo {
            return Err(LauncherError::Config(format!(
                "runtime.repository must look like 'owner/name', got '{}'",
                self.runtime.repository
            )));
        }
        Ok(())
    }
}

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &Path) -> Result<LauncherConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = LauncherConfig::from_toml(&content)?;
    info!("Loaded configuration from {:?}", path);
    Ok(config)
}

/// Load the file at `path` if it exists, otherwise the embedded defaults.
pub fn load_or_default(path: &Path) -> Result<LauncherConfig> {
    if path.exists() {
        load_config(path)
    } else {
        debug!("No config file at {:?}, using defaults", path);
        default_config()
    }
}

/// Get the default configuration embedded in the binary.
pub fn default_config() -> Result<LauncherConfig> {
    LauncherConfig::from_toml(DEFAULT_CONFIG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = default_config().unwrap();
        assert_eq!(config.runtime.repository, "Seggan/duosplit");
        assert!(config.runtime.check_updates);
        assert!(config.runtime.path.is_none());
    }

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        assert_eq!(default_config().unwrap(), LauncherConfig::default());
    }

    #[test]
    fn test_partial_file_falls_back_per_field() {
        let config = LauncherConfig::from_toml(
            r#"
            [runtime]
            check_updates = false

            [defaults]
            generations = 500
            "#,
        )
        .unwrap();
        assert!(!config.runtime.check_updates);
        assert_eq!(config.runtime.api_base, "https://api.github.com");
        assert_eq!(config.defaults.generations, 500);
        assert_eq!(config.defaults.population_size, 100);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_runtime_path_override() {
        let config = LauncherConfig::from_toml(
            r#"
            [runtime]
            path = "/opt/duosplit/duosplit"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.runtime.path,
            Some(PathBuf::from("/opt/duosplit/duosplit"))
        );
    }

    #[test]
    fn test_invalid_repository_rejected() {
        let result = LauncherConfig::from_toml(
            r#"
            [runtime]
            repository = "duosplit"
            "#,
        );
        assert!(matches!(result, Err(LauncherError::Config(_))));
    }

    #[test]
    fn test_invalid_api_base_rejected() {
        let result = LauncherConfig::from_toml(
            r#"
            [runtime]
            api_base = "ftp://example.com"
            "#,
        );
        assert!(matches!(result, Err(LauncherError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = LauncherConfig::from_toml("[runtime\ncheck_updates = ");
        assert!(matches!(result, Err(LauncherError::Config(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, LauncherConfig::default());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = LauncherConfig::default();
        config.defaults.elitism = 8;
        let text = config.to_toml().unwrap();
        assert_eq!(LauncherConfig::from_toml(&text).unwrap(), config);
    }
}
