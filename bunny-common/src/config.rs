//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `BUNNY_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/bunny-score/config.toml`)
//!
//! A missing config file is never fatal: the service logs a warning and
//! starts with compiled defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "BUNNY_CONFIG";

/// Default directory cache TTL (1 hour)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default per-request network timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Hard stop on registry pagination
pub const DEFAULT_MAX_PAGES: u32 = 500;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5790;

/// Default EWG Skin Deep endpoint
pub const DEFAULT_EWG_BASE_URL: &str = "https://api.ewg.org/skin_deep/v4/build_your_own";

/// Default US Department of Labor ILAB endpoint
pub const DEFAULT_DOL_BASE_URL: &str =
    "https://apiprod.dol.gov/v4/get/ILAB/LaborShield_ReportingData/json";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub directory: DirectoryConfig,
    pub providers: ProvidersConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g. "info", "bunny_score=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Brand directory fetch and cache settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DirectoryConfig {
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub max_pages: u32,
    /// Registry overrides; entries replace the built-in registry with the same id
    pub registries: Vec<RegistryConfig>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_pages: DEFAULT_MAX_PAGES,
            registries: Vec::new(),
        }
    }
}

/// One brand registry definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryConfig {
    pub id: String,
    /// Human-readable name used in score reasons (defaults to the id)
    #[serde(default)]
    pub label: Option<String>,
    pub base_url: String,
    /// Substring a link target must contain to count as a brand entry
    pub link_marker: String,
}

/// External sub-score provider settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProvidersConfig {
    pub dol_api_key: Option<String>,
    pub dol_base_url: String,
    pub ewg_base_url: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            dol_api_key: None,
            dol_base_url: DEFAULT_DOL_BASE_URL.to_string(),
            ewg_base_url: DEFAULT_EWG_BASE_URL.to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse a config file
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, `Error::Config` if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
    }

    /// Load config with graceful degradation
    ///
    /// Missing or unreadable files fall back to defaults with a warning.
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            warn!("No config file found, using compiled defaults");
            return Ok(Self::default());
        };

        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(Error::Io(e)) => {
                warn!(
                    "Config file {} not readable ({}), using compiled defaults",
                    path.display(),
                    e
                );
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }
}

/// Resolve config file path
///
/// Priority: CLI argument → `BUNNY_CONFIG` → platform config dir (only if the file exists)
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|d| d.join("bunny-score").join("config.toml"))
        .filter(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.directory.cache_ttl_secs, 3600);
        assert!(config.directory.registries.is_empty());
        assert!(config.providers.dol_api_key.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: TomlConfig = toml::from_str(
            r#"
            [directory]
            max_pages = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.directory.max_pages, 3);
        assert_eq!(config.directory.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
        assert_eq!(config.providers.ewg_base_url, DEFAULT_EWG_BASE_URL);
    }

    #[test]
    fn test_registry_label_optional() {
        let config: TomlConfig = toml::from_str(
            r#"
            [[directory.registries]]
            id = "leaping-bunny"
            base_url = "http://localhost/guide"
            link_marker = "/brand/"
            "#,
        )
        .unwrap();

        let registry = &config.directory.registries[0];
        assert_eq!(registry.id, "leaping-bunny");
        assert!(registry.label.is_none());
    }
}
