//! Configuration resolution for bunny-score
//!
//! Provides two-tier API key resolution with ENV → TOML priority, and turns
//! the `[directory]` section into registry definitions and cache options.

use crate::models::RegistrySource;
use crate::services::CacheOptions;
use bunny_common::config::{DirectoryConfig, TomlConfig};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the Department of Labor API key
pub const DOL_API_KEY_ENV: &str = "BUNNY_DOL_API_KEY";

/// Resolve the Department of Labor API key
///
/// **Priority:** ENV → TOML
///
/// A missing key is not fatal: the labor sub-score then reports "unknown".
pub fn resolve_dol_api_key(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(DOL_API_KEY_ENV)
        .ok()
        .filter(|key| is_valid_key(key));
    let toml_key = toml_config
        .providers
        .dol_api_key
        .clone()
        .filter(|key| is_valid_key(key));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "DOL API key found in environment and TOML. Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("DOL API key loaded from environment variable");
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("DOL API key loaded from TOML config");
        return Some(key);
    }

    warn!(
        "DOL API key not configured; labor scores will be unknown. Set {} or \
         providers.dol_api_key in the config file",
        DOL_API_KEY_ENV
    );
    None
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Built-in registries with config overrides applied
///
/// A configured registry replaces the built-in one with the same id;
/// unknown ids are added after the built-ins.
pub fn resolve_registries(directory: &DirectoryConfig) -> Vec<RegistrySource> {
    let mut registries = vec![RegistrySource::leaping_bunny(), RegistrySource::ethicy_vegan()];

    for configured in &directory.registries {
        let source = RegistrySource::new(
            configured.id.clone(),
            configured
                .label
                .clone()
                .unwrap_or_else(|| configured.id.clone()),
            configured.base_url.clone(),
            configured.link_marker.clone(),
        );

        match registries.iter_mut().find(|r| r.id == source.id) {
            Some(existing) => {
                info!(registry = %source.id, base_url = %source.base_url, "Registry overridden by config");
                *existing = source;
            }
            None => {
                info!(registry = %source.id, base_url = %source.base_url, "Registry added by config");
                registries.push(source);
            }
        }
    }

    registries
}

pub fn cache_options(directory: &DirectoryConfig) -> CacheOptions {
    CacheOptions {
        ttl: Duration::from_secs(directory.cache_ttl_secs),
        max_pages: directory.max_pages,
    }
}

pub fn request_timeout(directory: &DirectoryConfig) -> Duration {
    Duration::from_secs(directory.request_timeout_secs)
}
