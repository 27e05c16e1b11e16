//! bunny-score library interface
//!
//! Brand-registry matching and product scoring, exposed over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use crate::models::{ETHICY_VEGAN_ID, LEAPING_BUNNY_ID};
use crate::services::{
    AnimalWelfareChecker, DirectoryCache, DolClient, EwgClient, HttpPageFetcher,
    IngredientSafetyProvider, LaborPracticeProvider, PageFetcher, ScoringEngine,
};
use axum::Router;
use bunny_common::config::TomlConfig;
use bunny_common::{Error, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// One cache per configured registry, in configuration order
    pub registries: Arc<Vec<Arc<DirectoryCache>>>,
    pub engine: Arc<ScoringEngine>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(registries: Vec<Arc<DirectoryCache>>, engine: ScoringEngine) -> Self {
        Self {
            registries: Arc::new(registries),
            engine: Arc::new(engine),
            startup_time: Utc::now(),
        }
    }

    /// Wire live HTTP clients from configuration
    ///
    /// # Errors
    /// `Error::Config` if an HTTP client cannot be built, the cache TTL is out
    /// of range, or a built-in registry is missing.
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let timeout = crate::config::request_timeout(&config.directory);
        let options = crate::config::cache_options(&config.directory);

        let fetcher: Arc<dyn PageFetcher> = Arc::new(
            HttpPageFetcher::new(timeout)
                .map_err(|e| Error::Config(format!("HTTP client: {}", e)))?,
        );

        let registries = crate::config::resolve_registries(&config.directory)
            .into_iter()
            .map(|source| {
                DirectoryCache::new(source, Arc::clone(&fetcher), options.clone())
                    .map(Arc::new)
                    .map_err(|e| Error::Config(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let find = |id: &str| {
            registries
                .iter()
                .find(|cache| cache.source().id == id)
                .cloned()
                .ok_or_else(|| Error::Config(format!("registry '{}' is not configured", id)))
        };
        let animal_welfare = AnimalWelfareChecker::new(find(LEAPING_BUNNY_ID)?, find(ETHICY_VEGAN_ID)?);

        let ewg = EwgClient::new(config.providers.ewg_base_url.clone(), timeout)
            .map_err(|e| Error::Config(format!("EWG client: {}", e)))?;
        let dol = DolClient::new(
            config.providers.dol_base_url.clone(),
            crate::config::resolve_dol_api_key(config),
            timeout,
        )
        .map_err(|e| Error::Config(format!("DOL client: {}", e)))?;

        let engine = ScoringEngine::new(
            animal_welfare,
            IngredientSafetyProvider::new(Arc::new(ewg)),
            LaborPracticeProvider::new(Arc::new(dol)),
        );

        Ok(Self::new(registries, engine))
    }

    pub fn registry(&self, id: &str) -> Option<&DirectoryCache> {
        self.registries
            .iter()
            .find(|cache| cache.source().id == id)
            .map(|cache| cache.as_ref())
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::registry_routes())
        .merge(api::score_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
