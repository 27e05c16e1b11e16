//! `GET /health`: service liveness plus the fetch state of each registry
//!
//! Status is "degraded" while any registry's most recent directory fetch
//! failed, whether that fetch came from a registry check, a refresh, or a
//! product score.

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::services::DirectoryCache;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub registries: Vec<RegistryHealth>,
    /// First failing registry's message, in configuration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegistryHealth {
    pub id: String,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl RegistryHealth {
    fn of(cache: &DirectoryCache) -> Self {
        Self {
            id: cache.source().id.clone(),
            cached: cache.cached().is_some(),
            last_error: cache.last_failure(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let registries: Vec<RegistryHealth> = state
        .registries
        .iter()
        .map(|cache| RegistryHealth::of(cache))
        .collect();

    let last_error = registries.iter().find_map(|r| r.last_error.clone());

    Json(HealthResponse {
        status: if last_error.is_some() { "degraded" } else { "ok" },
        module: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: Utc::now()
            .signed_duration_since(state.startup_time)
            .num_seconds()
            .max(0) as u64,
        registries,
        last_error,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
