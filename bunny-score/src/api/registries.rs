//! Brand registry endpoints
//!
//! - `GET /registries` lists configured registries and their cache state
//! - `POST /registries/:id/check` fuzzy-matches a company against one registry
//! - `POST /registries/:id/refresh` refetches a registry, keeping the old list on failure

use crate::models::MatchResult;
use crate::services::check_registry;
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySummary {
    pub id: String,
    pub label: String,
    pub base_url: String,
    /// Entries in the valid cached list; `None` when nothing is cached
    pub cached_entries: Option<usize>,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Error from the latest fetch, until a later fetch succeeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub company_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub id: String,
    pub entries: usize,
    pub fetched_at: DateTime<Utc>,
}

/// GET /registries
pub async fn list_registries(State(state): State<AppState>) -> Json<Vec<RegistrySummary>> {
    let mut summaries = Vec::with_capacity(state.registries.len());

    for cache in state.registries.iter() {
        let cached = cache.cached();
        let source = cache.source();
        summaries.push(RegistrySummary {
            id: source.id.clone(),
            label: source.label.clone(),
            base_url: source.base_url.clone(),
            cached_entries: cached.as_ref().map(|list| list.len()),
            fetched_at: cached.as_ref().map(|list| list.fetched_at()),
            last_error: cache.last_failure(),
        });
    }

    Json(summaries)
}

/// POST /registries/:id/check
///
/// **Request:** `{"companyName": "Lush"}`
/// **Response:** `{"found": true, "bestMatch": "LUSH", "score": 1.0}`
///
/// An unreachable registry is not an HTTP error: the result carries
/// `found: false` plus an `error` field.
///
/// **Errors:**
/// - 404 Not Found: unknown registry id
/// - 400 Bad Request: blank company name
pub async fn check_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CheckRequest>,
) -> ApiResult<Json<MatchResult>> {
    let cache = state
        .registry(&id)
        .ok_or_else(|| ApiError::NotFound(format!("registry '{}'", id)))?;

    let company_name = payload.company_name.trim();
    if company_name.is_empty() {
        return Err(ApiError::BadRequest("companyName cannot be empty".to_string()));
    }

    Ok(Json(check_registry(cache, company_name).await))
}

/// POST /registries/:id/refresh
///
/// **Errors:**
/// - 404 Not Found: unknown registry id
/// - 502 Bad Gateway: the registry's first page could not be fetched
pub async fn refresh_registry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RefreshResponse>> {
    let cache = state
        .registry(&id)
        .ok_or_else(|| ApiError::NotFound(format!("registry '{}'", id)))?;

    match cache.refresh().await {
        Ok(list) => {
            info!(registry = %id, entries = list.len(), "Registry refreshed on request");
            Ok(Json(RefreshResponse {
                id,
                entries: list.len(),
                fetched_at: list.fetched_at(),
            }))
        }
        Err(e) => {
            warn!(registry = %id, error = %e, "Registry refresh failed");
            Err(e.into())
        }
    }
}

/// Build registry routes
pub fn registry_routes() -> Router<AppState> {
    Router::new()
        .route("/registries", get(list_registries))
        .route("/registries/:id/check", post(check_company))
        .route("/registries/:id/refresh", post(refresh_registry))
}
