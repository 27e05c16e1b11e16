//! Product scoring endpoints

use crate::models::{AggregateResult, ProductInfo};
use crate::services::{parse_country_list, parse_product_info};
use crate::{ApiError, ApiResult, AppState};
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub product: ProductInfo,
    #[serde(default)]
    pub countries: Vec<String>,
}

/// Raw model answers, parsed server-side
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseScoreRequest {
    /// Product-extraction answer
    pub raw: String,
    /// Explicit manufacturing countries; take precedence over `countries_raw`
    #[serde(default)]
    pub countries: Option<Vec<String>>,
    /// Manufacturing-country answer
    #[serde(default)]
    pub countries_raw: Option<String>,
}

/// POST /score
///
/// **Request:** `{"product": {"Company name": "Lush", ...}, "countries": ["India"]}`
///
/// **Errors:**
/// - 400 Bad Request: blank company name
pub async fn score_product(
    State(state): State<AppState>,
    Json(payload): Json<ScoreRequest>,
) -> ApiResult<Json<AggregateResult>> {
    let result = state
        .engine
        .score_product(&payload.product, &payload.countries)
        .await?;
    Ok(Json(result))
}

/// POST /score/parse
///
/// A country answer that cannot be parsed means no countries, so the labor
/// score is "unknown" rather than the request failing.
///
/// **Errors:**
/// - 400 Bad Request: product text has no usable JSON object or company name
pub async fn score_parsed(
    State(state): State<AppState>,
    Json(payload): Json<ParseScoreRequest>,
) -> ApiResult<Json<AggregateResult>> {
    let product = parse_product_info(&payload.raw)
        .map_err(|e| ApiError::BadRequest(format!("Product text not usable: {}", e)))?;

    let countries = match (payload.countries, payload.countries_raw) {
        (Some(countries), _) => countries,
        (None, Some(raw)) => parse_country_list(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Country answer not usable");
            Vec::new()
        }),
        (None, None) => Vec::new(),
    };
    debug!(company = %product.company_name, countries = ?countries, "Parsed model output");

    let result = state.engine.score_product(&product, &countries).await?;
    Ok(Json(result))
}

/// Build scoring routes
pub fn score_routes() -> Router<AppState> {
    Router::new()
        .route("/score", post(score_product))
        .route("/score/parse", post(score_parsed))
}
