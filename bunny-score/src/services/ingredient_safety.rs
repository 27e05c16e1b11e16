//! Ingredient-safety sub-score
//!
//! Sends the product's ingredient list to the EWG Skin Deep "build your own"
//! endpoint and rescales the returned hazard rating onto 1-100.

use crate::models::SubScore;
use crate::services::page_fetcher::{build_http_client, FetchError};
use crate::services::provider_error::ProviderError;
use crate::services::score_aggregator::{rescale_ingredient_rating, ScoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const EWG_UUID: &str = "skindeepBuildYourOwn";

/// Source of ingredient hazard reports
#[async_trait]
pub trait IngredientReportSource: Send + Sync {
    /// Fetch a report for a comma-separated ingredient list
    async fn report(&self, ingredient_list: &str) -> Result<Value, ProviderError>;
}

/// EWG Skin Deep API client
pub struct EwgClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl EwgClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl IngredientReportSource for EwgClient {
    async fn report(&self, ingredient_list: &str) -> Result<Value, ProviderError> {
        tracing::debug!(base_url = %self.base_url, "Querying EWG Skin Deep");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("uuid", EWG_UUID), ("ingredients", ingredient_list)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16(), self.base_url.clone()).into());
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

/// Parse a rating such as `"3"`, `"3_4"` or `3` (suffix after `_` is ignored)
///
/// # Errors
/// Returns `ScoreError::InvalidRating` for non-numeric text or values outside 1-10.
pub fn parse_ewg_rating(raw: &str) -> Result<f64, ScoreError> {
    let head = raw.split('_').next().unwrap_or_default().trim();
    let rating: f64 = head
        .parse()
        .map_err(|_| ScoreError::InvalidRating(raw.to_string()))?;

    if !(1.0..=10.0).contains(&rating) {
        return Err(ScoreError::InvalidRating(raw.to_string()));
    }
    Ok(rating)
}

/// Pull the overall rating out of an EWG report
pub fn extract_rating(report: &Value) -> Result<f64, ScoreError> {
    match report.get("score") {
        Some(Value::Number(n)) => parse_ewg_rating(&n.to_string()),
        Some(Value::String(s)) => parse_ewg_rating(s),
        Some(other) => Err(ScoreError::InvalidRating(other.to_string())),
        None => Err(ScoreError::InvalidRating("missing score".to_string())),
    }
}

pub struct IngredientSafetyProvider {
    source: Arc<dyn IngredientReportSource>,
}

impl IngredientSafetyProvider {
    pub fn new(source: Arc<dyn IngredientReportSource>) -> Self {
        Self { source }
    }

    /// Score an ingredient list; any failure yields "unknown"
    pub async fn score(&self, ingredients: &[String]) -> SubScore {
        let listed: Vec<&str> = ingredients
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .collect();

        if listed.is_empty() {
            return SubScore::unknown("No ingredients were listed for this product");
        }

        let report = match self.source.report(&listed.join(", ")).await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "Ingredient report unavailable");
                return SubScore::unknown("Ingredient safety data could not be retrieved");
            }
        };

        let scored = extract_rating(&report)
            .and_then(|rating| rescale_ingredient_rating(rating).map(|score| (rating, score)));

        match scored {
            Ok((rating, score)) => {
                info!(rating, score, "Ingredient safety scored");
                SubScore::known(
                    score,
                    format!(
                        "EWG Skin Deep rated these ingredients {} on a 1-10 hazard scale (1 is lowest hazard)",
                        rating
                    ),
                )
            }
            Err(e) => {
                warn!(error = %e, "Ingredient report had no usable rating");
                SubScore::unknown(format!("Ingredient safety rating was not usable: {}", e))
            }
        }
    }
}
