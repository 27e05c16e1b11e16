//! Labor-practice sub-score
//!
//! Averages the "percent of children engaged in child labor" statistic from
//! the US Department of Labor ILAB dataset over up to two manufacturing
//! countries, then rescales it (see `rescale_child_labor`).

use crate::models::SubScore;
use crate::services::page_fetcher::{build_http_client, FetchError};
use crate::services::provider_error::ProviderError;
use crate::services::score_aggregator::rescale_child_labor;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Only the first two countries are consulted
pub const MAX_COUNTRIES: usize = 2;

pub const NO_COUNTRY_DATA_REASON: &str =
    "Unfortunately no information was found on these countries";

/// Source of per-country child labor statistics
#[async_trait]
pub trait LaborStatsSource: Send + Sync {
    /// Percentage of children working in `country`, or `None` when the dataset has no entry
    async fn working_percent(&self, country: &str) -> Result<Option<f64>, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct DolResponse {
    #[serde(default)]
    data: Vec<DolRecord>,
}

#[derive(Debug, Deserialize)]
struct DolRecord {
    #[serde(default)]
    working_percent: Value,
}

/// Interpret a `working_percent` value such as `"12.3%"`, `"12.3"` or `12.3`
pub fn parse_working_percent(value: &Value) -> Option<f64> {
    let percent = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok()?,
        _ => return None,
    };

    (percent.is_finite() && percent >= 0.0).then_some(percent)
}

/// US Department of Labor ILAB API client
pub struct DolClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl DolClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl LaborStatsSource for DolClient {
    async fn working_percent(&self, country: &str) -> Result<Option<f64>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("DOL API key".to_string()))?;

        let filter = serde_json::json!({
            "field": "country",
            "operator": "eq",
            "value": country,
        })
        .to_string();

        debug!(country = %country, "Querying DOL ILAB dataset");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("limit", "1"),
                ("offset", "0"),
                ("fields", "working_percent"),
                ("filter_object", filter.as_str()),
                ("X-API-KEY", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16(), self.base_url.clone()).into());
        }

        let body = response.text().await?;
        let parsed: DolResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(parsed
            .data
            .first()
            .and_then(|record| parse_working_percent(&record.working_percent)))
    }
}

pub struct LaborPracticeProvider {
    source: Arc<dyn LaborStatsSource>,
}

impl LaborPracticeProvider {
    pub fn new(source: Arc<dyn LaborStatsSource>) -> Self {
        Self { source }
    }

    /// Score the first two countries; countries without data are skipped
    pub async fn score(&self, countries: &[String]) -> SubScore {
        let consulted: Vec<&str> = countries
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .take(MAX_COUNTRIES)
            .collect();

        let mut percents = Vec::with_capacity(consulted.len());
        for country in &consulted {
            match self.source.working_percent(country).await {
                Ok(Some(percent)) => percents.push(percent),
                Ok(None) => debug!(country = %country, "No child labor data"),
                Err(e) => warn!(country = %country, error = %e, "Child labor lookup failed"),
            }
        }

        if percents.is_empty() {
            return SubScore::unknown(NO_COUNTRY_DATA_REASON);
        }

        let average = percents.iter().sum::<f64>() / percents.len() as f64;
        let score = rescale_child_labor(average);
        info!(average, score, countries = ?consulted, "Labor practice scored");

        SubScore::known(
            score,
            format!(
                "This score was created by evaluating the child labor practices of {} using Department of Labor statistics.",
                consulted.join(" and ")
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoreValue;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixtureStats {
        percents: HashMap<String, Option<f64>>,
        queried: Mutex<Vec<String>>,
    }

    impl FixtureStats {
        fn new(entries: &[(&str, Option<f64>)]) -> Arc<Self> {
            Arc::new(Self {
                percents: entries.iter().map(|(c, p)| (c.to_string(), *p)).collect(),
                queried: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LaborStatsSource for FixtureStats {
        async fn working_percent(&self, country: &str) -> Result<Option<f64>, ProviderError> {
            self.queried.lock().unwrap().push(country.to_string());
            match self.percents.get(country) {
                Some(percent) => Ok(*percent),
                None => Err(ProviderError::Malformed(format!("no fixture for {}", country))),
            }
        }
    }

    fn countries(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_working_percent() {
        assert_eq!(parse_working_percent(&json!("12.5%")), Some(12.5));
        assert_eq!(parse_working_percent(&json!(" 7 % ")), Some(7.0));
        assert_eq!(parse_working_percent(&json!(30)), Some(30.0));
        assert_eq!(parse_working_percent(&json!("n/a")), None);
        assert_eq!(parse_working_percent(&json!(-4)), None);
        assert_eq!(parse_working_percent(&Value::Null), None);
    }

    #[tokio::test]
    async fn test_average_of_two_countries() {
        let stats = FixtureStats::new(&[("Chad", Some(40.0)), ("India", Some(10.0))]);
        let provider = LaborPracticeProvider::new(stats);

        let sub = provider.score(&countries(&["Chad", "India"])).await;

        assert_eq!(sub.score, ScoreValue::Known(50.0));
        assert_eq!(
            sub.reason,
            "This score was created by evaluating the child labor practices of Chad and India using Department of Labor statistics."
        );
    }

    #[tokio::test]
    async fn test_country_without_data_skipped() {
        let stats = FixtureStats::new(&[("France", None), ("India", Some(10.0))]);
        let provider = LaborPracticeProvider::new(stats);

        let sub = provider.score(&countries(&["France", "India"])).await;
        assert_eq!(sub.score, ScoreValue::Known(80.0));
    }

    #[tokio::test]
    async fn test_only_first_two_countries_consulted() {
        let stats = FixtureStats::new(&[
            ("Chad", Some(10.0)),
            ("India", Some(10.0)),
            ("Somalia", Some(90.0)),
        ]);
        let provider = LaborPracticeProvider::new(stats.clone());

        let sub = provider.score(&countries(&["Chad", "India", "Somalia"])).await;

        assert_eq!(sub.score, ScoreValue::Known(80.0));
        assert_eq!(stats.queried.lock().unwrap().as_slice(), &["Chad", "India"]);
    }

    #[tokio::test]
    async fn test_high_child_labor_floors_at_zero() {
        let stats = FixtureStats::new(&[("Somalia", Some(60.0)), ("Chad", Some(45.0))]);
        let provider = LaborPracticeProvider::new(stats);

        let sub = provider.score(&countries(&["Somalia", "Chad"])).await;
        assert_eq!(sub.score, ScoreValue::Known(0.0));
    }

    #[tokio::test]
    async fn test_no_data_is_unknown() {
        let stats = FixtureStats::new(&[("France", None)]);
        let provider = LaborPracticeProvider::new(stats);

        let sub = provider.score(&countries(&["France", "Atlantis"])).await;

        assert!(sub.score.is_unknown());
        assert_eq!(sub.reason, NO_COUNTRY_DATA_REASON);
    }

    #[tokio::test]
    async fn test_no_countries_is_unknown() {
        let provider = LaborPracticeProvider::new(FixtureStats::new(&[]));
        let sub = provider.score(&[]).await;
        assert!(sub.score.is_unknown());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_not_configured() {
        let client = DolClient::new("http://dol.test", None, Duration::from_secs(5)).unwrap();
        let result = client.working_percent("Chad").await;
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }
}
