//! Animal-welfare sub-score
//!
//! Checks a company against the cruelty-free registry and the vegan registry
//! concurrently, then combines the two verdicts:
//! 75 points for a cruelty-free listing, 25 for a vegan listing.

use crate::models::MatchResult;
use crate::services::directory_cache::DirectoryCache;
use crate::services::fuzzy_matcher::fuzzy_match;
use crate::services::score_aggregator::ScoreError;
use std::sync::Arc;
use tracing::{debug, warn};

pub const CRUELTY_FREE_WEIGHT: f64 = 75.0;
pub const VEGAN_WEIGHT: f64 = 25.0;

/// Look a company up in one registry
///
/// A registry that cannot be fetched yields a not-found result carrying the
/// error, so the caller gets "no verdict" instead of a failure.
pub async fn check_registry(cache: &DirectoryCache, company_name: &str) -> MatchResult {
    match cache.fetch_all_brands().await {
        Ok(list) => {
            let result = fuzzy_match(company_name, list.entries());
            debug!(
                registry = %cache.source().id,
                company = %company_name,
                found = result.found(),
                score = result.score(),
                best_match = ?result.best_match(),
                "Registry lookup complete"
            );
            result
        }
        Err(e) => {
            warn!(
                registry = %cache.source().id,
                company = %company_name,
                error = %e,
                "Registry unavailable, no verdict"
            );
            MatchResult::unavailable(e.to_string())
        }
    }
}

/// Both registry verdicts plus the combined score
///
/// The score is always a number: an unreachable registry counts as not listed.
#[derive(Debug, Clone)]
pub struct AnimalWelfareVerdict {
    pub cruelty_free: MatchResult,
    pub vegan: MatchResult,
    pub score: f64,
    pub reason: String,
}

pub struct AnimalWelfareChecker {
    cruelty_free: Arc<DirectoryCache>,
    vegan: Arc<DirectoryCache>,
}

impl AnimalWelfareChecker {
    pub fn new(cruelty_free: Arc<DirectoryCache>, vegan: Arc<DirectoryCache>) -> Self {
        Self {
            cruelty_free,
            vegan,
        }
    }

    /// # Errors
    /// Returns `ScoreError::MissingCompany` for a blank company name.
    pub async fn check(&self, company_name: &str) -> Result<AnimalWelfareVerdict, ScoreError> {
        let company_name = company_name.trim();
        if company_name.is_empty() {
            return Err(ScoreError::MissingCompany);
        }

        let (cruelty_free, vegan) = tokio::join!(
            check_registry(&self.cruelty_free, company_name),
            check_registry(&self.vegan, company_name),
        );

        let score = combine(cruelty_free.found(), vegan.found());
        let reason = format!(
            "{} and {}",
            self.cruelty_free_reason(company_name, &cruelty_free),
            self.vegan_reason(&vegan)
        );

        Ok(AnimalWelfareVerdict {
            cruelty_free,
            vegan,
            score,
            reason,
        })
    }

    fn cruelty_free_reason(&self, company_name: &str, result: &MatchResult) -> String {
        let label = &self.cruelty_free.source().label;
        match (result.found(), result.best_match(), result.error()) {
            (true, Some(best), _) => {
                format!("{} is {} certified (matched \"{}\")", company_name, label, best)
            }
            (_, _, Some(_)) => format!(
                "{} certification for {} could not be checked",
                label, company_name
            ),
            _ => format!("{} is not {} certified", company_name, label),
        }
    }

    fn vegan_reason(&self, result: &MatchResult) -> String {
        let label = &self.vegan.source().label;
        if result.found() {
            format!("listed as vegan on {}", label)
        } else if result.error().is_some() {
            format!("vegan listing on {} could not be checked", label)
        } else {
            format!("not listed as vegan on {}", label)
        }
    }
}

/// Weighted combination of the two registry verdicts, always within 0-100
pub fn combine(cruelty_free: bool, vegan: bool) -> f64 {
    let mut score = 0.0;
    if cruelty_free {
        score += CRUELTY_FREE_WEIGHT;
    }
    if vegan {
        score += VEGAN_WEIGHT;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegistrySource;
    use crate::services::directory_cache::CacheOptions;
    use crate::services::page_fetcher::{FetchError, PageFetcher};
    use async_trait::async_trait;

    /// Every URL returns the same page; base URL "down://" fails
    struct StaticFetcher(String);

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
            if url.starts_with("down://") {
                return Err(FetchError::NetworkError("connection refused".to_string()));
            }
            if url.contains("page=") {
                return Ok(String::new());
            }
            Ok(self.0.clone())
        }
    }

    fn registry(id: &str, label: &str, base: &str, marker: &str, html: &str) -> Arc<DirectoryCache> {
        Arc::new(
            DirectoryCache::new(
                RegistrySource::new(id, label, base, marker),
                Arc::new(StaticFetcher(html.to_string())),
                CacheOptions::default(),
            )
            .unwrap(),
        )
    }

    fn checker(bunny_base: &str, vegan_base: &str) -> AnimalWelfareChecker {
        AnimalWelfareChecker::new(
            registry(
                "leaping-bunny",
                "Leaping Bunny",
                bunny_base,
                "/brand/",
                r#"<a href="/brand/lush">LUSH</a><a href="/brand/aveda">Aveda</a>"#,
            ),
            registry(
                "ethicy-vegan",
                "ethicy.com",
                vegan_base,
                "/question/is-",
                r#"<a href="/question/is-lush-vegan">Lush</a>"#,
            ),
        )
    }

    #[test]
    fn test_combine_weights() {
        assert_eq!(combine(false, false), 0.0);
        assert_eq!(combine(false, true), 25.0);
        assert_eq!(combine(true, false), 75.0);
        assert_eq!(combine(true, true), 100.0);
    }

    #[tokio::test]
    async fn test_cruelty_free_and_vegan() {
        let verdict = checker("http://bunny.test", "http://vegan.test")
            .check("Lush")
            .await
            .unwrap();

        assert_eq!(verdict.score, 100.0);
        assert_eq!(
            verdict.reason,
            "Lush is Leaping Bunny certified (matched \"LUSH\") and listed as vegan on ethicy.com"
        );
    }

    #[tokio::test]
    async fn test_cruelty_free_only() {
        let verdict = checker("http://bunny.test", "http://vegan.test")
            .check("Aveda")
            .await
            .unwrap();

        assert_eq!(verdict.score, 75.0);
        assert!(!verdict.vegan.found());
        assert!(verdict.reason.ends_with("not listed as vegan on ethicy.com"));
    }

    #[tokio::test]
    async fn test_unlisted_company() {
        let verdict = checker("http://bunny.test", "http://vegan.test")
            .check("Maybelline")
            .await
            .unwrap();

        assert_eq!(verdict.score, 0.0);
        assert_eq!(
            verdict.reason,
            "Maybelline is not Leaping Bunny certified and not listed as vegan on ethicy.com"
        );
    }

    #[tokio::test]
    async fn test_unavailable_registry_is_no_verdict() {
        let verdict = checker("down://bunny", "http://vegan.test")
            .check("Lush")
            .await
            .unwrap();

        assert!(!verdict.cruelty_free.found());
        assert!(verdict.cruelty_free.error().is_some());
        assert!(verdict.vegan.found());
        assert_eq!(verdict.score, 25.0);
        assert!(verdict
            .reason
            .starts_with("Leaping Bunny certification for Lush could not be checked"));
    }

    #[tokio::test]
    async fn test_blank_company_rejected() {
        let result = checker("http://bunny.test", "http://vegan.test")
            .check("   ")
            .await;
        assert!(matches!(result, Err(ScoreError::MissingCompany)));
    }
}
