//! Test Helper Utilities
//!
//! Scripted registries and sub-score sources for testing bunny-score
//! without network access.

#![allow(dead_code)]

use async_trait::async_trait;
use bunny_score::models::RegistrySource;
use bunny_score::services::{
    AnimalWelfareChecker, CacheOptions, DirectoryCache, FetchError, IngredientReportSource,
    IngredientSafetyProvider, LaborPracticeProvider, LaborStatsSource, PageFetcher,
    ProviderError, ScoringEngine,
};
use bunny_score::AppState;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const BUNNY_BASE: &str = "http://bunny.test/shopping-guide";
pub const VEGAN_BASE: &str = "http://vegan.test/vegan-brands";

pub const BUNNY_PAGE: &str = r#"
<ul class="brands">
  <li><a href="/brand/lush" class="b">Lush</a></li>
  <li><a href="/brand/aveda">Aveda</a></li>
  <li><A HREF="/BRAND/the-body-shop"> The Body Shop </A></li>
  <li><a href="/about">About us</a></li>
</ul>
"#;

pub const BUNNY_PAGE_1: &str = r#"<a href="/brand/pacifica">Pacifica</a><a href="/brand/lush">Lush</a>"#;

pub const VEGAN_PAGE: &str = r#"
<a href="/question/is-lush-vegan">Lush</a>
<a href="/question/is-pacifica-vegan">Pacifica</a>
<a href="/brands/other">Other</a>
"#;

/// Page source serving scripted markup by URL
///
/// Unknown pagination URLs return an empty page; any other unknown URL fails.
pub struct ScriptedFetcher {
    pages: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(pages: Vec<(String, String)>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Both built-in registries with one or two pages of brands
    pub fn standard() -> Arc<Self> {
        Self::new(vec![
            (BUNNY_BASE.to_string(), BUNNY_PAGE.to_string()),
            (format!("{}?page=1", BUNNY_BASE), BUNNY_PAGE_1.to_string()),
            (VEGAN_BASE.to_string(), VEGAN_PAGE.to_string()),
        ])
    }

    /// Cruelty-free registry only; the vegan registry is unreachable
    pub fn vegan_down() -> Arc<Self> {
        Self::new(vec![(BUNNY_BASE.to_string(), BUNNY_PAGE.to_string())])
    }

    /// Bring the vegan registry back online
    pub fn restore_vegan(&self) {
        self.pages
            .lock()
            .unwrap()
            .insert(VEGAN_BASE.to_string(), VEGAN_PAGE.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(page) = self.pages.lock().unwrap().get(url) {
            return Ok(page.clone());
        }
        if url.contains("page=") {
            return Ok(String::new());
        }
        Err(FetchError::NetworkError(format!("connection refused: {}", url)))
    }
}

/// Ingredient source returning one canned report (or failing when `None`)
pub struct FixedReport(pub Option<Value>);

#[async_trait]
impl IngredientReportSource for FixedReport {
    async fn report(&self, _ingredient_list: &str) -> Result<Value, ProviderError> {
        self.0
            .clone()
            .ok_or_else(|| FetchError::Status(503, "http://ewg.test".to_string()).into())
    }
}

/// Labor statistics by country; unlisted countries have no data
pub struct FixedStats(pub HashMap<String, f64>);

impl FixedStats {
    pub fn of(entries: &[(&str, f64)]) -> Self {
        Self(entries.iter().map(|(c, p)| (c.to_string(), *p)).collect())
    }
}

#[async_trait]
impl LaborStatsSource for FixedStats {
    async fn working_percent(&self, country: &str) -> Result<Option<f64>, ProviderError> {
        Ok(self.0.get(country).copied())
    }
}

pub fn registry_cache(fetcher: Arc<ScriptedFetcher>, source: RegistrySource) -> Arc<DirectoryCache> {
    Arc::new(DirectoryCache::new(source, fetcher, CacheOptions::default()).unwrap())
}

/// App state backed by scripted sources
pub fn create_test_state(
    fetcher: Arc<ScriptedFetcher>,
    report: Option<Value>,
    stats: FixedStats,
) -> AppState {
    let bunny = registry_cache(
        Arc::clone(&fetcher),
        RegistrySource::new("leaping-bunny", "Leaping Bunny", BUNNY_BASE, "/brand/"),
    );
    let vegan = registry_cache(
        fetcher,
        RegistrySource::new("ethicy-vegan", "ethicy.com", VEGAN_BASE, "/question/is-"),
    );

    let engine = ScoringEngine::new(
        AnimalWelfareChecker::new(Arc::clone(&bunny), Arc::clone(&vegan)),
        IngredientSafetyProvider::new(Arc::new(FixedReport(report))),
        LaborPracticeProvider::new(Arc::new(stats)),
    );

    AppState::new(vec![bunny, vegan], engine)
}
