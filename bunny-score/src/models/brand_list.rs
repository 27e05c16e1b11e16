//! Brand registry definitions and immutable brand list snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Leaping Bunny shopping guide (cruelty-free certification)
pub const LEAPING_BUNNY_ID: &str = "leaping-bunny";
/// Ethicy vegan brand listing
pub const ETHICY_VEGAN_ID: &str = "ethicy-vegan";

/// An externally maintained brand directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySource {
    /// Stable identifier (e.g. "leaping-bunny")
    pub id: String,
    /// Name shown in score reasons
    pub label: String,
    /// First page URL; later pages append `page=N`
    pub base_url: String,
    /// Substring an anchor's href must contain to be captured as a brand
    pub link_marker: String,
}

impl RegistrySource {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        base_url: impl Into<String>,
        link_marker: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            base_url: base_url.into(),
            link_marker: link_marker.into(),
        }
    }

    pub fn leaping_bunny() -> Self {
        Self::new(
            LEAPING_BUNNY_ID,
            "Leaping Bunny",
            "https://www.leapingbunny.org/shopping-guide",
            "/brand/",
        )
    }

    pub fn ethicy_vegan() -> Self {
        Self::new(
            ETHICY_VEGAN_ID,
            "ethicy.com",
            "https://ethicy.com/vegan-brands",
            "/question/is-",
        )
    }

    /// URL of pagination page `page` (1-based; page 0 is the bare base URL)
    pub fn page_url(&self, page: u32) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}page={}", self.base_url, separator, page)
    }
}

/// Distinct brand names captured from one registry
///
/// Entries keep first-seen order. Deduplication is case-sensitive.
/// A list is never mutated after construction; refreshes build a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandList {
    source: String,
    entries: Vec<String>,
    fetched_at: DateTime<Utc>,
}

impl BrandList {
    /// Build a list from raw captures, dropping repeats
    pub fn from_captured<I>(source: impl Into<String>, names: I, fetched_at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let entries = names
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .collect();

        Self {
            source: source.into(),
            entries,
            fetched_at,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cached brand list with its expiry
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub list: Arc<BrandList>,
    pub valid_until: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(list: Arc<BrandList>, valid_until: DateTime<Utc>) -> Self {
        Self { list, valid_until }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.valid_until
    }
}
