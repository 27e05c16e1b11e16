//! Brand directory fetch-and-cache
//!
//! Retrieves every page of a registry listing, deduplicates the captured brand
//! names and memoizes the result for a fixed TTL.
//!
//! Pagination rules:
//! - The first page (bare base URL) must succeed, otherwise the directory is
//!   unavailable and the error surfaces to the caller.
//! - Pages `?page=1, 2, ...` follow until a page yields no brands, a page fetch
//!   fails, or `max_pages` is reached. None of these is an overall failure;
//!   everything collected so far is kept.
//!
//! Cache rules:
//! - A refresh builds a new `BrandList` and swaps the entry in whole. Readers
//!   never take a lock and only ever see a complete snapshot.
//! - A failed refresh leaves the previous entry untouched (no negative caching).
//! - Concurrent callers that find the cache expired wait on a single refresh.
//! - The outcome of the latest fetch is kept for health reporting: a failure
//!   message until the next successful fetch clears it.

use crate::models::{BrandList, CacheEntry, RegistrySource};
use crate::services::brand_extractor::extract_brand_names;
use crate::services::page_fetcher::{FetchError, PageFetcher};
use bunny_common::config::{DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_PAGES};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use arc_swap::ArcSwapOption;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Directory cache errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// First page could not be fetched; callers treat this as "no verdict"
    #[error("Registry '{registry}' unavailable: {cause}")]
    Unavailable {
        registry: String,
        #[source]
        cause: FetchError,
    },

    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

/// Cache tuning
#[derive(Debug, Clone)]
pub struct CacheOptions {
    pub ttl: Duration,
    pub max_pages: u32,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Memoized brand list for one registry
pub struct DirectoryCache {
    source: RegistrySource,
    fetcher: Arc<dyn PageFetcher>,
    ttl: chrono::Duration,
    max_pages: u32,
    entry: ArcSwapOption<CacheEntry>,
    last_failure: ArcSwapOption<String>,
    refresh_lock: Mutex<()>,
}

impl DirectoryCache {
    /// # Errors
    /// Returns `DirectoryError::InvalidConfig` if the TTL does not fit a
    /// timestamp offset, or pushes the expiry past the representable range.
    pub fn new(
        source: RegistrySource,
        fetcher: Arc<dyn PageFetcher>,
        options: CacheOptions,
    ) -> Result<Self, DirectoryError> {
        let ttl = chrono::Duration::from_std(options.ttl)
            .map_err(|e| DirectoryError::InvalidConfig(format!("TTL {:?}: {}", options.ttl, e)))?;
        if Utc::now().checked_add_signed(ttl).is_none() {
            return Err(DirectoryError::InvalidConfig(format!(
                "TTL {:?} overflows the expiry timestamp",
                options.ttl
            )));
        }

        Ok(Self {
            source,
            fetcher,
            ttl,
            max_pages: options.max_pages,
            entry: ArcSwapOption::empty(),
            last_failure: ArcSwapOption::empty(),
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn source(&self) -> &RegistrySource {
        &self.source
    }

    /// Current snapshot, if one is cached and still valid
    pub fn cached(&self) -> Option<Arc<BrandList>> {
        let now = Utc::now();
        self.entry
            .load_full()
            .filter(|entry| entry.is_valid_at(now))
            .map(|entry| Arc::clone(&entry.list))
    }

    /// Error message of the latest fetch, if it failed
    pub fn last_failure(&self) -> Option<String> {
        self.last_failure.load_full().map(|message| message.as_ref().clone())
    }

    /// Return the registry's brand list, fetching it if the cache is empty or expired
    ///
    /// # Errors
    /// Returns `DirectoryError::Unavailable` when the first page cannot be fetched.
    pub async fn fetch_all_brands(&self) -> Result<Arc<BrandList>, DirectoryError> {
        if let Some(list) = self.cached() {
            debug!(registry = %self.source.id, entries = list.len(), "Directory cache hit");
            return Ok(list);
        }

        let _refresh = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited
        if let Some(list) = self.cached() {
            debug!(registry = %self.source.id, entries = list.len(), "Directory refreshed by concurrent caller");
            return Ok(list);
        }

        self.reload().await
    }

    /// Refetch now, ignoring any cached entry
    ///
    /// The current entry stays in place until the new list is complete, and
    /// is kept if the fetch fails.
    ///
    /// # Errors
    /// Returns `DirectoryError::Unavailable` when the first page cannot be fetched.
    pub async fn refresh(&self) -> Result<Arc<BrandList>, DirectoryError> {
        let _refresh = self.refresh_lock.lock().await;
        self.reload().await
    }

    /// Fetch every page and swap in the new entry; caller holds `refresh_lock`
    async fn reload(&self) -> Result<Arc<BrandList>, DirectoryError> {
        let result = self.rebuild().await;
        match &result {
            Ok(_) => self.last_failure.store(None),
            Err(e) => self.last_failure.store(Some(Arc::new(e.to_string()))),
        }
        result
    }

    async fn rebuild(&self) -> Result<Arc<BrandList>, DirectoryError> {
        let names = self.fetch_pages().await?;
        let fetched_at = Utc::now();
        let expires_at = fetched_at.checked_add_signed(self.ttl).ok_or_else(|| {
            DirectoryError::InvalidConfig(format!("TTL {} overflows the expiry timestamp", self.ttl))
        })?;
        let list = Arc::new(BrandList::from_captured(
            self.source.id.clone(),
            names,
            fetched_at,
        ));

        self.entry
            .store(Some(Arc::new(CacheEntry::new(Arc::clone(&list), expires_at))));

        info!(
            registry = %self.source.id,
            entries = list.len(),
            "Directory refreshed"
        );

        Ok(list)
    }

    async fn fetch_pages(&self) -> Result<Vec<String>, DirectoryError> {
        let first = self
            .fetcher
            .fetch_page(&self.source.base_url)
            .await
            .map_err(|cause| DirectoryError::Unavailable {
                registry: self.source.id.clone(),
                cause,
            })?;

        let mut names = extract_brand_names(&first, &self.source.link_marker);
        debug!(registry = %self.source.id, page = 0, found = names.len(), "Captured first page");

        let mut page = 1;
        loop {
            if page > self.max_pages {
                warn!(
                    registry = %self.source.id,
                    max_pages = self.max_pages,
                    "Pagination limit reached, keeping collected brands"
                );
                break;
            }

            let html = match self.fetcher.fetch_page(&self.source.page_url(page)).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(
                        registry = %self.source.id,
                        page,
                        error = %e,
                        "Page fetch failed, stopping pagination"
                    );
                    break;
                }
            };

            let brands = extract_brand_names(&html, &self.source.link_marker);
            if brands.is_empty() {
                debug!(registry = %self.source.id, page, "Empty page, end of directory");
                break;
            }

            debug!(registry = %self.source.id, page, found = brands.len(), "Captured page");
            names.extend(brands);
            page += 1;
        }

        Ok(names)
    }
}
