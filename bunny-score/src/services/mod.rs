//! Registry lookup and product scoring services

pub mod animal_welfare;
pub mod brand_extractor;
pub mod directory_cache;
pub mod fuzzy_matcher;
pub mod ingredient_safety;
pub mod labor_practice;
pub mod model_output;
pub mod page_fetcher;
pub mod provider_error;
pub mod score_aggregator;
pub mod scoring_engine;

pub use animal_welfare::{check_registry, AnimalWelfareChecker, AnimalWelfareVerdict};
pub use directory_cache::{CacheOptions, DirectoryCache, DirectoryError};
pub use fuzzy_matcher::{fuzzy_match, normalize};
pub use ingredient_safety::{EwgClient, IngredientReportSource, IngredientSafetyProvider};
pub use labor_practice::{DolClient, LaborPracticeProvider, LaborStatsSource};
pub use model_output::{parse_country_list, parse_product_info, strip_code_fence};
pub use page_fetcher::{FetchError, HttpPageFetcher, PageFetcher};
pub use provider_error::ProviderError;
pub use score_aggregator::{aggregate_scores, ScoreError};
pub use scoring_engine::ScoringEngine;
