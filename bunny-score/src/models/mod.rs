//! Data models for bunny-score
//!
//! - Brand registry snapshots and cache entries
//! - Fuzzy match results
//! - Sub-scores and the aggregated product score

pub mod brand_list;
pub mod match_result;
pub mod product;
pub mod score;

pub use brand_list::{BrandList, CacheEntry, RegistrySource, ETHICY_VEGAN_ID, LEAPING_BUNNY_ID};
pub use match_result::{MatchResult, MATCH_THRESHOLD};
pub use product::ProductInfo;
pub use score::{AggregateResult, BreakdownEntry, BreakdownScore, Category, ScoreValue, SubScore};
