//! Errors raised at the sub-score provider boundary
//!
//! Providers never let these reach aggregation: they are logged and turned
//! into an "unknown" sub-score with an explanatory reason.

use crate::services::page_fetcher::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("{0} is not configured")]
    NotConfigured(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Fetch(e.into())
    }
}
