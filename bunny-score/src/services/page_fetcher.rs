//! HTTP page retrieval
//!
//! Registry pages are fetched through the `PageFetcher` trait so the directory
//! cache can be driven by scripted fixtures in tests.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "bunny-score/0.1.0";

/// Page fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {0} from {1}")]
    Status(u16, String),

    #[error("Client error: {0}")]
    ClientError(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else {
            FetchError::NetworkError(e.to_string())
        }
    }
}

/// Fetch a page by URL and return its raw text
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

/// Build the shared reqwest client used by all outbound calls
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| FetchError::ClientError(e.to_string()))
}

/// reqwest-backed page fetcher
pub struct HttpPageFetcher {
    http_client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url = %url, "Fetching registry page");

        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16(), url.to_string()));
        }

        Ok(response.text().await?)
    }
}
