//! HTTP retrieval of raw document bytes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client};
use thiserror::Error;
use tracing::{debug, warn};

/// Default user agent sent with document requests.
pub const USER_AGENT: &str = concat!("tourproj/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum redirects followed per request.
const MAX_REDIRECTS: usize = 10;

/// Errors that can occur while downloading a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalError {
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl RetrievalError {
    pub fn url(&self) -> &str {
        match self {
            RetrievalError::Status { url, .. }
            | RetrievalError::Timeout { url }
            | RetrievalError::Request { url, .. } => url,
        }
    }

    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RetrievalError::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            RetrievalError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            RetrievalError::Request {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Downloads the raw bytes behind a URL.
///
/// A single attempt per call: implementations must not retry.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, RetrievalError>;
}

/// reqwest-backed fetcher with redirect following and a fixed timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout and user agent.
    pub fn new() -> Result<Self, RetrievalError> {
        Self::with_options(Duration::from_secs(DEFAULT_TIMEOUT_SECS), USER_AGENT)
    }

    /// Create a fetcher with a custom timeout and user agent.
    pub fn with_options(timeout: Duration, user_agent: &str) -> Result<Self, RetrievalError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| RetrievalError::Request {
                url: String::new(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, RetrievalError> {
        debug!(url = %url, "HTTP fetch starting");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            RetrievalError::from_reqwest(url, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RetrievalError::from_reqwest(url, e))?;

        debug!(
            url = %url,
            final_url = %final_url,
            bytes = bytes.len(),
            "HTTP fetch complete"
        );

        Ok(bytes.to_vec())
    }
}
