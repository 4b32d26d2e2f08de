//! HTTP fetch boundary.
//!
//! Every transport failure is folded into [`FetchOutcome::Skipped`]; the
//! crawl engine never sees a network error.

use std::fmt;
use std::future::Future;

use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use sitegraph_shared::{CrawlConfig, Result, SitegraphError};

use crate::canonical::NormalizedUrl;

/// A successfully retrieved document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Final URL after redirects.
    pub url: Url,
    /// Raw response body.
    pub body: String,
}

impl Document {
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            body: body.into(),
        }
    }
}

/// Why a page produced no document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// HTTP 401.
    Unauthorized,
    /// HTTP 404.
    NotFound,
    /// Any other status, transport, or body-read failure.
    Other(String),
}

impl SkipReason {
    fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::NOT_FOUND => Self::NotFound,
            other => Self::Other(format!("HTTP {other}")),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => f.write_str("unauthorized"),
            Self::NotFound => f.write_str("not found"),
            Self::Other(detail) => write!(f, "{detail}"),
        }
    }
}

/// Outcome of a single fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched(Document),
    Skipped(SkipReason),
}

/// Retrieves one page per call.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &NormalizedUrl) -> impl Future<Output = FetchOutcome> + Send;
}

// ---------------------------------------------------------------------------
// HttpFetcher
// ---------------------------------------------------------------------------

/// [`Fetcher`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the configured user agent, redirect limit and timeout.
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .timeout(config.timeout)
            .build()
            .map_err(|e| SitegraphError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &NormalizedUrl) -> FetchOutcome {
        debug!(%url, "fetching page");

        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Skipped(SkipReason::Other(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::Skipped(SkipReason::from_status(status));
        }

        let final_url = response.url().clone();
        match response.text().await {
            Ok(body) => FetchOutcome::Fetched(Document::new(final_url, body)),
            Err(e) => FetchOutcome::Skipped(SkipReason::Other(format!("body read failed: {e}"))),
        }
    }
}
