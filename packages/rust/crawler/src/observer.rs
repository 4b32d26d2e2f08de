//! Crawl progress observation.

use sitegraph_shared::SitegraphError;

use crate::canonical::NormalizedUrl;
use crate::engine::CrawlSummary;
use crate::fetcher::SkipReason;
use crate::graph::Page;

/// Receives crawl progress events. Passed to the [`Crawler`](crate::Crawler)
/// at construction.
pub trait CrawlObserver: Send + Sync {
    /// A page is about to be fetched; `pending` URLs remain queued behind it.
    fn page_fetching(&self, url: &NormalizedUrl, pending: usize);
    /// A page produced no document and was dropped.
    fn page_skipped(&self, url: &NormalizedUrl, reason: &SkipReason);
    /// A raw link on `page` could not be canonicalized and was dropped.
    fn link_rejected(&self, page: &NormalizedUrl, raw: &str, error: &SitegraphError);
    /// A page's links and assets have been recorded.
    fn page_recorded(&self, page: &Page, pending: usize);
    /// Frontier size after a page's links were enqueued.
    fn frontier_size(&self, pending: usize, visited: usize);
    /// The frontier is drained.
    fn finished(&self, summary: &CrawlSummary);
}

/// No-op observer for headless/test usage.
pub struct SilentObserver;

impl CrawlObserver for SilentObserver {
    fn page_fetching(&self, _url: &NormalizedUrl, _pending: usize) {}
    fn page_skipped(&self, _url: &NormalizedUrl, _reason: &SkipReason) {}
    fn link_rejected(&self, _page: &NormalizedUrl, _raw: &str, _error: &SitegraphError) {}
    fn page_recorded(&self, _page: &Page, _pending: usize) {}
    fn frontier_size(&self, _pending: usize, _visited: usize) {}
    fn finished(&self, _summary: &CrawlSummary) {}
}
