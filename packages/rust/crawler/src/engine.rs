//! Breadth-first, single-host crawl engine.
//!
//! The crawler seeds the frontier with the canonical root, then repeatedly
//! pops a URL, marks it visited, fetches it, and folds the page's crawlable
//! links and raw assets into the [`PageGraph`]. Fetches are issued one at a
//! time; each canonical URL is attempted at most once.

use std::io::Write;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use sitegraph_shared::{CrawlConfig, LinkBase, ReportFormat, Result};

use crate::canonical::{self, NormalizedUrl};
use crate::extractor::{Extractor, HtmlExtractor};
use crate::fetcher::{Document, FetchOutcome, Fetcher, HttpFetcher};
use crate::frontier::Frontier;
use crate::graph::PageGraph;
use crate::observer::{CrawlObserver, SilentObserver};
use crate::report::write_report;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Summary of a completed crawl.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Canonical root the crawl started from.
    pub root: NormalizedUrl,
    /// Pages that produced a document.
    pub pages_fetched: usize,
    /// Pages whose fetch was skipped (unauthorized, not found, other).
    pub pages_skipped: usize,
    /// Raw links dropped because they could not be parsed.
    pub links_rejected: usize,
    /// Wall-clock duration of the crawl.
    pub duration: Duration,
}

/// The finished page graph together with its summary.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub graph: PageGraph,
    pub summary: CrawlSummary,
}

// ---------------------------------------------------------------------------
// Crawler
// ---------------------------------------------------------------------------

/// Single-host crawler composed of a fetcher, an extractor and an observer.
pub struct Crawler<F = HttpFetcher, E = HtmlExtractor> {
    config: CrawlConfig,
    fetcher: F,
    extractor: E,
    observer: Box<dyn CrawlObserver>,
}

impl Crawler {
    /// Create a crawler using HTTP fetching and HTML extraction.
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_parts(config, fetcher, HtmlExtractor))
    }
}

impl<F: Fetcher, E: Extractor> Crawler<F, E> {
    /// Create a crawler from explicit collaborators.
    pub fn with_parts(config: CrawlConfig, fetcher: F, extractor: E) -> Self {
        Self {
            config,
            fetcher,
            extractor,
            observer: Box::new(SilentObserver),
        }
    }

    /// Attach an observer for progress events.
    pub fn with_observer(mut self, observer: impl CrawlObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Crawl from `root`, write the report to `sink`, and report success.
    ///
    /// Returns `Ok(true)` whenever the frontier drains; skipped pages do not
    /// count as failure.
    pub async fn crawl<W: Write>(
        &self,
        root: &str,
        sink: &mut W,
        format: ReportFormat,
    ) -> Result<bool> {
        let outcome = self.run(root).await?;
        write_report(&outcome.graph, format, sink)?;
        Ok(true)
    }

    /// Crawl every page reachable from `root` on the same host.
    #[instrument(skip_all, fields(root = %root))]
    pub async fn run(&self, root: &str) -> Result<CrawlOutcome> {
        let start_time = Instant::now();
        let root = canonical::normalize_root(root)?;

        let mut frontier = Frontier::seed(root.clone());
        let mut graph = PageGraph::new();
        let mut summary = CrawlSummary {
            root: root.clone(),
            pages_fetched: 0,
            pages_skipped: 0,
            links_rejected: 0,
            duration: Duration::ZERO,
        };

        info!(
            link_base = %self.config.link_base,
            timeout_ms = self.config.timeout.as_millis(),
            "starting crawl"
        );

        while let Some(url) = frontier.pop_next() {
            frontier.mark_visited(url.clone());
            self.observer.page_fetching(&url, frontier.pending_len());

            let doc = match self.fetcher.fetch(&url).await {
                FetchOutcome::Fetched(doc) => doc,
                FetchOutcome::Skipped(reason) => {
                    warn!(%url, %reason, "skipping page");
                    self.observer.page_skipped(&url, &reason);
                    summary.pages_skipped += 1;
                    continue;
                }
            };

            summary.pages_fetched += 1;
            self.record_page(&root, &url, &doc, &mut frontier, &mut graph, &mut summary);

            if let Some(page) = graph.get(&url) {
                self.observer.page_recorded(page, frontier.pending_len());
            }
            self.observer
                .frontier_size(frontier.pending_len(), frontier.visited_len());
            debug!(
                pending = frontier.pending_len(),
                visited = frontier.visited_len(),
                "pages remaining"
            );
        }

        summary.duration = start_time.elapsed();

        info!(
            pages = graph.len(),
            pages_fetched = summary.pages_fetched,
            pages_skipped = summary.pages_skipped,
            links_rejected = summary.links_rejected,
            duration_ms = summary.duration.as_millis(),
            "crawl completed"
        );
        self.observer.finished(&summary);

        Ok(CrawlOutcome { graph, summary })
    }

    /// Fold one fetched document into the graph and the frontier.
    fn record_page(
        &self,
        root: &NormalizedUrl,
        url: &NormalizedUrl,
        doc: &Document,
        frontier: &mut Frontier,
        graph: &mut PageGraph,
        summary: &mut CrawlSummary,
    ) {
        graph.get_or_create(url);

        let base = match self.config.link_base {
            LinkBase::Root => root.origin_base(),
            LinkBase::Page => doc.url.clone(),
        };

        let mut links = Vec::new();
        let mut to_enqueue = Vec::new();

        for raw in self.extractor.extract_links(doc) {
            if raw.trim().is_empty() {
                continue;
            }

            let link = match canonical::normalize_from(&base, &raw) {
                Ok(link) => link,
                Err(e) => {
                    warn!(page = %url, href = %raw, error = %e, "dropping malformed link");
                    self.observer.link_rejected(url, &raw, &e);
                    summary.links_rejected += 1;
                    continue;
                }
            };

            let Some(link) = link.into_crawlable(root) else {
                continue;
            };

            if !frontier.is_visited(&link) {
                to_enqueue.push(link.clone());
            }
            links.push(link);
        }

        debug!(page = %url, links = links.len(), "processing links");
        graph.add_links(url, links);
        frontier.enqueue_many(to_enqueue);

        let assets = self.extractor.extract_assets(doc);
        debug!(page = %url, assets = assets.len(), "processing assets");
        graph.add_assets(url, assets);
    }
}
