//! Single-host web crawler: URL canonicalization, crawl frontier, page graph.
//!
//! This crate provides:
//! - [`canonical`]: canonical URL form and host scoping
//! - [`frontier`]: breadth-first pending queue plus visited set
//! - [`graph`]: per-page links and assets in first-seen order
//! - [`engine`]: the crawl loop tying them to a [`Fetcher`] and an [`Extractor`]
//! - [`report`]: text and JSON report writers

pub mod canonical;
pub mod engine;
pub mod extractor;
pub mod fetcher;
pub mod frontier;
pub mod graph;
pub mod observer;
pub mod report;

pub use canonical::{
    CanonicalLink, NormalizedUrl, OpaqueLink, is_crawlable, normalize, normalize_from,
    normalize_root,
};
pub use engine::{CrawlOutcome, CrawlSummary, Crawler};
pub use extractor::{Extractor, HtmlExtractor};
pub use fetcher::{Document, FetchOutcome, Fetcher, HttpFetcher, SkipReason};
pub use frontier::Frontier;
pub use graph::{Page, PageGraph};
pub use observer::{CrawlObserver, SilentObserver};
pub use report::{write_json_report, write_report, write_text_report};
