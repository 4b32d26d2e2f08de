//! Raw link and asset extraction from fetched documents.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::fetcher::Document;

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static SCRIPT: LazyLock<Selector> = LazyLock::new(|| selector("script"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("link"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// Pulls raw, unresolved reference strings out of a document.
pub trait Extractor: Send + Sync {
    /// `href` of every anchor, in document order.
    fn extract_links(&self, doc: &Document) -> Vec<String>;

    /// Script sources, then link hrefs, then image sources, each in document order.
    fn extract_assets(&self, doc: &Document) -> Vec<String>;
}

/// [`Extractor`] for HTML documents, built on `scraper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract_links(&self, doc: &Document) -> Vec<String> {
        let html = Html::parse_document(&doc.body);
        attr_values(&html, &ANCHOR, "href").collect()
    }

    fn extract_assets(&self, doc: &Document) -> Vec<String> {
        let html = Html::parse_document(&doc.body);
        attr_values(&html, &SCRIPT, "src")
            .chain(attr_values(&html, &LINK, "href"))
            .chain(attr_values(&html, &IMG, "src"))
            .collect()
    }
}

/// Non-blank values of `attr` on every element matching `sel`.
fn attr_values<'a>(
    html: &'a Html,
    sel: &'a Selector,
    attr: &'a str,
) -> impl Iterator<Item = String> + 'a {
    html.select(sel)
        .filter_map(move |el| el.value().attr(attr))
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}
