//! In-memory page graph: canonical URL -> recorded links and assets.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::canonical::NormalizedUrl;

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One fetched page with its distinct outbound links and asset references.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    url: NormalizedUrl,
    links: Vec<NormalizedUrl>,
    /// Raw, unresolved strings exactly as extracted.
    assets: Vec<String>,
    #[serde(skip)]
    seen_links: HashSet<NormalizedUrl>,
    #[serde(skip)]
    seen_assets: HashSet<String>,
}

impl Page {
    fn new(url: NormalizedUrl) -> Self {
        Self {
            url,
            links: Vec::new(),
            assets: Vec::new(),
            seen_links: HashSet::new(),
            seen_assets: HashSet::new(),
        }
    }

    pub fn url(&self) -> &NormalizedUrl {
        &self.url
    }

    /// Outbound links, in first-encountered order.
    pub fn links(&self) -> &[NormalizedUrl] {
        &self.links
    }

    /// Asset references, in first-encountered order.
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    fn add_links(&mut self, links: impl IntoIterator<Item = NormalizedUrl>) {
        for link in links {
            if self.seen_links.insert(link.clone()) {
                self.links.push(link);
            }
        }
    }

    fn add_assets(&mut self, assets: impl IntoIterator<Item = String>) {
        for asset in assets {
            if self.seen_assets.insert(asset.clone()) {
                self.assets.push(asset);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PageGraph
// ---------------------------------------------------------------------------

/// Arena of pages addressed by canonical URL, iterated in creation order.
#[derive(Debug, Default)]
pub struct PageGraph {
    pages: Vec<Page>,
    index: HashMap<NormalizedUrl, usize>,
}

impl PageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the page for `url`, registering an empty one on first reference.
    pub fn get_or_create(&mut self, url: &NormalizedUrl) -> &mut Page {
        let slot = match self.index.get(url) {
            Some(&slot) => slot,
            None => {
                let slot = self.pages.len();
                self.pages.push(Page::new(url.clone()));
                self.index.insert(url.clone(), slot);
                slot
            }
        };
        &mut self.pages[slot]
    }

    /// Append `links` to the page for `url`, dropping ones it already has.
    pub fn add_links(
        &mut self,
        url: &NormalizedUrl,
        links: impl IntoIterator<Item = NormalizedUrl>,
    ) {
        self.get_or_create(url).add_links(links);
    }

    /// Append raw asset references to the page for `url`, dropping exact repeats.
    pub fn add_assets<I, S>(&mut self, url: &NormalizedUrl, assets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.get_or_create(url)
            .add_assets(assets.into_iter().map(Into::into));
    }

    pub fn get(&self, url: &NormalizedUrl) -> Option<&Page> {
        self.index.get(url).map(|&slot| &self.pages[slot])
    }

    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        self.index.contains_key(url)
    }

    /// Pages in first-creation order. Each call starts from the beginning.
    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl<'a> IntoIterator for &'a PageGraph {
    type Item = &'a Page;
    type IntoIter = std::slice::Iter<'a, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{CanonicalLink, normalize, normalize_root};

    fn url(raw: &str) -> NormalizedUrl {
        let root = normalize_root("http://abc.com").unwrap();
        match normalize(&root, raw).unwrap() {
            CanonicalLink::Url(url) => url,
            CanonicalLink::Opaque(link) => panic!("unexpected opaque link {link}"),
        }
    }

    fn urls(raws: &[&str]) -> Vec<NormalizedUrl> {
        raws.iter().map(|raw| url(raw)).collect()
    }

    #[test]
    fn reuses_the_same_page_for_multiple_link_sets() {
        let mut graph = PageGraph::new();
        let page = url("/");
        graph.add_links(&page, urls(&["/1", "/2", "/3"]));
        graph.add_links(&page, urls(&["/4", "/5"]));

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get(&page).unwrap().links().len(), 5);
    }

    #[test]
    fn keeps_links_unique_in_first_seen_order() {
        let mut graph = PageGraph::new();
        let page = url("/");
        graph.add_links(&page, urls(&["/1", "/2", "/3"]));
        graph.add_links(&page, urls(&["/4", "/3"]));

        let links: Vec<&str> = graph
            .get(&page)
            .unwrap()
            .links()
            .iter()
            .map(|l| l.as_str())
            .collect();
        assert_eq!(
            links,
            vec!["http://abc.com/1", "http://abc.com/2", "http://abc.com/3", "http://abc.com/4"]
        );
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn assets_do_not_create_a_second_page() {
        let mut graph = PageGraph::new();
        let page = url("/");
        graph.add_links(&page, urls(&["/1", "/2"]));
        graph.add_assets(&page, ["4", "5", "4"]);

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get(&page).unwrap().assets(), ["4", "5"]);
    }

    #[test]
    fn assets_are_stored_unresolved() {
        let mut graph = PageGraph::new();
        let page = url("/");
        graph.add_assets(&page, ["/app.js", "http://abc.com/app.js"]);

        assert_eq!(graph.get(&page).unwrap().assets().len(), 2);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut graph = PageGraph::new();
        graph.get_or_create(&url("/a"));
        graph.get_or_create(&url("/a?x=1"));

        assert_eq!(graph.len(), 1);
        assert!(graph.contains(&url("/a")));
        assert!(graph.get(&url("/b")).is_none());
    }

    #[test]
    fn iterates_in_creation_order_and_restarts() {
        let mut graph = PageGraph::new();
        graph.add_links(&url("/def"), urls(&["/3", "/4"]));
        graph.add_links(&url("/abc"), urls(&["/1", "/2"]));
        graph.add_assets(&url("/def"), ["x.png"]);

        let order: Vec<&str> = graph.iter().map(|p| p.url().as_str()).collect();
        assert_eq!(order, vec!["http://abc.com/def", "http://abc.com/abc"]);

        let mut count = 0;
        for _page in &graph {
            count += 1;
        }
        assert_eq!(count, 2);
        assert_eq!(graph.iter().count(), 2);
    }
}
