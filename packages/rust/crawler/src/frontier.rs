//! Breadth-first crawl frontier: the pending queue plus the visited set.

use std::collections::{HashSet, VecDeque};

use crate::canonical::NormalizedUrl;

/// FIFO of canonical URLs still to fetch, and the set already attempted.
///
/// The pending queue never holds a URL twice, and never holds a URL that
/// has been marked visited.
#[derive(Debug, Default)]
pub struct Frontier {
    pending: VecDeque<NormalizedUrl>,
    /// Mirror of `pending` for O(1) membership checks.
    queued: HashSet<NormalizedUrl>,
    visited: HashSet<NormalizedUrl>,
}

impl Frontier {
    /// Create a frontier whose pending queue is exactly `[root]`.
    pub fn seed(root: NormalizedUrl) -> Self {
        let mut frontier = Self::default();
        frontier.queued.insert(root.clone());
        frontier.pending.push_back(root);
        frontier
    }

    /// Remove and return the head of the queue, or `None` once drained.
    pub fn pop_next(&mut self) -> Option<NormalizedUrl> {
        let url = self.pending.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Record that `url` has been attempted. Returns `false` if it already was.
    pub fn mark_visited(&mut self, url: NormalizedUrl) -> bool {
        self.visited.insert(url)
    }

    pub fn is_visited(&self, url: &NormalizedUrl) -> bool {
        self.visited.contains(url)
    }

    /// Append every URL not already pending or visited, keeping first-seen order.
    ///
    /// Duplicates within `urls` collapse to their first occurrence, so the
    /// whole queue stays duplicate-free even when two pages discover the same
    /// URL before either is dequeued.
    pub fn enqueue_many<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = NormalizedUrl>,
    {
        let mut added = 0;
        for url in urls {
            if self.visited.contains(&url) || self.queued.contains(&url) {
                continue;
            }
            self.queued.insert(url.clone());
            self.pending.push_back(url);
            added += 1;
        }
        added
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending URLs in dequeue order.
    pub fn pending(&self) -> impl Iterator<Item = &NormalizedUrl> {
        self.pending.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{CanonicalLink, normalize, normalize_root};

    fn root() -> NormalizedUrl {
        normalize_root("http://h.com").unwrap()
    }

    fn url(raw: &str) -> NormalizedUrl {
        match normalize(&root(), raw).unwrap() {
            CanonicalLink::Url(url) => url,
            CanonicalLink::Opaque(link) => panic!("unexpected opaque link {link}"),
        }
    }

    fn pending(frontier: &Frontier) -> Vec<&str> {
        frontier.pending().map(NormalizedUrl::as_str).collect()
    }

    #[test]
    fn seed_holds_only_root() {
        let frontier = Frontier::seed(root());
        assert_eq!(pending(&frontier), vec!["http://h.com/"]);
        assert_eq!(frontier.visited_len(), 0);
    }

    #[test]
    fn pop_is_fifo_and_terminates() {
        let mut frontier = Frontier::seed(root());
        frontier.enqueue_many([url("/a"), url("/b")]);

        assert_eq!(frontier.pop_next(), Some(root()));
        assert_eq!(frontier.pop_next(), Some(url("/a")));
        assert_eq!(frontier.pop_next(), Some(url("/b")));
        assert_eq!(frontier.pop_next(), None);
        assert!(frontier.is_empty());
    }

    #[test]
    fn enqueue_keeps_queue_unique() {
        let mut frontier = Frontier::seed(root());
        frontier.enqueue_many([url("/a"), url("/b"), url("/a")]);
        frontier.enqueue_many([url("/b"), url("/c"), url("/a?utm=1")]);

        assert_eq!(
            pending(&frontier),
            vec!["http://h.com/", "http://h.com/a", "http://h.com/b", "http://h.com/c"]
        );
    }

    #[test]
    fn visited_urls_are_never_requeued() {
        let mut frontier = Frontier::seed(root());
        let head = frontier.pop_next().unwrap();
        assert!(frontier.mark_visited(head.clone()));
        assert!(!frontier.mark_visited(head.clone()));
        assert!(frontier.is_visited(&url("/#top")));

        let added = frontier.enqueue_many([head, url("/a")]);
        assert_eq!(added, 1);
        assert_eq!(pending(&frontier), vec!["http://h.com/a"]);
    }

    #[test]
    fn popped_url_can_be_rediscovered_only_until_visited() {
        let mut frontier = Frontier::seed(root());
        frontier.enqueue_many([url("/a")]);
        let head = frontier.pop_next().unwrap();
        frontier.mark_visited(head);

        // "/a" is still pending, so rediscovering it is a no-op.
        assert_eq!(frontier.enqueue_many([url("/a")]), 0);
        let a = frontier.pop_next().unwrap();
        frontier.mark_visited(a);
        assert_eq!(frontier.enqueue_many([url("/a")]), 0);
        assert!(frontier.is_empty());
    }
}
