//! URL canonicalization.
//!
//! Every page and link identity in the crawl goes through [`normalize`] (or
//! [`normalize_from`]). Canonical form is scheme + host (+ port) + path, with
//! the query string and fragment removed. Links whose scheme is not
//! web-navigable come back as [`OpaqueLink`] and are never resolved.

use std::fmt;

use serde::Serialize;
use url::{ParseError, Url};

use sitegraph_shared::{Result, SitegraphError};

/// Schemes the crawler can fetch and therefore canonicalize.
const NAVIGABLE_SCHEMES: &[&str] = &["http", "https"];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A canonical, comparable page address.
///
/// Only constructible through this module, so the path is never empty and
/// there is never a query or fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Host component, as compared by [`is_crawlable`].
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or("")
    }

    /// The origin of this URL with path `/`, used as the base for
    /// root-relative resolution.
    pub(crate) fn origin_base(&self) -> Url {
        let mut base = self.0.clone();
        base.set_path("/");
        base
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link with a non-navigable scheme (`mailto:`, `tel:`, ...), kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpaqueLink(String);

impl OpaqueLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpaqueLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of canonicalizing a raw link string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalLink {
    /// A navigable address in canonical form.
    Url(NormalizedUrl),
    /// A non-navigable address, passed through untouched.
    Opaque(OpaqueLink),
}

impl CanonicalLink {
    /// Returns the canonical URL if this link is crawlable from `root`.
    pub fn into_crawlable(self, root: &NormalizedUrl) -> Option<NormalizedUrl> {
        match self {
            Self::Url(url) if url.host() == root.host() => Some(url),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => url.fmt(f),
            Self::Opaque(link) => link.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Canonicalization
// ---------------------------------------------------------------------------

/// Canonicalize the crawl root itself.
///
/// Unlike link canonicalization this is strict: the root must be an absolute
/// http(s) URL with a host.
pub fn normalize_root(raw: &str) -> Result<NormalizedUrl> {
    let url = Url::parse(raw.trim())
        .map_err(|e| SitegraphError::invalid_root(format!("'{raw}': {e}")))?;

    if !is_navigable(&url) {
        return Err(SitegraphError::invalid_root(format!(
            "'{raw}': scheme '{}' is not http or https",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(SitegraphError::invalid_root(format!("'{raw}' has no host")));
    }

    Ok(canonicalize(url))
}

/// Canonicalize `raw`, filling a missing scheme or host from `root`.
///
/// Relative references are resolved against the root's origin, not against
/// the page they were found on.
pub fn normalize(root: &NormalizedUrl, raw: &str) -> Result<CanonicalLink> {
    normalize_from(&root.origin_base(), raw)
}

/// Canonicalize `raw`, resolving relative references against `base`.
pub fn normalize_from(base: &Url, raw: &str) -> Result<CanonicalLink> {
    let url = match Url::parse(raw) {
        Ok(url) if !is_navigable(&url) => {
            return Ok(CanonicalLink::Opaque(OpaqueLink(raw.to_string())));
        }
        // `http:/press` names a scheme but no host; take the host from `base`.
        Ok(url) if !has_authority(raw) => {
            let rest = raw.trim_start()[url.scheme().len() + 1..].to_string();
            let mut resolved = base
                .join(&rest)
                .map_err(|e| SitegraphError::malformed_url(raw, e))?;
            resolved
                .set_scheme(url.scheme())
                .map_err(|()| SitegraphError::malformed_url(raw, "cannot change scheme"))?;
            resolved
        }
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => base
            .join(raw)
            .map_err(|e| SitegraphError::malformed_url(raw, e))?,
        Err(e) => return Err(SitegraphError::malformed_url(raw, e)),
    };

    Ok(CanonicalLink::Url(canonicalize(url)))
}

/// True iff `link` is a navigable URL on exactly the root's host.
pub fn is_crawlable(link: &CanonicalLink, root: &NormalizedUrl) -> bool {
    matches!(link, CanonicalLink::Url(url) if url.host() == root.host())
}

/// True when `raw` has `//` (or `\\`) right after its scheme.
fn has_authority(raw: &str) -> bool {
    raw.trim_start()
        .split_once(':')
        .is_some_and(|(_, rest)| {
            let mut chars = rest.chars();
            matches!(
                (chars.next(), chars.next()),
                (Some('/' | '\\'), Some('/' | '\\'))
            )
        })
}

fn is_navigable(url: &Url) -> bool {
    NAVIGABLE_SCHEMES.contains(&url.scheme())
}

fn canonicalize(mut url: Url) -> NormalizedUrl {
    url.set_query(None);
    url.set_fragment(None);
    // Special schemes always carry a path; this only guards odd parses.
    if url.path().is_empty() {
        url.set_path("/");
    }
    NormalizedUrl(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> NormalizedUrl {
        normalize_root("http://joingrouper.com").unwrap()
    }

    fn url(raw: &str) -> NormalizedUrl {
        match normalize(&root(), raw).unwrap() {
            CanonicalLink::Url(url) => url,
            CanonicalLink::Opaque(link) => panic!("unexpected opaque link {link}"),
        }
    }

    #[test]
    fn root_gains_slash_path() {
        assert_eq!(root().as_str(), "http://joingrouper.com/");
    }

    #[test]
    fn root_relative_slash_equals_root() {
        assert_eq!(url("/"), url("http://joingrouper.com"));
        assert_eq!(url("/"), url("http://joingrouper.com/"));
    }

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(url("http://h.com/p?x=1#frag"), url("http://h.com/p"));
        assert_eq!(url("/press?abc=true"), url("/press"));
        assert_eq!(url("http://joingrouper.com/#"), url("/"));
        assert_eq!(url("#section"), root());
    }

    #[test]
    fn relative_paths_fill_root_scheme_and_host() {
        assert_eq!(url("/press").as_str(), "http://joingrouper.com/press");
        assert_eq!(url("jobs").as_str(), "http://joingrouper.com/jobs");
        assert_eq!(url("//joingrouper.com/a").as_str(), "http://joingrouper.com/a");
    }

    #[test]
    fn scheme_without_host_takes_root_host() {
        assert_eq!(url("http:/press").as_str(), "http://joingrouper.com/press");
        assert_eq!(url("http:press").as_str(), "http://joingrouper.com/press");
        assert_eq!(url("https:/secure?x=1").as_str(), "https://joingrouper.com/secure");
        assert!(is_crawlable(&normalize(&root(), "http:/press").unwrap(), &root()));

        // A real authority is still honoured.
        assert_eq!(url("http://press/").as_str(), "http://press/");
    }

    #[test]
    fn nested_relative_links_resolve_against_root_origin() {
        let root = normalize_root("http://h.com/docs/guide/").unwrap();
        let link = normalize(&root, "../sibling").unwrap();
        assert_eq!(link.to_string(), "http://h.com/sibling");
    }

    #[test]
    fn page_base_resolves_nested_relative_links() {
        let page = Url::parse("http://h.com/docs/guide/intro").unwrap();
        let link = normalize_from(&page, "../sibling").unwrap();
        assert_eq!(link.to_string(), "http://h.com/docs/sibling");
    }

    #[test]
    fn distinct_paths_stay_distinct() {
        assert_ne!(url("/press"), url("/"));
        assert_ne!(url("/press"), url("/press/abc"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let raws = [
            "/",
            "http://joingrouper.com",
            "/press?abc=true",
            "http://joingrouper.com/jobs#top",
            "https://other.com/x/y?z",
            "relative/path",
            "mailto:a@b.com",
            "http:/press",
        ];
        for raw in raws {
            let once = normalize(&root(), raw).unwrap();
            let twice = normalize(&root(), &once.to_string()).unwrap();
            assert_eq!(once, twice, "not idempotent for {raw}");
        }
    }

    #[test]
    fn mailto_passes_through_as_opaque() {
        let link = normalize(&root(), "mailto:a@b.com").unwrap();
        assert_eq!(
            link,
            CanonicalLink::Opaque(OpaqueLink("mailto:a@b.com".into()))
        );
        assert_ne!(link, CanonicalLink::Url(root()));
        assert!(!is_crawlable(&link, &root()));
        assert_eq!(link.into_crawlable(&root()), None);
    }

    #[test]
    fn other_non_navigable_schemes_are_opaque() {
        for raw in ["tel:+15551234", "javascript:void(0)", "ftp://joingrouper.com/f"] {
            let link = normalize(&root(), raw).unwrap();
            assert!(matches!(link, CanonicalLink::Opaque(_)), "{raw}");
        }
    }

    #[test]
    fn crawlable_only_on_root_host() {
        let root = root();
        assert!(is_crawlable(&normalize(&root, "http://joingrouper.com/press").unwrap(), &root));
        assert!(is_crawlable(&normalize(&root, "/join").unwrap(), &root));
        assert!(!is_crawlable(&normalize(&root, "http://google.com").unwrap(), &root));
        assert!(!is_crawlable(&normalize(&root, "http://www.joingrouper.com/").unwrap(), &root));
    }

    #[test]
    fn unparseable_link_is_malformed() {
        let err = normalize(&root(), "http://[oops").unwrap_err();
        assert!(matches!(err, SitegraphError::MalformedUrl { .. }));
        assert!(err.to_string().contains("http://[oops"));

        let err = normalize(&root(), "http://").unwrap_err();
        assert!(matches!(err, SitegraphError::MalformedUrl { .. }));
    }

    #[test]
    fn invalid_roots_are_rejected() {
        assert!(matches!(
            normalize_root("not a url").unwrap_err(),
            SitegraphError::InvalidRoot { .. }
        ));
        assert!(matches!(
            normalize_root("mailto:a@b.com").unwrap_err(),
            SitegraphError::InvalidRoot { .. }
        ));
    }
}
