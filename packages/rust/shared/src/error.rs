//! Error types for sitegraph.
//!
//! Library crates use [`SitegraphError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all sitegraph operations.
#[derive(Debug, thiserror::Error)]
pub enum SitegraphError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while building the client or fetching a page.
    #[error("network error: {0}")]
    Network(String),

    /// A raw link string that cannot be parsed as a URL reference.
    #[error("malformed URL '{input}': {reason}")]
    MalformedUrl { input: String, reason: String },

    /// The crawl root is unusable (not http(s), no host, unparseable).
    #[error("invalid root URL: {message}")]
    InvalidRoot { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The crawl report could not be serialized.
    #[error("report error: {0}")]
    Report(String),

    /// The report sink rejected a write or flush.
    #[error("failed to write report: {0}")]
    ReportWrite(#[source] std::io::Error),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SitegraphError>;

impl SitegraphError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a malformed-URL error for `input`.
    pub fn malformed_url(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedUrl {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid-root error from any displayable message.
    pub fn invalid_root(msg: impl Into<String>) -> Self {
        Self::InvalidRoot {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = SitegraphError::config("unknown link_base 'sideways'");
        assert_eq!(err.to_string(), "config error: unknown link_base 'sideways'");

        let err = SitegraphError::malformed_url("http://[oops", "invalid IPv6 address");
        assert_eq!(
            err.to_string(),
            "malformed URL 'http://[oops': invalid IPv6 address"
        );

        let err = SitegraphError::invalid_root("mailto:a@b.com has no host");
        assert!(err.to_string().contains("has no host"));
    }

    #[test]
    fn report_write_keeps_io_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = SitegraphError::ReportWrite(io);
        assert_eq!(err.to_string(), "failed to write report: pipe closed");

        let source = err.source().expect("io source");
        let source = source.downcast_ref::<std::io::Error>().expect("io::Error");
        assert_eq!(source.kind(), std::io::ErrorKind::BrokenPipe);
    }
}
