//! Shared error model and configuration for sitegraph.
//!
//! This crate is the foundation depended on by the other sitegraph crates.
//! It provides:
//! - [`SitegraphError`]: the unified error type
//! - Configuration ([`AppConfig`], [`CrawlConfig`], config loading)

pub mod config;
pub mod error;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CrawlConfig, CrawlSection, LinkBase, ReportFormat, ReportSection, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, SitegraphError};
