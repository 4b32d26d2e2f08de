//! Application configuration for sitegraph.
//!
//! User config lives at `~/.sitegraph/sitegraph.toml`.
//! CLI flags override config file values, which override defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SitegraphError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sitegraph.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sitegraph";

// ---------------------------------------------------------------------------
// Enumerated settings
// ---------------------------------------------------------------------------

/// Base URL that relative links are resolved against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkBase {
    /// Resolve against the crawl root's origin (scheme, host, port; path `/`).
    #[default]
    Root,
    /// Resolve against the URL of the page the link was found on.
    Page,
}

impl FromStr for LinkBase {
    type Err = SitegraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "root" => Ok(Self::Root),
            "page" => Ok(Self::Page),
            other => Err(SitegraphError::config(format!(
                "unknown link base '{other}': expected 'root' or 'page'"
            ))),
        }
    }
}

impl fmt::Display for LinkBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Root => "root",
            Self::Page => "page",
        })
    }
}

/// Output format of the crawl report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// The `URL:` / `Links:` / `Assets:` block format.
    #[default]
    Text,
    /// A JSON array of `{url, links, assets}` objects.
    Json,
}

impl FromStr for ReportFormat {
    type Err = SitegraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(SitegraphError::config(format!(
                "unknown report format '{other}': expected 'text' or 'json'"
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

// ---------------------------------------------------------------------------
// Config structs (matching sitegraph.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Fetch and traversal settings.
    #[serde(default)]
    pub crawl: CrawlSection,

    /// Report output settings.
    #[serde(default)]
    pub report: ReportSection,
}

/// `[crawl]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSection {
    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum redirects followed for a single fetch.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Base for resolving relative links.
    #[serde(default)]
    pub link_base: LinkBase,
}

impl Default for CrawlSection {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            link_base: LinkBase::default(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("sitegraph/", env!("CARGO_PKG_VERSION")).into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_redirects() -> usize {
    5
}

/// `[report]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    /// Default report format when `--format` is not given.
    #[serde(default)]
    pub format: ReportFormat,
}

// ---------------------------------------------------------------------------
// Crawl config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime crawl configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// User-Agent header value.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum redirects followed per fetch.
    pub max_redirects: usize,
    /// Base for resolving relative links.
    pub link_base: LinkBase,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CrawlConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.crawl.user_agent.clone(),
            timeout: Duration::from_secs(config.crawl.timeout_secs),
            max_redirects: config.crawl.max_redirects,
            link_base: config.crawl.link_base,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sitegraph/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SitegraphError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.sitegraph/sitegraph.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SitegraphError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        SitegraphError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SitegraphError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SitegraphError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SitegraphError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
