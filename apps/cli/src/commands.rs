//! CLI command definitions, routing, and tracing setup.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use sitegraph_crawler::{
    CrawlObserver, CrawlSummary, Crawler, NormalizedUrl, Page, SkipReason, write_report,
};
use sitegraph_shared::{
    AppConfig, CrawlConfig, LinkBase, ReportFormat, SitegraphError, init_config, load_config,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// sitegraph: map every page, link and asset of a single site.
#[derive(Parser)]
#[command(
    name = "sitegraph",
    version,
    about = "Crawl a site within one host and report its pages, links and assets.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Crawl a site starting at URL and print its page graph.
    Crawl {
        /// Root URL to start from; only pages on its host are crawled.
        url: String,

        /// Report format: text or json (defaults to the config file value).
        #[arg(short, long)]
        format: Option<ReportFormat>,

        /// Base for relative links: root or page (defaults to the config file value).
        #[arg(long)]
        link_base: Option<LinkBase>,

        /// Write the report to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries the report.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "sitegraph=info",
        1 => "sitegraph=debug",
        _ => "sitegraph=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Crawl {
            url,
            format,
            link_base,
            out,
        } => cmd_crawl(&url, format, link_base, out.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_crawl(
    url: &str,
    format: Option<ReportFormat>,
    link_base: Option<LinkBase>,
    out: Option<&Path>,
) -> Result<()> {
    let config = load_config()?;
    let (crawl_config, format) = resolve_settings(&config, format, link_base);

    info!(
        url,
        %format,
        link_base = %crawl_config.link_base,
        "crawling site"
    );

    let crawler = Crawler::new(crawl_config)?.with_observer(CliProgress::new());
    let outcome = crawler.run(url).await?;

    match out {
        Some(path) => {
            let file = File::create(path).map_err(|e| SitegraphError::io(path, e))?;
            write_report(&outcome.graph, format, &mut BufWriter::new(file))?;
        }
        None => {
            write_report(&outcome.graph, format, &mut io::stdout().lock())?;
        }
    }

    let summary = &outcome.summary;
    eprintln!();
    eprintln!("  Crawl of {} complete", summary.root);
    eprintln!("  Pages:    {}", outcome.graph.len());
    eprintln!("  Skipped:  {}", summary.pages_skipped);
    eprintln!("  Rejected: {} malformed link(s)", summary.links_rejected);
    eprintln!("  Time:     {:.1}s", summary.duration.as_secs_f64());
    if let Some(path) = out {
        eprintln!("  Report:   {}", path.display());
    }
    eprintln!();

    Ok(())
}

/// Merge CLI overrides on top of the loaded config.
fn resolve_settings(
    config: &AppConfig,
    format: Option<ReportFormat>,
    link_base: Option<LinkBase>,
) -> (CrawlConfig, ReportFormat) {
    let mut crawl_config = CrawlConfig::from(config);
    if let Some(link_base) = link_base {
        crawl_config.link_base = link_base;
    }
    (crawl_config, format.unwrap_or(config.report.format))
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress observer
// ---------------------------------------------------------------------------

/// Crawl observer rendering an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&[
                    "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
                ]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl CrawlObserver for CliProgress {
    fn page_fetching(&self, url: &NormalizedUrl, pending: usize) {
        self.spinner.inc(1);
        self.spinner.set_message(format!(
            "Fetching [{} done, {pending} queued] {url}",
            self.spinner.position() - 1
        ));
    }

    fn page_skipped(&self, url: &NormalizedUrl, reason: &SkipReason) {
        self.spinner.println(format!("  skipped {url} ({reason})"));
    }

    fn link_rejected(&self, page: &NormalizedUrl, raw: &str, _error: &SitegraphError) {
        self.spinner.println(format!("  malformed link {raw:?} on {page}"));
    }

    fn page_recorded(&self, _page: &Page, _pending: usize) {}

    fn frontier_size(&self, pending: usize, visited: usize) {
        self.spinner.set_message(format!("Queued {pending}, visited {visited}"));
    }

    fn finished(&self, _summary: &CrawlSummary) {
        self.spinner.finish_and_clear();
    }
}
