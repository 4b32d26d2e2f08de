//! sitegraph CLI: crawl a single site and print its page graph.
//!
//! Every page reachable from the root on the same host is listed with its
//! outbound links and the static assets it references.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
