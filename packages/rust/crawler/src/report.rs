//! Site-graph report writers.

use std::io::{self, Write};

use sitegraph_shared::{ReportFormat, Result, SitegraphError};

use crate::graph::PageGraph;

/// Write `graph` to `out` in the requested format.
pub fn write_report<W: Write>(
    graph: &PageGraph,
    format: ReportFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        ReportFormat::Text => write_text_report(graph, out),
        ReportFormat::Json => write_json_report(graph, out),
    }
}

/// One `URL:` / `Links:` / `Assets:` block per page, each followed by a blank line.
pub fn write_text_report<W: Write>(graph: &PageGraph, out: &mut W) -> Result<()> {
    write_text_blocks(graph, out).map_err(SitegraphError::ReportWrite)
}

fn write_text_blocks<W: Write>(graph: &PageGraph, out: &mut W) -> io::Result<()> {
    for page in graph {
        writeln!(out, "URL: {}", page.url())?;
        writeln!(out, "Links:")?;
        for link in page.links() {
            writeln!(out, "\t- {link}")?;
        }
        writeln!(out, "Assets:")?;
        for asset in page.assets() {
            writeln!(out, "\t- {asset}")?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// A pretty-printed JSON array of `{url, links, assets}` objects.
pub fn write_json_report<W: Write>(graph: &PageGraph, out: &mut W) -> Result<()> {
    let pages: Vec<_> = graph.iter().collect();
    serde_json::to_writer_pretty(&mut *out, &pages)
        .map_err(|e| SitegraphError::Report(format!("failed to serialize report: {e}")))?;
    writeln!(out)
        .and_then(|()| out.flush())
        .map_err(SitegraphError::ReportWrite)
}
