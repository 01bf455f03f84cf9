//! End-of-run status text shown to whoever triggered the run.

use crate::models::{RunReport, SourceOutcome};
use std::fmt::Write;

/// Per-source status lines followed by the aggregated records, or an explicit
/// "no data" line when nothing was harvested.
pub fn render_summary(report: &RunReport) -> String {
    let mut out = String::new();
    writeln!(out, "Scrape run started at {}", report.started_at).unwrap();

    for source in &report.sources {
        match &source.outcome {
            SourceOutcome::Harvested { candidates, rows } => {
                writeln!(out, "[ok] Found {candidates} links in {}.", source.source).unwrap();
                if *rows > 0 {
                    let noun = plural(*rows, "row", "rows");
                    writeln!(out, "[ok] Appended {rows} {noun} to {}", source.source).unwrap();
                } else {
                    writeln!(out, "[warn] No valid headlines found for {}.", source.source)
                        .unwrap();
                }
            }
            SourceOutcome::Failed { kind, error } => {
                writeln!(out, "[error] {kind} error scraping {}: {error}", source.source).unwrap();
            }
        }
    }

    if report.records.is_empty() {
        writeln!(out, "No data to display.").unwrap();
        return out;
    }

    let harvested = report.sources.len() - report.failed_count();
    writeln!(
        out,
        "Scraped {} {} from {} {}:",
        report.records.len(),
        plural(report.records.len(), "headline", "headlines"),
        harvested,
        plural(harvested, "source", "sources"),
    )
    .unwrap();
    for record in &report.records {
        writeln!(
            out,
            "{} | {} | {}",
            record.timestamp, record.headline_text, record.url
        )
        .unwrap();
    }
    out
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
