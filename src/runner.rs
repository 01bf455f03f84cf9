//! Run orchestration.
//!
//! A run walks the configured sources in order. Each source goes through
//! fetch → parse/extract → full-replace write; whatever goes wrong is recorded
//! against that source and the run moves on to the next one.

use crate::config::RunContext;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::models::{HeadlineRecord, RunReport, Source, SourceOutcome, SourceReport};
use crate::outputs::{Sink, replace_contents};
use crate::scrapers::{Extraction, extract_headlines};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Format of the timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Run every source, stamping records with the current time in the context's
/// zone.
pub async fn run<F: Fetcher, S: Sink>(ctx: &RunContext<F, S>) -> RunReport {
    let now = Utc::now().with_timezone(&ctx.timezone);
    run_at(ctx, now).await
}

/// Run every source with a fixed run-start time.
#[instrument(level = "info", skip(ctx), fields(sources = ctx.sources.len()))]
pub async fn run_at<F: Fetcher, S: Sink>(ctx: &RunContext<F, S>, started: DateTime<Tz>) -> RunReport {
    let t0 = Instant::now();
    let stamp = started.format(TIMESTAMP_FORMAT).to_string();
    info!(%stamp, "Starting scrape run");

    let mut report = RunReport {
        started_at: stamp.clone(),
        ..RunReport::default()
    };

    for source in &ctx.sources {
        let outcome = match process_source(ctx, source, &stamp).await {
            Ok((candidates, records)) => {
                let rows = records.len();
                if rows == 0 {
                    warn!(source = %source.name, candidates, "No valid headlines found");
                } else {
                    info!(source = %source.name, candidates, rows, "Source harvested");
                }
                report.records.extend(records);
                SourceOutcome::Harvested { candidates, rows }
            }
            Err(e) => {
                error!(source = %source.name, error = %e, "Source failed; continuing");
                SourceOutcome::Failed {
                    kind: e.kind().to_string(),
                    error: e.to_string(),
                }
            }
        };
        report.sources.push(SourceReport {
            source: source.name.clone(),
            outcome,
        });
    }

    let elapsed = t0.elapsed();
    info!(
        records = report.records.len(),
        failed = report.failed_count(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Scrape run complete"
    );
    report
}

/// One source, start to finish. Returns the candidate count and the records
/// that were written.
#[instrument(level = "info", skip_all, fields(source = %source.name))]
async fn process_source<F: Fetcher, S: Sink>(
    ctx: &RunContext<F, S>,
    source: &Source,
    stamp: &str,
) -> Result<(usize, Vec<HeadlineRecord>)> {
    let html = ctx.fetcher.fetch(&source.base_url).await?;
    let Extraction {
        candidates,
        records,
    } = extract_headlines(&html, source, stamp)?;
    info!(candidates, "Found candidate links");
    replace_contents(&ctx.sink, &source.name, &records).await?;
    Ok((candidates, records))
}
