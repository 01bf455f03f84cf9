//! # Headline Harvest
//!
//! Fetches the homepages of a fixed set of news outlets, extracts headline
//! links and rewrites one destination per outlet with today's headlines.
//!
//! ## Usage
//!
//! ```sh
//! headline_harvest -c ./headlines
//! headline_harvest --sink sheets --spreadsheet-id ID --sheets-token TOKEN
//! ```
//!
//! ## Architecture
//!
//! Each invocation is one run. For every configured source, in order:
//! 1. **Fetching**: download the homepage ([`fetch`])
//! 2. **Extracting**: select, resolve, filter and de-duplicate headlines ([`scrapers`])
//! 3. **Writing**: clear the source's destination and write header + rows ([`outputs`])
//!
//! A failure in any step is reported against that source and the run
//! continues. Configuration problems stop the run before any source starts.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod fetch;
mod models;
mod outputs;
mod runner;
mod scrapers;
mod utils;

use cli::{Cli, SinkKind};
use config::{RunContext, load_sources, parse_timezone};
use fetch::HttpFetcher;
use models::RunReport;
use outputs::csv::CsvSink;
use outputs::sheets::SheetsSink;
use outputs::{json, summary};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args.sink, ?args.sources, "Parsed CLI arguments");
    info!("headline_harvest starting up");

    // ---- Pre-run configuration: any failure here aborts before scraping ----
    let timezone = parse_timezone(&args.timezone)?;
    let sources = load_sources(args.sources.as_deref()).await?;
    let fetcher = HttpFetcher::new(&args.user_agent, Duration::from_secs(args.timeout_secs))?;
    if let Some(dir) = &args.json_output_dir {
        ensure_writable_dir(dir).await?;
    }

    let report = match args.sink {
        SinkKind::Csv => {
            if let Err(e) = ensure_writable_dir(&args.csv_output_dir).await {
                error!(path = %args.csv_output_dir, error = %e, "CSV output directory is not writable");
                return Err(e.into());
            }
            let sink = CsvSink::new(&args.csv_output_dir);
            runner::run(&RunContext::new(sources, timezone, fetcher, sink)).await
        }
        SinkKind::Sheets => {
            let sink = SheetsSink::from_credentials(
                args.spreadsheet_id.as_deref(),
                args.sheets_token.as_deref(),
            )
            .inspect_err(|e| error!(error = %e, "Google Sheets credentials are unusable"))?
            .with_endpoint(&args.sheets_endpoint);
            runner::run(&RunContext::new(sources, timezone, fetcher, sink)).await
        }
    };

    finish(&args, &report).await;
    Ok(())
}

/// Show the run outcome and, when asked, persist it as JSON.
async fn finish(args: &Cli, report: &RunReport) {
    print!("{}", summary::render_summary(report));

    if let Some(dir) = &args.json_output_dir {
        match json::write_report(report, dir).await {
            Ok(path) => info!(path = %path.display(), "Run report written"),
            Err(e) => error!(error = %e, "Failed to write run report"),
        }
    }
}
