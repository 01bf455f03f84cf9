//! Command-line interface definitions for Headline Harvest.
//!
//! All arguments can be provided via command-line flags or environment
//! variables.

use crate::config::DEFAULT_TIMEZONE;
use crate::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::outputs::sheets::DEFAULT_ENDPOINT;
use clap::{Parser, ValueEnum};

/// Where harvested headlines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// One CSV file per source.
    Csv,
    /// One worksheet per source in a Google spreadsheet.
    Sheets,
}

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Built-in outlets, CSV files in ./headlines
/// headline_harvest
///
/// # Custom sources into Google Sheets
/// headline_harvest --sources sources.yaml --sink sheets \
///     --spreadsheet-id 1AbC... --sheets-token "$(gcloud auth print-access-token)"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// YAML file listing sources; the built-in outlets are used when omitted
    #[arg(short, long, env = "HEADLINE_SOURCES")]
    pub sources: Option<String>,

    /// Destination backend
    #[arg(long, value_enum, env = "HEADLINE_SINK", default_value_t = SinkKind::Csv)]
    pub sink: SinkKind,

    /// Output directory for the CSV sink
    #[arg(short, long, env = "HEADLINE_CSV_DIR", default_value = "./headlines")]
    pub csv_output_dir: String,

    /// Spreadsheet id for the sheets sink
    #[arg(long, env = "SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// OAuth access token for the sheets sink
    #[arg(long, env = "GOOGLE_SHEETS_TOKEN", hide_env_values = true)]
    pub sheets_token: Option<String>,

    /// Sheets API base URL (for proxies and local emulators)
    #[arg(long, env = "SHEETS_ENDPOINT", default_value = DEFAULT_ENDPOINT, hide = true)]
    pub sheets_endpoint: String,

    /// IANA time zone used for the run timestamp
    #[arg(long, env = "HEADLINE_TZ", default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Per-request fetch timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// User-Agent sent with every fetch
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Also write the run report as JSON under this directory
    #[arg(short, long, env = "HEADLINE_JSON_DIR")]
    pub json_output_dir: Option<String>,
}
