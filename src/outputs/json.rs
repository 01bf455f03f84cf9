//! JSON dump of a run report.
//!
//! Files are organized by run date, one file per run named after its start
//! time:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 08-00-00.json
//!     └── 20-30-00.json
//! ```

use crate::error::Result;
use crate::models::RunReport;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `report` under `json_output_dir` and return the file path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(report: &RunReport, json_output_dir: &str) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(report)?;

    let (date, time) = report
        .started_at
        .split_once(' ')
        .unwrap_or((report.started_at.as_str(), "run"));
    let full_json_dir = PathBuf::from(json_output_dir).join(date);

    info!(dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = full_json_dir.join(format!("{}.json", time.replace(':', "-")));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote run report");
    Ok(path)
}
