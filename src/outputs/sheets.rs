//! Google Sheets sink.
//!
//! Writes through the Sheets v4 REST API, one worksheet per source, titled
//! exactly like the source. Worksheets must already exist in the spreadsheet;
//! a missing one fails that source only.
//!
//! Authentication is an OAuth bearer token obtained outside this program
//! (e.g. `gcloud auth print-access-token` for a service account).
//!
//! # Calls
//!
//! | Operation | Request |
//! |-----------|---------|
//! | open | `GET /v4/spreadsheets/{id}?fields=sheets.properties.title` |
//! | clear | `POST /v4/spreadsheets/{id}/values/{range}:clear` |
//! | header / rows | `POST /v4/spreadsheets/{id}/values/{range}:append?valueInputOption=RAW` |

use super::Sink;
use crate::error::{HarvestError, Result};
use crate::utils::truncate_for_log;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use tracing::{debug, info, instrument};

pub const DEFAULT_ENDPOINT: &str = "https://sheets.googleapis.com";

pub struct SheetsSink {
    client: Client,
    endpoint: String,
    spreadsheet_id: String,
    token: String,
}

#[derive(Debug, Default, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

impl SheetsSink {
    /// Build the sink from credentials. Missing or blank values are a
    /// configuration error, raised before any source is processed.
    pub fn from_credentials(spreadsheet_id: Option<&str>, token: Option<&str>) -> Result<Self> {
        let spreadsheet_id = spreadsheet_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| HarvestError::config("sheets sink needs a spreadsheet id"))?;
        let token = token
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| HarvestError::config("sheets credentials are missing"))?;
        let client = Client::builder()
            .build()
            .map_err(|e| HarvestError::config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            token: token.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/v4/spreadsheets/{}", self.endpoint, self.spreadsheet_id)
    }

    fn values_url(&self, worksheet: &str, action: &str) -> String {
        format!(
            "{}/values/{}:{action}",
            self.spreadsheet_url(),
            urlencoding::encode(&a1_range(worksheet))
        )
    }

    async fn send(&self, worksheet: &str, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| HarvestError::sink(worksheet, e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(HarvestError::sink(
            worksheet,
            format!("HTTP status {status}: {}", truncate_for_log(&body, 200)),
        ))
    }

    async fn append(&self, worksheet: &str, rows: &[Vec<String>]) -> Result<()> {
        let request = self
            .client
            .post(self.values_url(worksheet, "append"))
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": rows }));
        self.send(worksheet, request).await?;
        Ok(())
    }
}

impl fmt::Debug for SheetsSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsSink")
            .field("endpoint", &self.endpoint)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish_non_exhaustive()
    }
}

/// Quote a worksheet title as an A1 range covering the whole sheet.
fn a1_range(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

impl Sink for SheetsSink {
    type Handle = String;

    #[instrument(level = "info", skip(self))]
    async fn open_destination(&self, source_name: &str) -> Result<String> {
        let request = self
            .client
            .get(self.spreadsheet_url())
            .query(&[("fields", "sheets.properties.title")]);
        let meta: SpreadsheetMeta = self
            .send(source_name, request)
            .await?
            .json()
            .await
            .map_err(|e| HarvestError::sink(source_name, e))?;

        let titles: Vec<&str> = meta.sheets.iter().map(|s| s.properties.title.as_str()).collect();
        debug!(?titles, "Spreadsheet worksheets");
        if titles.contains(&source_name) {
            Ok(source_name.to_string())
        } else {
            Err(HarvestError::sink(source_name, "worksheet not found"))
        }
    }

    async fn clear(&self, handle: &String) -> Result<()> {
        let request = self
            .client
            .post(self.values_url(handle, "clear"))
            .json(&json!({}));
        self.send(handle, request).await?;
        Ok(())
    }

    async fn write_header(&self, handle: &String, header: &[&str]) -> Result<()> {
        let row: Vec<String> = header.iter().map(|h| h.to_string()).collect();
        self.append(handle, &[row]).await
    }

    #[instrument(level = "info", skip_all, fields(worksheet = %handle, rows = rows.len()))]
    async fn append_rows(&self, handle: &String, rows: &[Vec<String>]) -> Result<()> {
        self.append(handle, rows).await?;
        info!("Appended worksheet rows");
        Ok(())
    }
}
