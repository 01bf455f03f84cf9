//! Destinations for harvested headlines.
//!
//! # Submodules
//!
//! - [`csv`]: one CSV file per source under an output directory
//! - [`sheets`]: one worksheet per source in a Google spreadsheet
//! - [`json`]: optional JSON dump of the whole [`RunReport`](crate::models::RunReport)
//! - [`summary`]: human-readable status lines for the end of a run
//!
//! # Full replace
//!
//! A destination is never appended to across runs. [`replace_contents`] drives
//! the [`Sink`] calls in the only valid order: open, clear, header, rows.
//! ```text
//! headlines/
//! ├── breitbart.csv
//! ├── fox-news.csv
//! └── ...
//! ```

pub mod csv;
pub mod json;
pub mod sheets;
pub mod summary;

use crate::error::Result;
use crate::models::{HEADER_ROW, HeadlineRecord};
use tracing::{debug, instrument};

/// A per-source tabular destination.
pub trait Sink {
    /// Resolved destination for one source.
    type Handle;

    async fn open_destination(&self, source_name: &str) -> Result<Self::Handle>;
    async fn clear(&self, handle: &Self::Handle) -> Result<()>;
    async fn write_header(&self, handle: &Self::Handle, header: &[&str]) -> Result<()>;
    async fn append_rows(&self, handle: &Self::Handle, rows: &[Vec<String>]) -> Result<()>;
}

/// Replace everything stored for `source_name` with a header row followed by
/// `records`. Returns the number of data rows written.
///
/// With no records the destination is still cleared and given its header.
#[instrument(level = "info", skip(sink, records), fields(records = records.len()))]
pub async fn replace_contents<S: Sink>(
    sink: &S,
    source_name: &str,
    records: &[HeadlineRecord],
) -> Result<usize> {
    let handle = sink.open_destination(source_name).await?;
    sink.clear(&handle).await?;
    sink.write_header(&handle, &HEADER_ROW).await?;
    if records.is_empty() {
        debug!("No rows to append");
        return Ok(0);
    }
    let rows: Vec<Vec<String>> = records.iter().map(HeadlineRecord::to_row).collect();
    sink.append_rows(&handle, &rows).await?;
    Ok(rows.len())
}


#[cfg(test)]
mod tests {
    use super::testing::MemorySink;
    use super::*;

    fn record(text: &str, url: &str) -> HeadlineRecord {
        HeadlineRecord {
            timestamp: "2025-05-06 08:00:00".to_string(),
            headline_text: text.to_string(),
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_replace_contents_call_order() {
        let sink = MemorySink::default();
        let records = vec![
            record("A", "https://site.com/a"),
            record("B", "https://site.com/b"),
        ];
        let written = replace_contents(&sink, "Site", &records).await.unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            *sink.calls.borrow(),
            vec!["open:Site", "clear:Site", "header:Site", "append:Site:2"]
        );
        let table = sink.table("Site").unwrap();
        assert_eq!(table[0], vec!["Date", "Headline", "Link"]);
        assert_eq!(table[2], vec!["2025-05-06 08:00:00", "B", "https://site.com/b"]);
    }

    #[tokio::test]
    async fn test_replace_contents_empty_writes_header_only() {
        let sink = MemorySink::default();
        sink.tables
            .borrow_mut()
            .insert("Site".to_string(), vec![vec!["stale".to_string()]]);

        let written = replace_contents(&sink, "Site", &[]).await.unwrap();
        assert_eq!(written, 0);
        assert_eq!(
            *sink.calls.borrow(),
            vec!["open:Site", "clear:Site", "header:Site"]
        );
        assert_eq!(sink.table("Site").unwrap(), vec![vec!["Date", "Headline", "Link"]]);
    }

    #[tokio::test]
    async fn test_replace_contents_open_failure_propagates() {
        let sink = MemorySink::failing_on(&["Site"]);
        let err = replace_contents(&sink, "Site", &[]).await.unwrap_err();
        assert_eq!(err.kind(), "sink");
        assert_eq!(*sink.calls.borrow(), vec!["open:Site"]);
    }
}
