//! CSV file sink.
//!
//! Each source gets `{output_dir}/{slug}.csv`, where the slug is the
//! lowercased, hyphenated source name (`"Fox News"` → `fox-news.csv`).

use super::Sink;
use crate::error::{HarvestError, Result};
use crate::utils::slugify;
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct CsvSink {
    output_dir: PathBuf,
}

/// An opened CSV destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDestination {
    pub name: String,
    pub path: PathBuf,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn write_records(&self, handle: &CsvDestination, rows: &[Vec<String>]) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&handle.path)
            .map_err(|e| HarvestError::sink(&handle.name, e))?;
        let mut writer = ::csv::WriterBuilder::new()
            .flexible(false)
            .from_writer(file);
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| HarvestError::sink(&handle.name, e))?;
        }
        writer
            .flush()
            .map_err(|e| HarvestError::sink(&handle.name, e))?;
        Ok(())
    }
}

impl Sink for CsvSink {
    type Handle = CsvDestination;

    #[instrument(level = "debug", skip(self))]
    async fn open_destination(&self, source_name: &str) -> Result<CsvDestination> {
        let slug = slugify(source_name);
        if slug.is_empty() {
            return Err(HarvestError::sink(
                source_name,
                "name has no characters usable in a file name",
            ));
        }
        fs::create_dir_all(&self.output_dir).map_err(|e| HarvestError::sink(source_name, e))?;
        Ok(CsvDestination {
            name: source_name.to_string(),
            path: self.output_dir.join(format!("{slug}.csv")),
        })
    }

    async fn clear(&self, handle: &CsvDestination) -> Result<()> {
        File::create(&handle.path).map_err(|e| HarvestError::sink(&handle.name, e))?;
        Ok(())
    }

    async fn write_header(&self, handle: &CsvDestination, header: &[&str]) -> Result<()> {
        let row: Vec<String> = header.iter().map(|h| h.to_string()).collect();
        self.write_records(handle, &[row])
    }

    #[instrument(level = "debug", skip_all, fields(path = %handle.path.display()))]
    async fn append_rows(&self, handle: &CsvDestination, rows: &[Vec<String>]) -> Result<()> {
        self.write_records(handle, rows)?;
        info!(rows = rows.len(), path = %handle.path.display(), "Appended CSV rows");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HeadlineRecord;
    use crate::outputs::replace_contents;
    use tempfile::TempDir;

    fn records() -> Vec<HeadlineRecord> {
        vec![
            HeadlineRecord {
                timestamp: "2025-05-06 20:30:00".into(),
                headline_text: "Senate passes bill, 51-49".into(),
                url: "https://site.com/a".into(),
            },
            HeadlineRecord {
                timestamp: "2025-05-06 20:30:00".into(),
                headline_text: "Storm \"Ada\" nears coast".into(),
                url: "https://site.com/b".into(),
            },
        ]
    }

    #[tokio::test]
    async fn test_full_replace_writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let sink = CsvSink::new(dir.path());

        let written = replace_contents(&sink, "Fox News", &records()).await.unwrap();
        assert_eq!(written, 2);

        let path = dir.path().join("fox-news.csv");
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["Date", "Headline", "Link"]);
        assert_eq!(rows[1][1], "Senate passes bill, 51-49");
        assert_eq!(rows[2][1], "Storm \"Ada\" nears coast");
    }

    #[tokio::test]
    async fn test_second_run_replaces_previous_contents() {
        let dir = TempDir::new().unwrap();
        let sink = CsvSink::new(dir.path());

        replace_contents(&sink, "Townhall", &records()).await.unwrap();
        replace_contents(&sink, "Townhall", &[]).await.unwrap();

        let contents = std::fs::read_to_string(dir.path().join("townhall.csv")).unwrap();
        assert_eq!(contents, "Date,Headline,Link\n");
    }

    #[tokio::test]
    async fn test_unusable_name_is_sink_error() {
        let dir = TempDir::new().unwrap();
        let sink = CsvSink::new(dir.path());
        let err = sink.open_destination("!!!").await.unwrap_err();
        assert!(matches!(err, HarvestError::Sink { .. }));
    }
}
