//! CSV roster source.

use std::path::PathBuf;

use async_trait::async_trait;
use vguess_core::character::{RawRow, RosterSource};
use vguess_core::error::{Result, VguessError};

/// Reads roster rows from a CSV file with a header line.
///
/// Blank lines and rows whose cells are all empty are skipped. Rows shorter
/// than the header are accepted; missing cells are simply absent from the row.
#[derive(Debug, Clone)]
pub struct CsvRosterSource {
    path: PathBuf,
}

impl CsvRosterSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RosterSource for CsvRosterSource {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            VguessError::ingestion(format!("Failed to read {:?}: {}", self.path, e))
        })?;
        parse_rows(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parses CSV text into header-keyed rows.
pub fn parse_rows(text: &str) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn csv_error(err: csv::Error) -> VguessError {
    VguessError::parse("CSV", err.to_string())
}
