//! Raw tabular rows to [`CharacterRecord`]s.
//!
//! The normalizer is pure: it never touches storage and never checks id
//! uniqueness (that is a [`Roster`] invariant). Numeric cells are parsed with
//! base-10 conversion; what happens to an unparseable number depends on the
//! [`NumericMode`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::model::{Affiliation, CharacterRecord, Seisoness, Status};
use super::roster::Roster;
use crate::error::Result;

/// One raw source row, keyed by column header.
pub type RawRow = HashMap<String, String>;

/// Directory under which portrait assets live.
pub const PORTRAIT_DIR: &str = "/assets/portrait";

/// How unparseable numeric cells are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericMode {
    /// Reject the whole row and report it.
    #[default]
    Strict,
    /// Keep the row and treat the value as unknown.
    Lenient,
}

/// A row that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Zero-based data row index (header excluded).
    pub row_index: usize,
    pub column: String,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {}: column '{}': {}",
            self.row_index, self.column, self.message
        )
    }
}

/// Outcome of running every source row through the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub rejected: Vec<RowError>,
}

impl IngestReport {
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// Normalizes one raw row.
///
/// `row_index` is the fallback id when the row has no parseable `Id` column.
pub fn normalize_row(
    row: &RawRow,
    row_index: usize,
    mode: NumericMode,
) -> std::result::Result<CharacterRecord, RowError> {
    let first_name = text(row, "first_name");
    let last_name = text(row, "last_name");

    let id = cell(row, "Id")
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(row_index as u32);

    let nb_followers = number::<u64>(row, "nb_followers", row_index, mode)?;
    let height = number::<u32>(row, "height", row_index, mode)?;

    Ok(CharacterRecord {
        id,
        portrait: portrait_path(&first_name, &last_name),
        first_name,
        last_name,
        colour: text(row, "colour"),
        gender: text(row, "gender"),
        status: cell(row, "status")
            .and_then(Status::from_column)
            .unwrap_or_default(),
        speciality: split_list(cell(row, "speciality")),
        nb_followers,
        debut_date: text(row, "debut_date"),
        height,
        affiliation: cell(row, "affiliation")
            .and_then(Affiliation::from_column)
            .unwrap_or_default(),
        country: split_list(cell(row, "country")),
        seisoness: cell(row, "seisoness")
            .and_then(Seisoness::from_column)
            .unwrap_or_default(),
        nickname: split_list(cell(row, "nickname")),
        has_been_selected: cell(row, "is_selected") == Some("true"),
    })
}

/// Normalizes all rows and builds the sorted roster.
///
/// Rejected rows are collected in the report and skipped. Duplicate ids among
/// the accepted rows fail the whole ingestion.
pub fn ingest_rows(rows: &[RawRow], mode: NumericMode) -> Result<(Roster, IngestReport)> {
    let mut report = IngestReport::default();
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        match normalize_row(row, index, mode) {
            Ok(record) => records.push(record),
            Err(rejection) => {
                tracing::warn!("Rejected roster {}", rejection);
                report.rejected.push(rejection);
            }
        }
    }

    report.accepted = records.len();
    let roster = Roster::from_records(records)?;
    Ok((roster, report))
}

/// Splits a comma-separated cell into trimmed, non-empty items.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Normalizes one name part for use in an asset key.
///
/// Apostrophes are dropped, every run of non-alphanumeric characters becomes a
/// single underscore, and each underscore-delimited word is title-cased.
/// Applying it to its own output is a no-op.
pub fn normalize_name_part(raw: &str) -> String {
    let without_apostrophes: String = raw
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}' | '\u{2018}' | '\u{00B4}'))
        .collect();

    without_apostrophes
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join("_")
}

/// Canonical asset key for a name: `First_Last`, or the single present part.
pub fn portrait_key(first_name: &str, last_name: &str) -> String {
    let first = normalize_name_part(first_name);
    let last = normalize_name_part(last_name);
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{}_{}", first, last),
        (false, true) => first,
        _ => last,
    }
}

/// Full portrait asset path for a name.
pub fn portrait_path(first_name: &str, last_name: &str) -> String {
    format!(
        "{}/{}_Portrait.webp",
        PORTRAIT_DIR,
        portrait_key(first_name, last_name)
    )
}

fn title_case(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(head) => head.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// A trimmed, non-empty cell value.
fn cell<'a>(row: &'a RawRow, column: &str) -> Option<&'a str> {
    row.get(column)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn text(row: &RawRow, column: &str) -> String {
    cell(row, column).unwrap_or_default().to_string()
}

fn number<T: std::str::FromStr>(
    row: &RawRow,
    column: &str,
    row_index: usize,
    mode: NumericMode,
) -> std::result::Result<Option<T>, RowError> {
    let Some(raw) = cell(row, column) else {
        return Ok(None);
    };

    match raw.parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => match mode {
            NumericMode::Lenient => Ok(None),
            NumericMode::Strict => Err(RowError {
                row_index,
                column: column.to_string(),
                message: format!("'{}' is not a base-10 integer", raw),
            }),
        },
    }
}
