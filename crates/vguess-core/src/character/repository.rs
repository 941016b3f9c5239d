//! Storage and source traits for the roster.

use async_trait::async_trait;

use super::model::CharacterRecord;
use super::normalizer::RawRow;
use crate::error::Result;

/// Durable key-value slot holding the normalized roster snapshot.
///
/// Reads are all-or-nothing: an implementation returns either the complete
/// snapshot, `Ok(None)` when the slot is empty, or an error when the stored
/// data cannot be decoded. Callers treat the error case as absent.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Reads the stored snapshot.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(records))`: A complete snapshot was found
    /// - `Ok(None)`: Nothing has been stored yet
    /// - `Err(_)`: The slot exists but could not be read or decoded
    async fn load_snapshot(&self) -> Result<Option<Vec<CharacterRecord>>>;

    /// Replaces the stored snapshot with `records`.
    async fn save_snapshot(&self, records: &[CharacterRecord]) -> Result<()>;

    /// Empties the slot so the next load re-ingests.
    async fn clear_snapshot(&self) -> Result<()>;
}

/// Raw tabular source the roster is ingested from.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Fetches every data row, header excluded, in source order.
    async fn fetch_rows(&self) -> Result<Vec<RawRow>>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}
