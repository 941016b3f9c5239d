//! In-memory adapters, for embedding and tests.

use std::sync::Mutex;

use async_trait::async_trait;
use vguess_core::character::{CharacterRecord, RawRow, RosterSource, SnapshotRepository};
use vguess_core::error::{Result, VguessError};

/// Snapshot slot held in memory.
#[derive(Default)]
pub struct MemorySnapshotRepository {
    slot: Mutex<Option<Vec<CharacterRecord>>>,
}

impl MemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `records` already stored.
    pub fn with_records(records: Vec<CharacterRecord>) -> Self {
        Self {
            slot: Mutex::new(Some(records)),
        }
    }

    /// Copy of what is currently stored.
    pub fn stored(&self) -> Option<Vec<CharacterRecord>> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

#[async_trait]
impl SnapshotRepository for MemorySnapshotRepository {
    async fn load_snapshot(&self) -> Result<Option<Vec<CharacterRecord>>> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| VguessError::internal(format!("Snapshot lock poisoned: {}", e)))?;
        Ok(slot.clone())
    }

    async fn save_snapshot(&self, records: &[CharacterRecord]) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| VguessError::internal(format!("Snapshot lock poisoned: {}", e)))?;
        *slot = Some(records.to_vec());
        Ok(())
    }

    async fn clear_snapshot(&self) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| VguessError::internal(format!("Snapshot lock poisoned: {}", e)))?;
        *slot = None;
        Ok(())
    }
}

/// Roster source serving fixed rows, or failing on demand.
pub struct StaticRosterSource {
    rows: Option<Vec<RawRow>>,
}

impl StaticRosterSource {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows: Some(rows) }
    }

    /// A source whose fetch always fails.
    pub fn unavailable() -> Self {
        Self { rows: None }
    }
}

#[async_trait]
impl RosterSource for StaticRosterSource {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        self.rows
            .clone()
            .ok_or_else(|| VguessError::ingestion("static source is unavailable"))
    }

    fn describe(&self) -> String {
        "static rows".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vguess_core::character::normalizer::{NumericMode, ingest_rows};

    fn records() -> Vec<CharacterRecord> {
        let row: RawRow = HashMap::from([
            ("Id".to_string(), "1".to_string()),
            ("first_name".to_string(), "Ookami".to_string()),
        ]);
        ingest_rows(&[row], NumericMode::Strict)
            .unwrap()
            .0
            .into_records()
    }

    #[tokio::test]
    async fn test_slot_round_trip_and_clear() {
        let repo = MemorySnapshotRepository::new();
        assert!(repo.load_snapshot().await.unwrap().is_none());

        repo.save_snapshot(&records()).await.unwrap();
        assert_eq!(repo.stored().unwrap().len(), 1);

        repo.clear_snapshot().await.unwrap();
        assert!(repo.stored().is_none());
    }

    #[tokio::test]
    async fn test_prefilled_slot() {
        let repo = MemorySnapshotRepository::with_records(records());
        assert_eq!(repo.load_snapshot().await.unwrap().unwrap()[0].id, 1);
    }

    #[tokio::test]
    async fn test_unavailable_source_fails() {
        let err = StaticRosterSource::unavailable().fetch_rows().await.unwrap_err();
        assert!(matches!(err, VguessError::Ingestion(_)));
        assert!(StaticRosterSource::new(Vec::new()).fetch_rows().await.unwrap().is_empty());
    }
}
