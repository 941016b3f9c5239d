//! File-backed roster snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use vguess_core::character::{CharacterRecord, SnapshotRepository};
use vguess_core::error::{Result, VguessError};

use crate::paths::VguessPaths;
use crate::storage::AtomicJsonFile;

/// Stores the normalized roster as a JSON array in a single file.
///
/// File I/O runs on the blocking pool so callers on the async runtime are
/// never stalled by disk access.
#[derive(Clone)]
pub struct JsonSnapshotRepository {
    file: Arc<AtomicJsonFile<Vec<CharacterRecord>>>,
}

impl JsonSnapshotRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    /// Uses the platform data directory (see [`VguessPaths::snapshot_file`]).
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(VguessPaths::snapshot_file()?))
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }
}

#[async_trait]
impl SnapshotRepository for JsonSnapshotRepository {
    async fn load_snapshot(&self) -> Result<Option<Vec<CharacterRecord>>> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.load().map_err(VguessError::from))
            .await
            .map_err(|e| VguessError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn save_snapshot(&self, records: &[CharacterRecord]) -> Result<()> {
        let file = self.file.clone();
        let records = records.to_vec();
        tokio::task::spawn_blocking(move || file.save(&records).map_err(VguessError::from))
            .await
            .map_err(|e| VguessError::internal(format!("Failed to join task: {}", e)))??;

        tracing::debug!("Saved roster snapshot to {:?}", self.file.path());
        Ok(())
    }

    async fn clear_snapshot(&self) -> Result<()> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.remove().map_err(VguessError::from))
            .await
            .map_err(|e| VguessError::internal(format!("Failed to join task: {}", e)))?
    }
}
