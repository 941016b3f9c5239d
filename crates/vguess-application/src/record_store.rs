//! The record store: snapshot-first roster loading.

use std::sync::Arc;

use tokio::sync::RwLock;
use vguess_core::character::normalizer::ingest_rows;
use vguess_core::character::{
    IngestReport, NumericMode, Roster, RosterSource, SnapshotRepository,
};
use vguess_core::error::{Result, VguessError};

/// Where the current roster came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterOrigin {
    /// Read back from the durable snapshot.
    Snapshot,
    /// Freshly ingested from the raw source.
    Ingested,
    /// Neither worked; the roster is empty.
    Unavailable,
}

/// Result of [`RecordStore::load`].
///
/// Loading never fails outright: when no roster can be produced the outcome
/// carries an empty roster plus the error that caused it.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub roster: Arc<Roster>,
    pub origin: RosterOrigin,
    /// Present when the source was ingested.
    pub report: Option<IngestReport>,
    pub error: Option<VguessError>,
}

/// Owns the roster and keeps it in sync with the snapshot slot.
pub struct RecordStore {
    snapshot: Arc<dyn SnapshotRepository>,
    source: Arc<dyn RosterSource>,
    numeric_mode: NumericMode,
    roster: RwLock<Arc<Roster>>,
}

impl RecordStore {
    pub fn new(
        snapshot: Arc<dyn SnapshotRepository>,
        source: Arc<dyn RosterSource>,
        numeric_mode: NumericMode,
    ) -> Self {
        Self {
            snapshot,
            source,
            numeric_mode,
            roster: RwLock::new(Arc::new(Roster::empty())),
        }
    }

    /// Current in-memory roster (empty until the first load).
    pub async fn roster(&self) -> Arc<Roster> {
        self.roster.read().await.clone()
    }

    /// Loads the roster: the snapshot when it is present and well formed,
    /// otherwise a fresh ingestion that is then persisted.
    pub async fn load(&self) -> LoadOutcome {
        if let Some(roster) = self.read_snapshot().await {
            tracing::info!("Loaded {} characters from snapshot", roster.len());
            let roster = self.replace(roster).await;
            return LoadOutcome {
                roster,
                origin: RosterOrigin::Snapshot,
                report: None,
                error: None,
            };
        }

        self.ingest().await
    }

    /// Drops the snapshot and re-ingests from the source.
    pub async fn reload(&self) -> LoadOutcome {
        if let Err(e) = self.snapshot.clear_snapshot().await {
            tracing::warn!("Failed to clear roster snapshot: {}", e);
        }
        self.ingest().await
    }

    /// The roster as currently persisted, falling back to memory when the
    /// slot cannot be read.
    pub async fn stored_roster(&self) -> Arc<Roster> {
        match self.read_snapshot().await {
            Some(roster) => Arc::new(roster),
            None => self.roster().await,
        }
    }

    /// Flags a character as used as a target and persists the change.
    pub async fn mark_consumed(&self, id: u32) -> Result<()> {
        let current = self.stored_roster().await;
        let updated = current
            .with_selected(id)
            .ok_or_else(|| VguessError::not_found("character", id.to_string()))?;

        self.snapshot.save_snapshot(updated.records()).await?;
        self.replace(updated).await;
        tracing::debug!("Marked character {} as consumed", id);
        Ok(())
    }

    async fn read_snapshot(&self) -> Option<Roster> {
        match self.snapshot.load_snapshot().await {
            Ok(Some(records)) => match Roster::from_records(records) {
                Ok(roster) => Some(roster),
                Err(e) => {
                    tracing::warn!("Roster snapshot rejected, treating as absent: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Roster snapshot unreadable, treating as absent: {}", e);
                None
            }
        }
    }

    async fn ingest(&self) -> LoadOutcome {
        let source = self.source.describe();

        let rows = match self.source.fetch_rows().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Failed to fetch roster from {}: {}", source, e);
                return self.unavailable(e).await;
            }
        };

        let (roster, report) = match ingest_rows(&rows, self.numeric_mode) {
            Ok(ingested) => ingested,
            Err(e) => {
                tracing::error!("Failed to ingest roster from {}: {}", source, e);
                return self.unavailable(e).await;
            }
        };

        if report.has_rejections() {
            tracing::warn!(
                "Ingested {} characters from {}, rejected {} row(s)",
                report.accepted,
                source,
                report.rejected.len()
            );
        } else {
            tracing::info!("Ingested {} characters from {}", report.accepted, source);
        }

        if let Err(e) = self.snapshot.save_snapshot(roster.records()).await {
            tracing::warn!("Failed to persist roster snapshot: {}", e);
        }

        let roster = self.replace(roster).await;
        LoadOutcome {
            roster,
            origin: RosterOrigin::Ingested,
            report: Some(report),
            error: None,
        }
    }

    async fn unavailable(&self, error: VguessError) -> LoadOutcome {
        let roster = self.replace(Roster::empty()).await;
        LoadOutcome {
            roster,
            origin: RosterOrigin::Unavailable,
            report: None,
            error: Some(error),
        }
    }

    async fn replace(&self, roster: Roster) -> Arc<Roster> {
        let roster = Arc::new(roster);
        *self.roster.write().await = roster.clone();
        roster
    }
}
