//! Character records: model, normalization, roster and storage seams.

pub mod model;
pub mod normalizer;
pub mod repository;
pub mod roster;

pub use model::{Affiliation, CharacterRecord, Seisoness, Status};
pub use normalizer::{IngestReport, NumericMode, RawRow, RowError};
pub use repository::{RosterSource, SnapshotRepository};
pub use roster::Roster;
