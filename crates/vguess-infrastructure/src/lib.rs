pub mod config_service;
pub mod csv_source;
pub mod memory;
pub mod paths;
pub mod snapshot_repository;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::csv_source::CsvRosterSource;
pub use crate::memory::{MemorySnapshotRepository, StaticRosterSource};
pub use crate::snapshot_repository::JsonSnapshotRepository;
