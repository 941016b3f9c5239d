//! Application layer for VGUESS.
//!
//! This crate provides the use cases that coordinate the domain core with the
//! storage and ingestion adapters: loading the roster and playing a session.

pub mod game_usecase;
pub mod record_store;
pub mod scheduler;

pub use game_usecase::{GameUseCase, GuessOutcome};
pub use record_store::{LoadOutcome, RecordStore, RosterOrigin};
