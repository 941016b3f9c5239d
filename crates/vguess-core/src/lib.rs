//! Core domain of the VGUESS deduction game.
//!
//! Everything in this crate is free of I/O: records and their normalization,
//! the comparison engine, target selection and the session state machine.
//! Storage and ingestion are reached through the traits in
//! [`character::repository`].

pub mod character;
pub mod compare;
pub mod config;
pub mod error;
pub mod format;
pub mod session;
pub mod share;

// Re-export common error type
pub use error::VguessError;
