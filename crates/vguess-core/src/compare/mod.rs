//! Per-attribute comparison of a guess against the target.

pub mod engine;
pub mod model;

pub use engine::{compare, compare_dates, compare_numeric, compare_records, compare_scalar, compare_tags};
pub use model::{
    Attribute, AttributeValue, ComparisonCell, ComparisonRow, Direction, MatchKind, Verdict,
    HINT_DOWN_ICON, HINT_UP_ICON,
};
