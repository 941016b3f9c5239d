//! The comparison engine.
//!
//! Every function here is pure and holds no state, so cells of the same guess
//! can be computed in any order or concurrently.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::model::{
    Attribute, AttributeValue, ComparisonCell, ComparisonRow, Direction, MatchKind, Verdict,
};
use crate::character::CharacterRecord;
use crate::format::{debut_year, display_value};

/// Compares a guessed attribute value against the target's.
///
/// Values of different kinds never match.
pub fn compare(guess: AttributeValue<'_>, target: AttributeValue<'_>) -> Verdict {
    match (guess, target) {
        (AttributeValue::Text(g), AttributeValue::Text(t)) => compare_scalar(g, t),
        (AttributeValue::Number(g), AttributeValue::Number(t)) => compare_numeric(g, t),
        (AttributeValue::Date(g), AttributeValue::Date(t)) => compare_dates(g, t),
        (AttributeValue::Tags(g), AttributeValue::Tags(t)) => compare_tags(g, t),
        _ => Verdict::NO_MATCH,
    }
}

/// Scalar rule: EXACT on equality, NONE otherwise.
pub fn compare_scalar<T: PartialEq + ?Sized>(guess: &T, target: &T) -> Verdict {
    if guess == target {
        Verdict::EXACT
    } else {
        Verdict::NO_MATCH
    }
}

/// Numeric rule: scalar equality plus a direction hint when values differ.
///
/// Two unknown values match; an unknown against a known value is NONE with
/// no direction.
pub fn compare_numeric(guess: Option<u64>, target: Option<u64>) -> Verdict {
    match (guess, target) {
        (Some(g), Some(t)) => ordered(g, t),
        (None, None) => Verdict::EXACT,
        _ => Verdict::NO_MATCH,
    }
}

/// Date rule: compare calendar years; fall back to opaque text comparison
/// when either side is not a recognizable date.
pub fn compare_dates(guess: &str, target: &str) -> Verdict {
    match (debut_year(guess), debut_year(target)) {
        (Some(g), Some(t)) => ordered(g, t),
        _ => compare_scalar(guess.trim(), target.trim()),
    }
}

/// Multi-valued rule: set semantics, order and duplicates ignored.
pub fn compare_tags(guess: &[String], target: &[String]) -> Verdict {
    let guess: HashSet<&str> = guess.iter().map(String::as_str).collect();
    let target: HashSet<&str> = target.iter().map(String::as_str).collect();

    if guess == target {
        // Also covers both sides being empty.
        Verdict::EXACT
    } else if !guess.is_disjoint(&target) {
        Verdict::PARTIAL
    } else {
        Verdict::NO_MATCH
    }
}

/// Compares every scored attribute of `guess` against `target`.
pub fn compare_records(guess: &CharacterRecord, target: &CharacterRecord) -> ComparisonRow {
    let cells = Attribute::SCORED
        .iter()
        .map(|&attribute| ComparisonCell {
            attribute,
            verdict: compare(attribute.value_of(guess), attribute.value_of(target)),
            display: display_value(attribute, guess),
        })
        .collect();

    ComparisonRow {
        guess_id: guess.id,
        guess_name: guess.display_name(),
        portrait: guess.portrait.clone(),
        cells,
    }
}

fn ordered<T: Ord>(guess: T, target: T) -> Verdict {
    let direction = match guess.cmp(&target) {
        Ordering::Equal => return Verdict::EXACT,
        Ordering::Less => Direction::GuessBelow,
        Ordering::Greater => Direction::GuessAbove,
    };
    Verdict {
        kind: MatchKind::NoMatch,
        direction: Some(direction),
    }
}
