//! The sorted, identity-unique set of playable characters.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::model::CharacterRecord;
use crate::error::{Result, VguessError};

/// Ordered roster of characters.
///
/// Built once per ingestion and replaced wholesale on re-ingestion. Records
/// are sorted by first name, then last name, and ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    records: Vec<CharacterRecord>,
}

impl Roster {
    /// An empty roster; valid, if degenerate.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a roster, rejecting duplicate ids and sorting by name.
    pub fn from_records(mut records: Vec<CharacterRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(VguessError::DuplicateId(record.id));
            }
        }

        records.sort_by(|a, b| {
            locale_cmp(&a.first_name, &b.first_name)
                .then_with(|| locale_cmp(&a.last_name, &b.last_name))
        });

        Ok(Self { records })
    }

    pub fn records(&self) -> &[CharacterRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CharacterRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by id.
    pub fn get(&self, id: u32) -> Option<&CharacterRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Returns a copy of this roster with the given record flagged as used.
    ///
    /// Returns `None` if no record has that id.
    pub fn with_selected(&self, id: u32) -> Option<Self> {
        let mut records = self.records.clone();
        let record = records.iter_mut().find(|r| r.id == id)?;
        record.has_been_selected = true;
        Some(Self { records })
    }

    pub fn into_records(self) -> Vec<CharacterRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a CharacterRecord;
    type IntoIter = std::slice::Iter<'a, CharacterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Collation used for roster ordering.
///
/// Compares in three levels, like a locale collator: base letters first
/// (accents and case ignored, so "Élodie" sorts with the E's), then accents
/// ("Elodie" before "Élodie"), then case (lowercase first). The raw strings
/// break any remaining tie so the order stays total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(&base_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}

/// Decomposed, mark-free, lowercased text.
fn base_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Decomposed, lowercased text; combining marks are kept.
fn accent_key(text: &str) -> String {
    text.nfd().flat_map(char::to_lowercase).collect()
}

/// One flag per letter, uppercase sorting after lowercase.
fn case_key(text: &str) -> Vec<bool> {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
        .collect()
}
