//! Character domain models.
//!
//! A [`CharacterRecord`] is one playable roster entry, already normalized from
//! the raw tabular source. The same shape is persisted verbatim in the roster
//! snapshot, so every field here is part of the snapshot format.

use serde::{Deserialize, Serialize};

/// Career status of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Graduate,
    #[default]
    Actif,
    Hiatus,
    Affiliate,
}

impl Status {
    /// Parses a source column value, ignoring case and surrounding whitespace.
    pub fn from_column(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GRADUATE" => Some(Self::Graduate),
            "ACTIF" => Some(Self::Actif),
            "HIATUS" => Some(Self::Hiatus),
            "AFFILIATE" => Some(Self::Affiliate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Graduate => "GRADUATE",
            Self::Actif => "ACTIF",
            Self::Hiatus => "HIATUS",
            Self::Affiliate => "AFFILIATE",
        }
    }
}

/// Agency a character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Affiliation {
    Hololive,
    #[default]
    Indie,
    Phaseconnect,
}

impl Affiliation {
    pub fn from_column(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "HOLOLIVE" => Some(Self::Hololive),
            "INDIE" => Some(Self::Indie),
            "PHASECONNECT" => Some(Self::Phaseconnect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hololive => "HOLOLIVE",
            Self::Indie => "INDIE",
            Self::Phaseconnect => "PHASECONNECT",
        }
    }
}

/// Decency level of a character's content, from wholesome to risqué.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Seisoness {
    Seiso,
    Neutral,
    #[default]
    Yabai,
}

impl Seisoness {
    pub fn from_column(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SEISO" => Some(Self::Seiso),
            "NEUTRAL" => Some(Self::Neutral),
            "YABAI" => Some(Self::Yabai),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seiso => "SEISO",
            Self::Neutral => "NEUTRAL",
            Self::Yabai => "YABAI",
        }
    }
}

/// One playable roster entry.
///
/// `id` is the sole identity key: two records are "the same character" iff
/// their ids are equal, regardless of any other field. Multi-valued fields are
/// always present; missing data is an empty vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub colour: String,
    pub gender: String,
    pub status: Status,
    #[serde(default)]
    pub speciality: Vec<String>,
    /// `None` when the source left the cell empty; zero is a real count.
    pub nb_followers: Option<u64>,
    pub debut_date: String,
    /// Height in centimetres, `None` when unknown.
    pub height: Option<u32>,
    pub affiliation: Affiliation,
    #[serde(default)]
    pub country: Vec<String>,
    pub seisoness: Seisoness,
    #[serde(default)]
    pub nickname: Vec<String>,
    /// Asset path of the portrait, derived from the normalized name.
    pub portrait: String,
    /// Set once the character has been the target of a finished session.
    #[serde(default)]
    pub has_been_selected: bool,
}

impl CharacterRecord {
    /// Full display name, `"first last"` with empty parts dropped.
    pub fn display_name(&self) -> String {
        match (self.first_name.trim(), self.last_name.trim()) {
            ("", last) => last.to_string(),
            (first, "") => first.to_string(),
            (first, last) => format!("{} {}", first, last),
        }
    }

    /// Identity comparison by id only.
    pub fn same_identity(&self, other: &CharacterRecord) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A minimal record with every optional field empty.
    pub fn record(id: u32, first: &str, last: &str) -> CharacterRecord {
        CharacterRecord {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            colour: String::new(),
            gender: String::new(),
            status: Status::default(),
            speciality: Vec::new(),
            nb_followers: None,
            debut_date: String::new(),
            height: None,
            affiliation: Affiliation::default(),
            country: Vec::new(),
            seisoness: Seisoness::default(),
            nickname: Vec::new(),
            portrait: String::new(),
            has_been_selected: false,
        }
    }

    pub fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }
}
