//! Comparison result types.

use serde::{Deserialize, Serialize};

use crate::character::CharacterRecord;

/// Hint icon shown when the guessed value is below the target's.
pub const HINT_UP_ICON: &str = "/assets/hints/up.png";
/// Hint icon shown when the guessed value is above the target's.
pub const HINT_DOWN_ICON: &str = "/assets/hints/down.png";

/// Three-way match classification of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    #[serde(rename = "EXACT")]
    Exact,
    /// Only produced for multi-valued attributes.
    #[serde(rename = "PARTIAL")]
    Partial,
    #[serde(rename = "NONE")]
    NoMatch,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "EXACT",
            Self::Partial => "PARTIAL",
            Self::NoMatch => "NONE",
        }
    }
}

/// Where the guessed numeric value sits relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    GuessBelow,
    GuessAbove,
}

impl Direction {
    /// Asset path of the arrow pointing towards the target value.
    pub fn hint_icon(&self) -> &'static str {
        match self {
            Self::GuessBelow => HINT_UP_ICON,
            Self::GuessAbove => HINT_DOWN_ICON,
        }
    }
}

/// Result of comparing one attribute.
///
/// `direction` is only ever set for numeric attributes whose values differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub kind: MatchKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl Verdict {
    pub const EXACT: Verdict = Verdict::of(MatchKind::Exact);
    pub const PARTIAL: Verdict = Verdict::of(MatchKind::Partial);
    pub const NO_MATCH: Verdict = Verdict::of(MatchKind::NoMatch);

    pub const fn of(kind: MatchKind) -> Self {
        Self {
            kind,
            direction: None,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.kind == MatchKind::Exact
    }
}

/// A value handed to the comparison engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue<'a> {
    /// Case-sensitive text (also used for enum labels).
    Text(&'a str),
    /// Non-negative count or measure; `None` when unknown.
    Number(Option<u64>),
    /// Date string, compared at year granularity.
    Date(&'a str),
    /// Multi-valued attribute, compared as a set.
    Tags(&'a [String]),
}

/// The scored attributes, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Colour,
    Followers,
    Debut,
    Height,
    Gender,
    Status,
    Speciality,
    Seisoness,
    Country,
    Affiliation,
}

impl Attribute {
    pub const SCORED: [Attribute; 10] = [
        Attribute::Colour,
        Attribute::Followers,
        Attribute::Debut,
        Attribute::Height,
        Attribute::Gender,
        Attribute::Status,
        Attribute::Speciality,
        Attribute::Seisoness,
        Attribute::Country,
        Attribute::Affiliation,
    ];

    /// Column heading for this attribute.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Colour => "Colour",
            Self::Followers => "Followers",
            Self::Debut => "Debut",
            Self::Height => "Height",
            Self::Gender => "Gender",
            Self::Status => "Status",
            Self::Speciality => "Speciality",
            Self::Seisoness => "Seisoness",
            Self::Country => "Country",
            Self::Affiliation => "Affiliation",
        }
    }

    /// Extracts this attribute from a record.
    pub fn value_of<'a>(&self, record: &'a CharacterRecord) -> AttributeValue<'a> {
        match self {
            Self::Colour => AttributeValue::Text(&record.colour),
            Self::Followers => AttributeValue::Number(record.nb_followers),
            Self::Debut => AttributeValue::Date(&record.debut_date),
            Self::Height => AttributeValue::Number(record.height.map(u64::from)),
            Self::Gender => AttributeValue::Text(&record.gender),
            Self::Status => AttributeValue::Text(record.status.as_str()),
            Self::Speciality => AttributeValue::Tags(&record.speciality),
            Self::Seisoness => AttributeValue::Text(record.seisoness.as_str()),
            Self::Country => AttributeValue::Tags(&record.country),
            Self::Affiliation => AttributeValue::Text(record.affiliation.as_str()),
        }
    }
}

/// One comparison cell: a guessed record's attribute against the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonCell {
    pub attribute: Attribute,
    pub verdict: Verdict,
    /// The guessed record's value, formatted for display.
    pub display: String,
}

impl ComparisonCell {
    /// Arrow asset for numeric cells that missed the target value.
    pub fn hint_icon(&self) -> Option<&'static str> {
        self.verdict.direction.map(|d| d.hint_icon())
    }
}

/// All comparison cells for one guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub guess_id: u32,
    pub guess_name: String,
    pub portrait: String,
    pub cells: Vec<ComparisonCell>,
}

impl ComparisonRow {
    pub fn cell(&self, attribute: Attribute) -> Option<&ComparisonCell> {
        self.cells.iter().find(|c| c.attribute == attribute)
    }

    /// True when every scored attribute matched exactly.
    pub fn all_exact(&self) -> bool {
        self.cells.iter().all(|c| c.verdict.is_exact())
    }
}
