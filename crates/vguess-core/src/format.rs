//! Display formatting for comparison cells.

use chrono::{DateTime, Datelike, NaiveDate};

use crate::character::CharacterRecord;
use crate::compare::Attribute;

/// Placeholder shown for unknown numeric values.
pub const UNKNOWN: &str = "?";

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%Y.%m.%d", "%d.%m.%Y",
];

/// Compact follower count: `950`, `12.5k`, `2M`.
pub fn format_followers(count: u64) -> String {
    fn compact(value: f64, suffix: &str) -> String {
        let text = format!("{:.1}", value);
        let text = text.strip_suffix(".0").unwrap_or(&text);
        format!("{}{}", text, suffix)
    }

    if count >= 1_000_000 {
        compact(count as f64 / 1_000_000.0, "M")
    } else if count >= 1_000 {
        compact(count as f64 / 1_000.0, "k")
    } else {
        count.to_string()
    }
}

/// Calendar year of a debut date, if the text is a recognizable date.
///
/// Accepts RFC 3339 timestamps, the usual day/month/year orderings, a
/// year-month pair and a bare four-digit year.
pub fn debut_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.year());
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date.year());
    }

    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse().ok();
    }

    NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
        .ok()
        .map(|date| date.year())
}

/// Debut column text: the year when parseable, otherwise the raw text.
pub fn format_debut(raw: &str) -> String {
    debut_year(raw)
        .map(|year| year.to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Display text of one attribute of a record.
pub fn display_value(attribute: Attribute, record: &CharacterRecord) -> String {
    match attribute {
        Attribute::Colour => record.colour.clone(),
        Attribute::Followers => record
            .nb_followers
            .map(format_followers)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        Attribute::Debut => format_debut(&record.debut_date),
        Attribute::Height => record
            .height
            .map(|h| h.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        Attribute::Gender => record.gender.clone(),
        Attribute::Status => record.status.as_str().to_lowercase(),
        Attribute::Speciality => record.speciality.join(", "),
        Attribute::Seisoness => record.seisoness.as_str().to_lowercase(),
        Attribute::Country => record.country.join(", "),
        Attribute::Affiliation => record.affiliation.as_str().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_followers() {
        assert_eq!(format_followers(0), "0");
        assert_eq!(format_followers(999), "999");
        assert_eq!(format_followers(1_000), "1k");
        assert_eq!(format_followers(12_500), "12.5k");
        assert_eq!(format_followers(1_500_000), "1.5M");
        assert_eq!(format_followers(2_000_000), "2M");
    }

    #[test]
    fn test_debut_year_formats() {
        assert_eq!(debut_year("2018-12-07"), Some(2018));
        assert_eq!(debut_year("07/12/2019"), Some(2019));
        assert_eq!(debut_year("25/12/2020"), Some(2020));
        assert_eq!(debut_year("2021-06"), Some(2021));
        assert_eq!(debut_year("2022"), Some(2022));
        assert_eq!(debut_year("2023-03-01T18:00:00+09:00"), Some(2023));
        assert_eq!(debut_year("sometime in spring"), None);
        assert_eq!(debut_year(""), None);
    }

    #[test]
    fn test_format_debut_falls_back_to_raw_text() {
        assert_eq!(format_debut("2018-12-07"), "2018");
        assert_eq!(format_debut(" unknown "), "unknown");
        assert_eq!(format_debut(""), "");
    }
}
