//! Terminal rendering of comparison rows and roster listings.

use colored::{ColoredString, Colorize};
use vguess_application::{LoadOutcome, RosterOrigin};
use vguess_core::character::CharacterRecord;
use vguess_core::compare::{ComparisonCell, ComparisonRow, HINT_DOWN_ICON, HINT_UP_ICON, MatchKind};

/// Text arrow pointing toward the target value.
fn arrow(cell: &ComparisonCell) -> &'static str {
    match cell.hint_icon() {
        Some(HINT_UP_ICON) => " ↑",
        Some(HINT_DOWN_ICON) => " ↓",
        _ => "",
    }
}

fn paint(cell: &ComparisonCell) -> ColoredString {
    let text = format!("{}{}", cell.display, arrow(cell));
    match cell.verdict.kind {
        MatchKind::Exact => text.black().on_green(),
        MatchKind::Partial => text.black().on_yellow(),
        MatchKind::NoMatch => text.white().on_red(),
    }
}

pub fn print_row(row: &ComparisonRow) {
    println!("{}", row.guess_name.bright_magenta().bold());
    for cell in &row.cells {
        println!("  {:<12} {}", cell.attribute.label(), paint(cell));
    }
}

pub fn print_candidates(records: &[CharacterRecord], limit: usize) {
    if records.is_empty() {
        println!("{}", "No matching character.".bright_black());
        return;
    }
    for record in records.iter().take(limit) {
        println!("  {}", record.display_name());
    }
    if records.len() > limit {
        println!(
            "{}",
            format!("  ... and {} more", records.len() - limit).bright_black()
        );
    }
}

pub fn print_load(outcome: &LoadOutcome) {
    match outcome.origin {
        RosterOrigin::Snapshot => println!(
            "{}",
            format!("Loaded {} characters from snapshot.", outcome.roster.len()).bright_black()
        ),
        RosterOrigin::Ingested => {
            println!(
                "{}",
                format!("Ingested {} characters.", outcome.roster.len()).bright_black()
            );
            if let Some(report) = outcome.report.as_ref().filter(|r| r.has_rejections()) {
                println!(
                    "{}",
                    format!("{} row(s) rejected:", report.rejected.len()).yellow()
                );
                for rejection in &report.rejected {
                    println!("  {}", rejection.to_string().yellow());
                }
            }
        }
        RosterOrigin::Unavailable => {
            let reason = outcome
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();
            println!(
                "{}",
                format!("Roster unavailable: {}", reason).red()
            );
        }
    }
}
