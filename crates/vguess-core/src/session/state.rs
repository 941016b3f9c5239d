//! Session state and its transitions.
//!
//! [`SessionState`] is a plain value: every transition is a method that only
//! touches the state itself, so the async layer decides when transitions run
//! and how the deferred win check is scheduled.

use serde::{Deserialize, Serialize};

use crate::character::{CharacterRecord, Roster};

/// Externally visible phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No guess yet.
    Idle,
    /// At least one guess, not won.
    Guessing,
    /// The target was identified.
    Won,
}

/// Ticket for one deferred win check.
///
/// A check is only honoured while it is still current: any later guess or a
/// restart bumps the session generation and turns older tickets stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinCheck {
    pub guess_id: u32,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    target: Option<CharacterRecord>,
    search_text: String,
    /// Most recent first, unique by id.
    guesses: Vec<CharacterRecord>,
    has_won: bool,
    generation: u64,
}

impl SessionState {
    /// Starts a session around a freshly drawn target (if any).
    pub fn new(target: Option<CharacterRecord>) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn target(&self) -> Option<&CharacterRecord> {
        self.target.as_ref()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn guesses(&self) -> &[CharacterRecord] {
        &self.guesses
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    /// False when no target could be drawn; such a session never resolves.
    pub fn can_win(&self) -> bool {
        self.target.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.has_won {
            Phase::Won
        } else if self.guesses.is_empty() {
            Phase::Idle
        } else {
            Phase::Guessing
        }
    }

    /// Updates the search text. Never touches history or target.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Records a guess.
    ///
    /// The guess moves to the front of the history (replacing an earlier entry
    /// with the same id) and the search text is cleared. Returns the win check
    /// to schedule, or `None` when there is no target or the session is
    /// already won (guesses are ignored once won).
    pub fn submit_guess(&mut self, record: CharacterRecord) -> Option<WinCheck> {
        if self.has_won {
            return None;
        }

        self.guesses.retain(|g| !g.same_identity(&record));
        let guess_id = record.id;
        self.guesses.insert(0, record);
        self.search_text.clear();
        self.generation += 1;

        self.target.as_ref().map(|_| WinCheck {
            guess_id,
            generation: self.generation,
        })
    }

    /// True while no newer guess or restart has superseded `check`.
    pub fn is_current(&self, check: &WinCheck) -> bool {
        check.generation == self.generation
            && self.guesses.first().map(|g| g.id) == Some(check.guess_id)
    }

    /// Resolves a deferred win check. Returns true if the session is now won.
    pub fn confirm_win(&mut self, check: WinCheck) -> bool {
        if !self.is_current(&check) {
            return false;
        }
        let hit = match (self.target.as_ref(), self.guesses.first()) {
            (Some(target), Some(head)) => head.same_identity(target),
            _ => false,
        };
        if hit {
            self.has_won = true;
        }
        self.has_won
    }

    /// Resets the session around a new target.
    pub fn restart(&mut self, target: Option<CharacterRecord>) {
        self.target = target;
        self.search_text.clear();
        self.guesses.clear();
        self.has_won = false;
        self.generation += 1;
    }

    /// Roster entries not yet guessed whose full name contains the search
    /// text, ignoring case.
    pub fn candidates<'a>(&self, roster: &'a Roster) -> Vec<&'a CharacterRecord> {
        let needle = self.search_text.to_lowercase();
        roster
            .iter()
            .filter(|r| !self.was_guessed(r))
            .filter(|r| {
                format!("{} {}", r.first_name, r.last_name)
                    .to_lowercase()
                    .contains(&needle)
            })
            .collect()
    }

    /// Resolves typed text to a roster record.
    ///
    /// Tries, in order: an exact full-name match, an exact nickname match
    /// (both ignoring case), then the single candidate matching the text.
    pub fn resolve<'a>(&self, roster: &'a Roster, text: &str) -> Option<&'a CharacterRecord> {
        let wanted = text.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        if let Some(found) = roster
            .iter()
            .find(|r| r.display_name().to_lowercase() == wanted)
        {
            return Some(found);
        }

        if let Some(found) = roster.iter().find(|r| {
            r.nickname
                .iter()
                .any(|nick| nick.to_lowercase() == wanted)
        }) {
            return Some(found);
        }

        let mut narrowed = self.clone();
        narrowed.set_search_text(wanted);
        match narrowed.candidates(roster).as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    fn was_guessed(&self, record: &CharacterRecord) -> bool {
        self.guesses.iter().any(|g| g.same_identity(record))
    }
}
