//! Target selection.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::character::CharacterRecord;

/// Draws the session target uniformly among records not yet used as a target.
///
/// Returns `None` when every record has been used (or the roster is empty).
/// The `has_been_selected` flag is only read here, never written.
pub fn select_target<'a, R>(roster: &'a [CharacterRecord], rng: &mut R) -> Option<&'a CharacterRecord>
where
    R: Rng + ?Sized,
{
    let candidates: Vec<&CharacterRecord> = roster.iter().filter(|r| !r.has_been_selected).collect();
    candidates.choose(rng).copied()
}
