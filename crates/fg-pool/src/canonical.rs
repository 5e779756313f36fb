//! Canonical appearance resolution
//!
//! A character shows up in many media. Rarity is scored against one of
//! them: the "canonical" appearance.
//!
//! Appearances arrive sorted by descending media popularity. The scan keeps
//! the first appearance and lets a later one take over only when it ranks
//! higher on (role, popularity):
//!
//! - Background never beats Main or Supporting, whatever the popularity
//! - Main beats Supporting
//! - within the same role class, a strictly more popular media wins
//!
//! Ties keep the earlier appearance.

use std::cmp::Ordering;

use fg_core::{Appearance, CandidateCharacter, Role};

fn role_priority(role: Role) -> u8 {
    match role {
        Role::Main => 2,
        Role::Supporting => 1,
        Role::Background => 0,
    }
}

fn outranks(candidate: &Appearance, current: &Appearance) -> bool {
    match role_priority(candidate.role).cmp(&role_priority(current.role)) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => candidate.media.popularity > current.media.popularity,
    }
}

/// The appearance a character is rated by, or `None` without appearances
pub fn canonical_appearance(character: &CandidateCharacter) -> Option<&Appearance> {
    let mut appearances = character.appearances.iter();
    let mut selected = appearances.next()?;

    for appearance in appearances {
        if outranks(appearance, selected) {
            selected = appearance;
        }
    }

    Some(selected)
}
