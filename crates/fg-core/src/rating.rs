//! Rarity tiers
//!
//! | popularity        | Background | Supporting | Main |
//! |-------------------|------------|------------|------|
//! | < 50,000          | 1          | 1          | 1    |
//! | 50,000..200,000   | 1          | 2          | 3    |
//! | 200,000..400,000  | 1          | 3          | 4    |
//! | ≥ 400,000         | 1          | 4          | 5    |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Role;

/// Lower popularity bound of the two-star tier
pub const TWO_STAR_POPULARITY: u32 = 50_000;
/// Lower popularity bound of the three-star tier
pub const THREE_STAR_POPULARITY: u32 = 200_000;
/// Lower popularity bound of the four-star tier
pub const FOUR_STAR_POPULARITY: u32 = 400_000;

pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

/// 1–5 star rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    pub fn new(stars: u8) -> Result<Self, CoreError> {
        if (MIN_STARS..=MAX_STARS).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(CoreError::InvalidStars(stars))
        }
    }

    pub fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for StarRating {
    type Error = CoreError;

    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        Self::new(stars)
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..MAX_STARS {
            f.write_str(if i < self.0 { "★" } else { "☆" })?;
        }
        Ok(())
    }
}

/// Star rating for a character's canonical `(role, popularity)`.
///
/// Total over every input: background characters are always one star, and
/// main characters get one star above supporting ones from the two-star tier up.
pub fn rate(role: Role, popularity: u32) -> StarRating {
    let base = match popularity {
        p if p < TWO_STAR_POPULARITY => return StarRating(1),
        p if p < THREE_STAR_POPULARITY => 2,
        p if p < FOUR_STAR_POPULARITY => 3,
        _ => 4,
    };

    match role {
        Role::Background => StarRating(1),
        Role::Supporting => StarRating(base),
        Role::Main => StarRating(base + 1),
    }
}
