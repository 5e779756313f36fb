//! Weighted Selector: percentage tables, draws and shuffles
//!
//! [`shuffle`] and [`shuffle_seeded`] are library helpers for callers that
//! need a random or a reproducible ordering (stable listings, test
//! fixtures). Draws and pool building do not go through them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{SelectorError, SelectorResult};
use crate::source::{ChaChaSource, RandomSource};

/// Percentages in a table must add up to this
pub const TOTAL_WEIGHT: u32 = 100;

/// One row of a weight table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weighted<T> {
    /// Percentage chance of this outcome
    pub weight: u32,
    /// The outcome itself
    pub value: T,
}

impl<T> Weighted<T> {
    pub fn new(weight: u32, value: T) -> Self {
        Self { weight, value }
    }
}

/// Result of a single draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw<'a, T> {
    pub value: &'a T,
    pub weight: u32,
}

/// A validated `{ percentage → outcome }` table.
///
/// Construction fails unless the weights sum to exactly [`TOTAL_WEIGHT`];
/// the same check runs when a table is deserialized from config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTable<T> {
    entries: Vec<Weighted<T>>,
}

impl<T> WeightTable<T> {
    /// Build a table from weighted entries
    pub fn new(entries: Vec<Weighted<T>>) -> SelectorResult<Self> {
        if entries.is_empty() {
            return Err(SelectorError::EmptyTable);
        }

        // Config weights can add up past u32::MAX
        let sum: u64 = entries.iter().map(|e| u64::from(e.weight)).sum();
        if sum != u64::from(TOTAL_WEIGHT) {
            return Err(SelectorError::WeightSum {
                sum,
                expected: TOTAL_WEIGHT,
            });
        }

        Ok(Self { entries })
    }

    /// Build a table from `(percentage, outcome)` pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, T)>) -> SelectorResult<Self> {
        Self::new(
            pairs
                .into_iter()
                .map(|(weight, value)| Weighted::new(weight, value))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[Weighted<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outcomes in table order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    /// Draw one outcome with probability `weight / 100`.
    ///
    /// Equivalent to expanding the table into 100 slots, shuffling and
    /// taking the first slot, without materializing the slots.
    pub fn draw<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Draw<'_, T> {
        let mut roll = rng.below(TOTAL_WEIGHT as usize) as u32;

        for entry in &self.entries {
            if roll < entry.weight {
                return Draw {
                    value: &entry.value,
                    weight: entry.weight,
                };
            }
            roll -= entry.weight;
        }

        // Unreachable while the weights sum to 100
        let last = &self.entries[self.entries.len() - 1];
        Draw {
            value: &last.value,
            weight: last.weight,
        }
    }
}

impl<T: Serialize> Serialize for WeightTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for WeightTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Weighted<T>>::deserialize(deserializer)?;
        Self::new(entries).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHUFFLE
// ═══════════════════════════════════════════════════════════════════════════════

/// In-place Fisher–Yates shuffle
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

/// Reproducible shuffle keyed by a string seed
pub fn shuffle_seeded<T>(items: &mut [T], seed: &str) {
    shuffle(items, &mut ChaChaSource::from_label(seed));
}

/// Uniform page in `1..=last_page` (a zero bound is treated as 1)
pub fn uniform_page<R: RandomSource + ?Sized>(rng: &mut R, last_page: u32) -> u32 {
    let last_page = last_page.max(1);
    rng.below(last_page as usize) as u32 + 1
}
