//! # fg-rng — Weighted Selector for Fable gacha
//!
//! Leaf crate of the pull pipeline. Turns static `{ percentage → outcome }`
//! tables into single weighted draws and provides the Fisher–Yates shuffle
//! used by pool post-processing.
//!
//! Randomness is never ambient: every draw and shuffle takes an explicit
//! [`RandomSource`], so the whole pipeline can be replayed by injecting a
//! seeded [`ChaChaSource`] or a [`FixedSequence`].
//!
//! ```text
//! RandomSource ──┬── WeightTable::draw  (rarity bracket, character role)
//!                ├── shuffle / shuffle_seeded
//!                └── uniform_page       (page inside the locator boundary)
//! ```

pub mod error;
pub mod selector;
pub mod source;

pub use error::*;
pub use selector::*;
pub use source::*;
