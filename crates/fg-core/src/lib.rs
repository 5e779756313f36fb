//! # fg-core — Data model for Fable gacha
//!
//! Shared types passed between the catalog client, the page locator and the
//! pool builder:
//!
//! - [`PopularityBracket`]: one slice of the catalog's popularity metric
//! - [`Role`]: a character's role in a media
//! - [`CandidateCharacter`] / [`Media`]: catalog records as the pool sees them
//! - [`PoolEntry`]: one rated pull candidate
//! - [`rate`]: the 1–5 star tier function
//! - [`tables`]: the production role and bracket weight tables

pub mod error;
pub mod rating;
pub mod tables;
pub mod types;

pub use error::*;
pub use rating::*;
pub use tables::*;
pub use types::*;
