//! # fg-locator — Adaptive Page Locator
//!
//! The catalog has no usable "how many pages" field for a filtered media
//! list, so the highest page still holding media is found by walking.
//!
//! ## Architecture
//!
//! ```text
//! BoundaryStore (file / memory)
//!     │  load once                      save only when changed
//!     v                                          ^
//! BoundaryCache ──► boundary(bracket)            │
//!     │              (pool builder)              │
//!     v                                          │
//! PageLocator::run ── per bracket: start at stored page,
//!                     walk forward while hasNextPage,
//!                     back off while empty, stop on the last
//!                     non-empty page
//! ```
//!
//! Starting from the previous run's boundary and assuming the catalog only
//! grows, most runs settle in a handful of probes.

pub mod error;
pub mod locator;
pub mod store;

pub use error::*;
pub use locator::*;
pub use store::*;
