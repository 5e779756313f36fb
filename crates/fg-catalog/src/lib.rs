//! # fg-catalog — Catalog query boundary
//!
//! Everything the locator and the pool builder know about the external
//! catalog goes through the [`Catalog`] trait:
//!
//! - [`Catalog::media_page`]: one page of media inside a popularity bracket
//! - [`Catalog::media_characters`]: the first page of characters of one media
//!
//! [`AniListClient`] implements it over GraphQL (HTTPS POST of a query
//! document plus a `variables` object). A 429 surfaces as
//! [`CatalogError::RateLimited`]; callers wrap requests in
//! [`retry_rate_limited`] to sleep through the cool-down and retry.
//!
//! Media filters and ordering are described once by [`QuerySpec`] so the
//! locator walks exactly the page sequence the pool samples from.

pub mod client;
pub mod cooldown;
pub mod error;
pub mod query;
pub mod wire;

pub use client::*;
pub use cooldown::*;
pub use error::*;
pub use query::*;
