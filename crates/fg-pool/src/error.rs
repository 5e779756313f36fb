//! Pool error types

use thiserror::Error;

use fg_catalog::CatalogError;
use fg_core::{PopularityBracket, Role};
use fg_locator::StoreError;
use fg_rng::SelectorError;

#[derive(Error, Debug)]
pub enum PoolError {
    /// Every attempt produced a pool too small to draw from fairly
    #[error(
        "Pool for {role} in {bracket} too small after {attempts} attempts (last page {page}: {size} entries)"
    )]
    TooSmall {
        bracket: PopularityBracket,
        role: Role,
        page: u32,
        size: usize,
        attempts: u32,
    },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Boundary store error: {0}")]
    Store(#[from] StoreError),

    #[error("Weight table error: {0}")]
    Selector(#[from] SelectorError),
}

pub type PoolResult<T> = Result<T, PoolError>;
