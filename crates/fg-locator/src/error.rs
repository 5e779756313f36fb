//! Locator and store error types

use thiserror::Error;

use fg_catalog::CatalogError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Boundary store error: {0}")]
    Store(#[from] StoreError),
}

pub type LocatorResult<T> = Result<T, LocatorError>;
