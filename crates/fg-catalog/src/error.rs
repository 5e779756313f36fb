//! Catalog error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP 429; retried after the cool-down
    #[error("Rate limited by catalog")]
    RateLimited,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Response carried no data")]
    MissingData,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CatalogError::RateLimited)
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
