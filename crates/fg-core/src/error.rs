//! Error types for the data model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Star rating must be within 1..=5, got {0}")]
    InvalidStars(u8),

    #[error("Unknown character role: {0}")]
    UnknownRole(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
