//! Selector error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Percentages of a weight table must add up to exactly 100
    #[error("Weight table sums to {sum}, expected {expected}")]
    WeightSum { sum: u64, expected: u32 },

    #[error("Weight table has no entries")]
    EmptyTable,
}

pub type SelectorResult<T> = Result<T, SelectorError>;
