//! Core error types.

use thiserror::Error;

/// Errors from domain-level validation and parsing.
///
/// Both variants carry the offending raw text so malformed depth data
/// can be logged verbatim.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid size: {0}")]
    InvalidSize(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
