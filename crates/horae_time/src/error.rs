//! Error types for calendar conversions.

use thiserror::Error;

/// Errors from calendar parsing or civil date validation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Timestamp text did not match `YYYY-MM-DDThh:mm[:ss[.fff]][Z]`.
    #[error("parse error: {0}")]
    Parse(String),
    /// A calendar field is outside its valid range.
    #[error("invalid calendar field: {0}")]
    InvalidField(&'static str),
    /// Julian Day is NaN or infinite.
    #[error("julian day must be finite")]
    NonFiniteJd,
}
