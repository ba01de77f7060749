//! Provider-boundary error type.

use horae_time::TimeError;
use thiserror::Error;

use crate::body::Body;

/// Everything that can go wrong when asking a provider for data.
///
/// Providers translate their own failure modes into one of these variants;
/// search code never inspects provider internals and never retries.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EphemerisError {
    #[error("unsupported body: {0}")]
    UnsupportedBody(Body),
    #[error("julian day out of ephemeris range: {jd}")]
    OutOfRange { jd: f64 },
    #[error("invalid time: {0}")]
    InvalidTime(String),
    #[error("ephemeris load error: {0}")]
    Load(String),
    #[error("ephemeris parse error: {0}")]
    Parse(String),
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("no eclipse found after the requested time")]
    NoEclipse,
}

impl From<TimeError> for EphemerisError {
    fn from(e: TimeError) -> Self {
        Self::InvalidTime(e.to_string())
    }
}
