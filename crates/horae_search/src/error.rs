//! Error types for event searches.

use horae_core::{Body, EphemerisError};
use horae_time::TimeError;
use thiserror::Error;

/// Errors from search and scoring operations.
///
/// Every variant is terminal: searches never retry or fall back. Guard-cap
/// hits are reported through [`crate::Bounded`] instead, and only become
/// [`SearchError::GuardExceeded`] when a caller asks for a strict result.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// The provider could not resolve a position, date or eclipse.
    #[error("ephemeris error: {0}")]
    Ephemeris(#[from] EphemerisError),
    /// Civil time conversion failed at the boundary.
    #[error("time error: {0}")]
    Time(#[from] TimeError),
    /// No sign change inside the return search window.
    #[error("no {body} return to {target_deg:.4}° within a {window_days:.1}-day window")]
    ReturnNotFound {
        body: Body,
        target_deg: f64,
        window_days: f64,
    },
    /// No New or Full Moon inside the lunation search window.
    #[error("no lunation within {window_days:.1} days")]
    LunationNotFound { window_days: f64 },
    /// End before start, non-finite bound, or non-positive step.
    #[error("invalid range: {0}")]
    InvalidRange(&'static str),
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// A guard iteration cap ended the search early.
    #[error("search guard exceeded after {iterations} iterations")]
    GuardExceeded { iterations: u32 },
}
