//! Civil time handling for the horae engine.
//!
//! This crate provides:
//! - Julian Day <-> calendar conversions
//! - `UtcTime`, the civil timestamp type accepted at the engine boundary
//!
//! All searches in the workspace operate on Julian Days in Universal Time.

pub mod error;
pub mod julian;
pub mod utc_time;

pub use error::TimeError;
pub use julian::{J2000_JD, SECONDS_PER_DAY, calendar_to_jd, days_since_j2000, jd_to_calendar};
pub use utc_time::UtcTime;

/// Length of the mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_589;

/// Length of the Julian year in days.
pub const JULIAN_YEAR_DAYS: f64 = 365.25;
