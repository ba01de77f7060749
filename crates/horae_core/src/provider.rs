//! The ephemeris provider seam.

use std::path::PathBuf;

use horae_time::UtcTime;
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::eclipse::{EclipseHit, EclipseRequest};
use crate::error::EphemerisError;
use crate::position::AngularPosition;

/// Source of body positions, calendar conversion and eclipse lookups.
///
/// Implementations must be [`Send`] + [`Sync`] so one provider can be shared
/// across worker threads via `Arc`. Calls are pure from the caller's side:
/// the search layer neither caches nor retries.
///
/// ```rust,ignore
/// let provider = Arc::new(TabulatedEphemeris::load(&config)?);
/// let handle = std::thread::spawn({
///     let provider = Arc::clone(&provider);
///     move || provider.position(jd, Body::Mars)
/// });
/// ```
pub trait EphemerisProvider: Send + Sync {
    /// Geocentric ecliptic longitude and daily speed of `body` at `jd` (UT).
    fn position(&self, jd: f64, body: Body) -> Result<AngularPosition, EphemerisError>;

    /// Civil UTC timestamp to Julian Day.
    fn date_to_time(&self, utc: &UtcTime) -> Result<f64, EphemerisError> {
        utc.validate()?;
        Ok(utc.to_jd())
    }

    /// Julian Day to civil UTC timestamp.
    fn time_to_date(&self, jd: f64) -> Result<UtcTime, EphemerisError> {
        Ok(UtcTime::try_from_jd(jd)?)
    }

    /// Next global eclipse of the requested kind with maximum after `jd`.
    fn next_eclipse(&self, _jd: f64, _request: &EclipseRequest) -> Result<EclipseHit, EphemerisError> {
        Err(EphemerisError::Unsupported("eclipse search"))
    }

    fn longitude(&self, jd: f64, body: Body) -> Result<f64, EphemerisError> {
        Ok(self.position(jd, body)?.longitude_deg)
    }

    fn speed(&self, jd: f64, body: Body) -> Result<f64, EphemerisError> {
        Ok(self.position(jd, body)?.speed_deg_per_day)
    }
}

/// Construction-time settings for file-backed providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Path to a JSON ephemeris table.
    pub table_path: PathBuf,
}

impl ProviderConfig {
    pub fn new(table_path: impl Into<PathBuf>) -> Self {
        Self {
            table_path: table_path.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), EphemerisError> {
        if self.table_path.as_os_str().is_empty() {
            return Err(EphemerisError::Load("table_path must not be empty".into()));
        }
        Ok(())
    }
}
