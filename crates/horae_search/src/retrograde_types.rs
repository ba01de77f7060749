//! Types for retrograde interval search.

use horae_core::Body;
use serde::{Deserialize, Serialize};

/// Bodies that can appear retrograde from the Earth.
pub const RETROGRADE_BODIES: [Body; 9] = [
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
    Body::Chiron,
];

/// Configuration for retrograde interval search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrogradeConfig {
    /// Sampling step in days. Interval boundaries are reported at this
    /// granularity; stations are not refined.
    pub step_days: f64,
}

impl Default for RetrogradeConfig {
    fn default() -> Self {
        Self { step_days: 1.0 }
    }
}

impl RetrogradeConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        Ok(())
    }
}

/// Span `[start_jd, end_jd)` during which the body's daily speed is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetrogradeInterval {
    pub body: Body,
    pub start_jd: f64,
    pub end_jd: f64,
    /// Still retrograde at the end of the scan; `end_jd` is the scan end.
    pub ongoing: bool,
    /// Already retrograde at the first sample; `start_jd` is the scan start.
    pub began_before_scan: bool,
}

impl RetrogradeInterval {
    pub fn duration_days(&self) -> f64 {
        self.end_jd - self.start_jd
    }

    /// Whether `jd` falls inside the half-open interval.
    pub fn contains(&self, jd: f64) -> bool {
        jd >= self.start_jd && jd < self.end_jd
    }
}

/// Direction of motion of one body at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetrogradeStatus {
    pub body: Body,
    pub retrograde: bool,
    pub speed_deg_per_day: f64,
}
