//! Types for return search.

use horae_core::Body;
use serde::{Deserialize, Serialize};

use crate::scan::DEFAULT_BISECTION_ITERATIONS;

/// Accepted range for an explicit `search_years` half-window.
pub const SEARCH_YEARS_RANGE: std::ops::RangeInclusive<f64> = 0.5..=60.0;

/// Configuration for [`crate::find_return`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnConfig {
    /// Total window centred on the guess, in days (±half on each side).
    pub window_days: f64,
    /// Coarse scan step in days.
    pub step_days: f64,
    /// Bisection halvings applied to the chosen bracket.
    pub bisection_iterations: u32,
}

impl Default for ReturnConfig {
    fn default() -> Self {
        Self {
            window_days: 400.0,
            step_days: 0.25,
            bisection_iterations: DEFAULT_BISECTION_ITERATIONS,
        }
    }
}

impl ReturnConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.window_days.is_finite() || self.window_days <= 0.0 {
            return Err("window_days must be positive");
        }
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if self.step_days > self.window_days {
            return Err("step_days must not exceed window_days");
        }
        if self.bisection_iterations == 0 {
            return Err("bisection_iterations must be > 0");
        }
        Ok(())
    }
}

/// Instant a body's longitude equals the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnEvent {
    /// Julian Day (UT) of the return.
    pub jd: f64,
    pub body: Body,
    /// Target longitude, normalized to `[0, 360)`.
    pub target_longitude_deg: f64,
    /// Provider longitude at `jd`.
    pub longitude_deg: f64,
    /// Signed miss `longitude - target` in degrees.
    pub residual_deg: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ReturnConfig::default();
        assert_eq!(c.window_days, 400.0);
        assert_eq!(c.step_days, 0.25);
        assert_eq!(c.bisection_iterations, 40);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_zero_step() {
        let c = ReturnConfig {
            step_days: 0.0,
            ..ReturnConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_negative_window() {
        let c = ReturnConfig {
            window_days: -1.0,
            ..ReturnConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_iterations() {
        let c = ReturnConfig {
            bisection_iterations: 0,
            ..ReturnConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let c: ReturnConfig = serde_json::from_str(r#"{"window_days": 800}"#).unwrap();
        assert_eq!(c.window_days, 800.0);
        assert_eq!(c.step_days, 0.25);
    }
}
