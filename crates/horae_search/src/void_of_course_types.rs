//! Types for void-of-course Moon detection.

use horae_core::{Body, ZodiacSign};
use serde::{Deserialize, Serialize};

use crate::aspect_types::{AspectMatch, OrbTable};

/// Default scan step: 15 minutes.
pub const DEFAULT_VOC_STEP_DAYS: f64 = 1.0 / 96.0;

/// Bodies the Moon is checked against by default.
pub const DEFAULT_VOC_BODIES: [Body; 9] = [
    Body::Sun,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

/// Configuration for [`crate::void_of_course`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocConfig {
    pub step_days: f64,
    pub orbs: OrbTable,
    /// Bodies the Moon may aspect. The Moon itself is skipped if listed.
    pub bodies: Vec<Body>,
}

impl Default for VocConfig {
    fn default() -> Self {
        Self {
            step_days: DEFAULT_VOC_STEP_DAYS,
            orbs: OrbTable::default(),
            bodies: DEFAULT_VOC_BODIES.to_vec(),
        }
    }
}

impl VocConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if self.step_days > 1.0 {
            return Err("step_days must not exceed one day");
        }
        self.orbs.validate()
    }
}

/// Void-of-course state of the Moon from `jd_start` to its next ingress.
///
/// Invariant: `window_start_jd <= sign_change_jd` whenever the ingress was
/// found, and `window_start_jd == jd_start` when no aspect was seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoidOfCourseWindow {
    pub jd_start: f64,
    pub moon_sign: ZodiacSign,
    pub is_void_now: bool,
    /// Time of the last Moon aspect before ingress, or `jd_start` if none.
    pub window_start_jd: f64,
    /// Refined ingress time. `None` when the guard ended the scan first.
    pub sign_change_jd: Option<f64>,
    pub last_aspect: Option<AspectMatch>,
    pub guard_exceeded: bool,
}

impl VoidOfCourseWindow {
    /// Whether this window answers the question for `jd`: the Moon is still
    /// in the same sign and no earlier than the scan start.
    pub fn covers(&self, jd: f64) -> bool {
        self.sign_change_jd
            .is_some_and(|end| jd >= self.jd_start && jd < end)
    }

    /// Void state at `jd`, if this window covers it.
    ///
    /// Within the window the Moon is void from `window_start_jd` on; with no
    /// aspect at all that is the whole window.
    pub fn is_void_at(&self, jd: f64) -> Option<bool> {
        self.covers(jd).then(|| jd >= self.window_start_jd)
    }

    pub fn void_duration_days(&self) -> Option<f64> {
        self.sign_change_jd.map(|end| end - self.window_start_jd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(window_start_jd: f64, sign_change_jd: Option<f64>) -> VoidOfCourseWindow {
        VoidOfCourseWindow {
            jd_start: 10.0,
            moon_sign: ZodiacSign::Aries,
            is_void_now: false,
            window_start_jd,
            sign_change_jd,
            last_aspect: None,
            guard_exceeded: sign_change_jd.is_none(),
        }
    }

    #[test]
    fn defaults() {
        let c = VocConfig::default();
        assert_eq!(c.step_days, 1.0 / 96.0);
        assert!(!c.bodies.contains(&Body::Moon));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_coarse_step() {
        let c = VocConfig {
            step_days: 2.0,
            ..VocConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn void_after_last_aspect() {
        let w = window(11.0, Some(12.0));
        assert_eq!(w.is_void_at(10.5), Some(false));
        assert_eq!(w.is_void_at(11.0), Some(true));
        assert_eq!(w.is_void_at(12.0), None);
        assert_eq!(w.is_void_at(9.0), None);
        assert_eq!(w.void_duration_days(), Some(1.0));
    }

    #[test]
    fn guard_window_covers_nothing() {
        let w = window(10.0, None);
        assert_eq!(w.is_void_at(10.0), None);
        assert_eq!(w.void_duration_days(), None);
    }
}
