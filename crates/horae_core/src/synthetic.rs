//! Analytic provider with closed-form motions.
//!
//! Each body moves at a base rate, optionally overridden on half-open
//! `[start, end)` segments. Longitude is the exact integral of that piecewise
//! constant speed, so searches against it have known answers. Used by tests,
//! benches and the CLI demo mode.

use std::collections::HashMap;

use crate::angle::normalize_360;
use crate::body::Body;
use crate::eclipse::{EclipseHit, EclipseKind, EclipseRequest};
use crate::error::EphemerisError;
use crate::position::AngularPosition;
use crate::provider::EphemerisProvider;

/// Speed override on `[start_jd, end_jd)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSegment {
    pub start_jd: f64,
    pub end_jd: f64,
    pub speed_deg_per_day: f64,
}

/// Piecewise-constant motion of one body.
///
/// Segments are expected not to overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyMotion {
    pub epoch_jd: f64,
    pub longitude_at_epoch: f64,
    pub base_speed: f64,
    pub segments: Vec<SpeedSegment>,
}

impl BodyMotion {
    pub fn uniform(epoch_jd: f64, longitude_at_epoch: f64, speed_deg_per_day: f64) -> Self {
        Self {
            epoch_jd,
            longitude_at_epoch,
            base_speed: speed_deg_per_day,
            segments: Vec::new(),
        }
    }

    /// Add a speed override on `[start_jd, end_jd)`.
    pub fn with_segment(mut self, start_jd: f64, end_jd: f64, speed_deg_per_day: f64) -> Self {
        self.segments.push(SpeedSegment {
            start_jd,
            end_jd,
            speed_deg_per_day,
        });
        self
    }

    pub fn speed_at(&self, jd: f64) -> f64 {
        self.segments
            .iter()
            .find(|s| jd >= s.start_jd && jd < s.end_jd)
            .map_or(self.base_speed, |s| s.speed_deg_per_day)
    }

    /// Unwrapped longitude: exact integral of the speed from the epoch.
    pub fn unwrapped_longitude_at(&self, jd: f64) -> f64 {
        let mut lon = self.longitude_at_epoch + self.base_speed * (jd - self.epoch_jd);
        let (lo, hi, sign) = if jd >= self.epoch_jd {
            (self.epoch_jd, jd, 1.0)
        } else {
            (jd, self.epoch_jd, -1.0)
        };
        for seg in &self.segments {
            let overlap = (hi.min(seg.end_jd) - lo.max(seg.start_jd)).max(0.0);
            lon += sign * overlap * (seg.speed_deg_per_day - self.base_speed);
        }
        lon
    }
}

/// Provider built from [`BodyMotion`]s and a fixed eclipse list.
#[derive(Debug, Clone, Default)]
pub struct SyntheticEphemeris {
    motions: HashMap<Body, BodyMotion>,
    eclipses: Vec<(EclipseKind, EclipseHit)>,
    valid_range: Option<(f64, f64)>,
}

impl SyntheticEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform motion at `speed` through `longitude` at `epoch_jd`.
    pub fn with_uniform(self, body: Body, epoch_jd: f64, longitude: f64, speed: f64) -> Self {
        self.with_motion(body, BodyMotion::uniform(epoch_jd, longitude, speed))
    }

    pub fn with_motion(mut self, body: Body, motion: BodyMotion) -> Self {
        self.motions.insert(body, motion);
        self
    }

    /// Add an eclipse; `next_eclipse` scans them in time order.
    pub fn with_eclipse(mut self, kind: EclipseKind, hit: EclipseHit) -> Self {
        self.eclipses.push((kind, hit));
        self.eclipses.sort_by(|a, b| {
            let ta = a.1.jd_max().unwrap_or(f64::NEG_INFINITY);
            let tb = b.1.jd_max().unwrap_or(f64::NEG_INFINITY);
            ta.total_cmp(&tb)
        });
        self
    }

    /// Restrict positions to `[jd_min, jd_max]`; outside it `position`
    /// returns [`EphemerisError::OutOfRange`].
    pub fn with_valid_range(mut self, jd_min: f64, jd_max: f64) -> Self {
        self.valid_range = Some((jd_min, jd_max));
        self
    }

    pub fn motion(&self, body: Body) -> Option<&BodyMotion> {
        self.motions.get(&body)
    }
}

impl EphemerisProvider for SyntheticEphemeris {
    fn position(&self, jd: f64, body: Body) -> Result<AngularPosition, EphemerisError> {
        if !jd.is_finite() {
            return Err(EphemerisError::OutOfRange { jd });
        }
        if self.valid_range.is_some_and(|(lo, hi)| jd < lo || jd > hi) {
            return Err(EphemerisError::OutOfRange { jd });
        }
        let motion = self
            .motions
            .get(&body)
            .ok_or(EphemerisError::UnsupportedBody(body))?;
        Ok(AngularPosition::new(
            normalize_360(motion.unwrapped_longitude_at(jd)),
            motion.speed_at(jd),
        ))
    }

    fn next_eclipse(&self, jd: f64, request: &EclipseRequest) -> Result<EclipseHit, EphemerisError> {
        self.eclipses
            .iter()
            .find(|(kind, hit)| {
                *kind == request.kind
                    && request.matches(hit.flags)
                    && hit.jd_max().is_some_and(|t| t > jd)
            })
            .map(|(_, hit)| hit.clone())
            .ok_or(EphemerisError::NoEclipse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eclipse::flags;

    #[test]
    fn uniform_motion_wraps() {
        let eph = SyntheticEphemeris::new().with_uniform(Body::Moon, 0.0, 350.0, 13.0);
        let p = eph.position(1.0, Body::Moon).unwrap();
        assert!((p.longitude_deg - 3.0).abs() < 1e-9);
        assert!((p.speed_deg_per_day - 13.0).abs() < 1e-12);
    }

    #[test]
    fn backward_from_epoch() {
        let eph = SyntheticEphemeris::new().with_uniform(Body::Sun, 10.0, 5.0, 1.0);
        let p = eph.position(0.0, Body::Sun).unwrap();
        assert!((p.longitude_deg - 355.0).abs() < 1e-9);
    }

    #[test]
    fn segment_integrates_exactly() {
        let motion = BodyMotion::uniform(0.0, 0.0, 0.5).with_segment(100.0, 130.0, -0.5);
        assert!((motion.unwrapped_longitude_at(100.0) - 50.0).abs() < 1e-12);
        assert!((motion.unwrapped_longitude_at(130.0) - 35.0).abs() < 1e-12);
        assert!((motion.unwrapped_longitude_at(140.0) - 40.0).abs() < 1e-12);
        assert_eq!(motion.speed_at(99.9), 0.5);
        assert_eq!(motion.speed_at(100.0), -0.5);
        assert_eq!(motion.speed_at(130.0), 0.5);
    }

    #[test]
    fn segment_before_epoch() {
        let motion = BodyMotion::uniform(200.0, 100.0, 1.0).with_segment(150.0, 160.0, -1.0);
        // Walking back: 60 at jd 160, 70 at jd 150, 60 at jd 140.
        assert!((motion.unwrapped_longitude_at(140.0) - 60.0).abs() < 1e-12);
    }

    #[test]
    fn unsupported_and_out_of_range() {
        let eph = SyntheticEphemeris::new()
            .with_uniform(Body::Sun, 0.0, 0.0, 1.0)
            .with_valid_range(0.0, 10.0);
        assert!(matches!(
            eph.position(5.0, Body::Mars),
            Err(EphemerisError::UnsupportedBody(Body::Mars))
        ));
        assert!(matches!(
            eph.position(11.0, Body::Sun),
            Err(EphemerisError::OutOfRange { .. })
        ));
        assert!(matches!(
            eph.position(-0.5, Body::Sun),
            Err(EphemerisError::OutOfRange { .. })
        ));
        assert!(eph.position(10.0, Body::Sun).is_ok());
        assert!(eph.position(0.0, Body::Sun).is_ok());
    }

    #[test]
    fn eclipses_in_time_order() {
        let hit = |t: f64, f: u32| EclipseHit {
            flags: f,
            times: vec![t],
            umbral_magnitude: None,
            penumbral_magnitude: None,
        };
        let eph = SyntheticEphemeris::new()
            .with_eclipse(EclipseKind::Solar, hit(300.0, flags::PARTIAL))
            .with_eclipse(EclipseKind::Solar, hit(100.0, flags::TOTAL | flags::CENTRAL));
        let req = EclipseRequest::any(EclipseKind::Solar);
        assert_eq!(eph.next_eclipse(0.0, &req).unwrap().jd_max(), Some(100.0));
        assert_eq!(eph.next_eclipse(100.0, &req).unwrap().jd_max(), Some(300.0));
        assert!(matches!(
            eph.next_eclipse(0.0, &EclipseRequest::any(EclipseKind::Lunar)),
            Err(EphemerisError::NoEclipse)
        ));
    }
}
