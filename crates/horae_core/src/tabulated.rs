//! File-backed provider reading a JSON ephemeris export.
//!
//! File layout:
//!
//! ```json
//! {
//!   "start_jd": 2460310.5,
//!   "step_days": 0.5,
//!   "bodies": { "sun": [[280.1, 1.019], [280.6, 1.019], ...], ... },
//!   "eclipses": [
//!     { "kind": "solar", "flags": 5, "times": [2460409.26] },
//!     { "kind": "lunar", "flags": 64, "times": [2460390.8], "penumbral_magnitude": 0.96 }
//!   ]
//! }
//! ```
//!
//! Each body carries `[longitude_deg, speed_deg_per_day]` samples on a common
//! uniform grid. Longitude between samples is a cubic Hermite interpolant on
//! the unwrapped longitude using the tabulated speeds as tangents; speed is
//! interpolated linearly.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use serde::Deserialize;
use tracing::debug;

use crate::angle::normalize_360;
use crate::body::Body;
use crate::eclipse::{EclipseHit, EclipseKind, EclipseRequest};
use crate::error::EphemerisError;
use crate::position::AngularPosition;
use crate::provider::{EphemerisProvider, ProviderConfig};

#[derive(Debug, Deserialize)]
struct TableFile {
    start_jd: f64,
    step_days: f64,
    bodies: HashMap<String, Vec<[f64; 2]>>,
    #[serde(default)]
    eclipses: Vec<EclipseRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct EclipseRecord {
    kind: EclipseKind,
    #[serde(flatten)]
    hit: EclipseHit,
}

/// Uniformly sampled ephemeris loaded once at construction.
pub struct TabulatedEphemeris {
    start_jd: f64,
    step_days: f64,
    series: HashMap<Body, Vec<[f64; 2]>>,
    /// Sorted by time of maximum.
    eclipses: Vec<(EclipseKind, EclipseHit)>,
}

impl Debug for TabulatedEphemeris {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut bodies: Vec<Body> = self.series.keys().copied().collect();
        bodies.sort();
        f.debug_struct("TabulatedEphemeris")
            .field("start_jd", &self.start_jd)
            .field("step_days", &self.step_days)
            .field("bodies", &bodies)
            .field("eclipse_count", &self.eclipses.len())
            .finish()
    }
}

impl TabulatedEphemeris {
    /// Load the table named in `config`.
    pub fn load(config: &ProviderConfig) -> Result<Self, EphemerisError> {
        config.validate()?;
        let text = std::fs::read_to_string(&config.table_path).map_err(|e| {
            EphemerisError::Load(format!("{}: {e}", config.table_path.display()))
        })?;
        let table = Self::from_json(&text)?;
        debug!(
            path = %config.table_path.display(),
            bodies = table.series.len(),
            eclipses = table.eclipses.len(),
            "loaded ephemeris table"
        );
        Ok(table)
    }

    /// Parse a table from JSON text.
    pub fn from_json(text: &str) -> Result<Self, EphemerisError> {
        let file: TableFile =
            serde_json::from_str(text).map_err(|e| EphemerisError::Parse(e.to_string()))?;

        if !file.start_jd.is_finite() {
            return Err(EphemerisError::Parse("start_jd must be finite".into()));
        }
        if !file.step_days.is_finite() || file.step_days <= 0.0 {
            return Err(EphemerisError::Parse("step_days must be positive".into()));
        }

        let mut series = HashMap::with_capacity(file.bodies.len());
        for (name, samples) in file.bodies {
            let body: Body = name.parse()?;
            if samples.len() < 2 {
                return Err(EphemerisError::Parse(format!(
                    "{body}: at least two samples required"
                )));
            }
            if samples.iter().flatten().any(|v| !v.is_finite()) {
                return Err(EphemerisError::Parse(format!("{body}: non-finite sample")));
            }
            series.insert(body, samples);
        }

        let mut eclipses: Vec<(EclipseKind, EclipseHit)> = file
            .eclipses
            .into_iter()
            .filter(|r| r.hit.jd_max().is_some())
            .map(|r| (r.kind, r.hit))
            .collect();
        eclipses.sort_by(|a, b| {
            let ta = a.1.jd_max().unwrap_or(f64::NEG_INFINITY);
            let tb = b.1.jd_max().unwrap_or(f64::NEG_INFINITY);
            ta.total_cmp(&tb)
        });

        Ok(Self {
            start_jd: file.start_jd,
            step_days: file.step_days,
            series,
            eclipses,
        })
    }

    /// Bodies present in the table.
    pub fn bodies(&self) -> Vec<Body> {
        let mut bodies: Vec<Body> = self.series.keys().copied().collect();
        bodies.sort();
        bodies
    }

    /// Inclusive JD range covered by `body`.
    pub fn coverage(&self, body: Body) -> Option<(f64, f64)> {
        self.series.get(&body).map(|s| {
            let last = (s.len() - 1) as f64;
            (self.start_jd, self.start_jd + last * self.step_days)
        })
    }
}

/// Hermite interpolation between two `[lon, speed]` samples at fraction `u`.
fn interpolate(a: [f64; 2], b: [f64; 2], u: f64, step: f64) -> AngularPosition {
    let [lon0, v0] = a;
    let [lon1, v1] = b;

    // Unwrap lon1 to the revolution implied by the mean tabulated speed, so
    // fast movers (Moon on coarse grids) and stations both resolve correctly.
    let expected = 0.5 * (v0 + v1) * step;
    let raw = lon1 - lon0;
    let turns = ((expected - raw) / 360.0).round();
    let delta = raw + 360.0 * turns;

    let u2 = u * u;
    let u3 = u2 * u;
    let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
    let h10 = u3 - 2.0 * u2 + u;
    let h01 = -2.0 * u3 + 3.0 * u2;
    let h11 = u3 - u2;

    let offset = h10 * v0 * step + h01 * delta + h11 * v1 * step;
    let lon = lon0 * (h00 + h01) + offset;
    let speed = v0 + (v1 - v0) * u;
    AngularPosition::new(normalize_360(lon), speed)
}

impl EphemerisProvider for TabulatedEphemeris {
    fn position(&self, jd: f64, body: Body) -> Result<AngularPosition, EphemerisError> {
        let samples = self
            .series
            .get(&body)
            .ok_or(EphemerisError::UnsupportedBody(body))?;
        if !jd.is_finite() {
            return Err(EphemerisError::OutOfRange { jd });
        }

        let x = (jd - self.start_jd) / self.step_days;
        let last = (samples.len() - 1) as f64;
        if x < 0.0 || x > last {
            return Err(EphemerisError::OutOfRange { jd });
        }

        let i = (x.floor() as usize).min(samples.len() - 2);
        let u = x - i as f64;
        Ok(interpolate(samples[i], samples[i + 1], u, self.step_days))
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

    const TABLE: &str = r#"{
        "start_jd": 100.0,
        "step_days": 1.0,
        "bodies": {
            "sun":  [[358.0, 1.0], [359.0, 1.0], [0.0, 1.0], [1.0, 1.0]],
            "mars": [[10.0, 0.5], [10.2, -0.1], [10.0, -0.3], [9.7, -0.3]]
        },
        "eclipses": [
            { "kind": "lunar", "flags": 64, "times": [150.0], "penumbral_magnitude": 0.9 },
            { "kind": "solar", "flags": 5, "times": [120.0, 119.9, 120.1] },
            { "kind": "solar", "flags": 16, "times": [102.5] }
        ]
    }"#;

    fn table() -> TabulatedEphemeris {
        TabulatedEphemeris::from_json(TABLE).unwrap()
    }

    #[test]
    fn exact_on_samples() {
        let t = table();
        let p = t.position(101.0, Body::Sun).unwrap();
        assert!((p.longitude_deg - 359.0).abs() < 1e-12);
        assert!((p.speed_deg_per_day - 1.0).abs() < 1e-12);
    }

    #[test]
    fn interpolates_across_wrap() {
        let t = table();
        let p = t.position(101.5, Body::Sun).unwrap();
        assert!((p.longitude_deg - 359.5).abs() < 1e-9, "got {}", p.longitude_deg);
        let q = t.position(102.25, Body::Sun).unwrap();
        assert!((q.longitude_deg - 0.25).abs() < 1e-9, "got {}", q.longitude_deg);
    }

    #[test]
    fn speed_is_linear() {
        let t = table();
        let p = t.position(101.5, Body::Mars).unwrap();
        assert!((p.speed_deg_per_day - (-0.2)).abs() < 1e-12);
    }

    #[test]
    fn last_sample_is_in_range() {
        let t = table();
        let p = t.position(103.0, Body::Sun).unwrap();
        assert!((p.longitude_deg - 1.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_range() {
        let t = table();
        assert!(matches!(
            t.position(99.0, Body::Sun),
            Err(EphemerisError::OutOfRange { .. })
        ));
        assert!(matches!(
            t.position(103.5, Body::Sun),
            Err(EphemerisError::OutOfRange { .. })
        ));
    }

    #[test]
    fn missing_body() {
        assert!(matches!(
            table().position(101.0, Body::Moon),
            Err(EphemerisError::UnsupportedBody(Body::Moon))
        ));
    }

    #[test]
    fn coverage_and_bodies() {
        let t = table();
        assert_eq!(t.coverage(Body::Sun), Some((100.0, 103.0)));
        assert_eq!(t.coverage(Body::Moon), None);
        assert_eq!(t.bodies(), vec![Body::Sun, Body::Mars]);
    }

    #[test]
    fn eclipses_sorted_and_filtered() {
        let t = table();
        let solar = EclipseRequest::any(EclipseKind::Solar);
        assert_eq!(t.next_eclipse(100.0, &solar).unwrap().jd_max(), Some(102.5));
        assert_eq!(t.next_eclipse(102.5, &solar).unwrap().jd_max(), Some(120.0));
        assert!(matches!(t.next_eclipse(120.0, &solar), Err(EphemerisError::NoEclipse)));

        let total_only = EclipseRequest {
            kind: EclipseKind::Solar,
            type_mask: flags::TOTAL,
        };
        assert_eq!(t.next_eclipse(100.0, &total_only).unwrap().flags, 5);

        let lunar = t.next_eclipse(100.0, &EclipseRequest::any(EclipseKind::Lunar)).unwrap();
        assert_eq!(lunar.penumbral_magnitude, Some(0.9));
        assert_eq!(lunar.umbral_magnitude, None);
    }

    #[test]
    fn rejects_bad_step() {
        let bad = r#"{"start_jd": 0.0, "step_days": 0.0, "bodies": {}}"#;
        assert!(matches!(
            TabulatedEphemeris::from_json(bad),
            Err(EphemerisError::Parse(_))
        ));
    }

    #[test]
    fn rejects_unknown_body() {
        let bad = r#"{"start_jd": 0.0, "step_days": 1.0, "bodies": {"vulcan": [[0,0],[1,0]]}}"#;
        assert!(matches!(
            TabulatedEphemeris::from_json(bad),
            Err(EphemerisError::Parse(_))
        ));
    }

    #[test]
    fn rejects_short_series() {
        let bad = r#"{"start_jd": 0.0, "step_days": 1.0, "bodies": {"sun": [[0,1]]}}"#;
        assert!(TabulatedEphemeris::from_json(bad).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let config = ProviderConfig::new("/nonexistent/horae/table.json");
        assert!(matches!(
            TabulatedEphemeris::load(&config),
            Err(EphemerisError::Load(_))
        ));
    }
}
