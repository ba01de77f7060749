//! Lunar phase classification and lunation (New/Full Moon) search.

use horae_core::{Body, EphemerisProvider, normalize_360, shortest_signed_angle};
use tracing::{debug, instrument};

use crate::error::SearchError;
use crate::lunar_phase_types::{LunarOctant, LunarPhase, LunarPhaseInfo, LunationEvent, LunationKind};
use crate::scan::{Continuity, DEFAULT_BISECTION_ITERATIONS, ScanGrid, find_roots};

/// Default half-window for [`nearest_lunation`], in days. Wider than half a
/// synodic month, so at least one lunation of each kind is always inside.
pub const DEFAULT_LUNATION_HALF_WINDOW_DAYS: f64 = 15.0;

/// Horizon for [`next_lunation`], in days.
pub const NEXT_LUNATION_HORIZON_DAYS: f64 = 40.0;

/// Coarse step for lunation scans. The Sun-Moon elongation moves about 3°
/// per step.
const LUNATION_STEP_DAYS: f64 = 0.25;

/// Moon longitude minus Sun longitude, `[0, 360)`.
pub fn elongation(provider: &dyn EphemerisProvider, jd: f64) -> Result<f64, SearchError> {
    let sun = provider.longitude(jd, Body::Sun)?;
    let moon = provider.longitude(jd, Body::Moon)?;
    Ok(normalize_360(moon - sun))
}

/// Phase, octant and illumination at `jd`.
pub fn lunar_phase_at(
    provider: &dyn EphemerisProvider,
    jd: f64,
) -> Result<LunarPhaseInfo, SearchError> {
    let e = elongation(provider, jd)?;
    Ok(LunarPhaseInfo {
        jd,
        elongation_deg: e,
        waxing: e < 180.0,
        phase: LunarPhase::from_elongation(e),
        octant: LunarOctant::from_elongation(e),
        illumination_pct: 50.0 * (1.0 - e.to_radians().cos()),
    })
}

/// Phase at every sample of `grid`.
pub fn lunar_phase_calendar(
    provider: &dyn EphemerisProvider,
    grid: &ScanGrid,
) -> Result<Vec<LunarPhaseInfo>, SearchError> {
    grid.validate()?;
    grid.samples().map(|jd| lunar_phase_at(provider, jd)).collect()
}

fn lunations_in(
    provider: &dyn EphemerisProvider,
    grid: &ScanGrid,
    kinds: &[LunationKind],
) -> Result<Vec<LunationEvent>, SearchError> {
    let mut events = Vec::new();
    for &kind in kinds {
        let f = |t: f64| -> Result<f64, SearchError> {
            Ok(shortest_signed_angle(elongation(provider, t)?, kind.elongation()))
        };
        for jd in find_roots(&f, grid, Continuity::Angular, DEFAULT_BISECTION_ITERATIONS, None)? {
            events.push(LunationEvent {
                jd,
                kind,
                moon_longitude_deg: provider.longitude(jd, Body::Moon)?,
            });
        }
    }
    Ok(events)
}

/// The exact New or Full Moon nearest `jd` within `±half_window_days`.
#[instrument(skip_all, fields(jd = jd, half_window_days = half_window_days))]
pub fn nearest_lunation(
    provider: &dyn EphemerisProvider,
    jd: f64,
    half_window_days: f64,
) -> Result<LunationEvent, SearchError> {
    if !half_window_days.is_finite() || half_window_days <= 0.0 {
        return Err(SearchError::InvalidConfig("half_window_days must be positive"));
    }
    let grid = ScanGrid::new(jd - half_window_days, jd + half_window_days, LUNATION_STEP_DAYS);
    let events = lunations_in(provider, &grid, &[LunationKind::New, LunationKind::Full])?;
    debug!(candidates = events.len(), "lunation scan complete");

    events
        .into_iter()
        .min_by(|a, b| (a.jd - jd).abs().total_cmp(&(b.jd - jd).abs()))
        .ok_or(SearchError::LunationNotFound {
            window_days: 2.0 * half_window_days,
        })
}

/// First lunation of `kind` after `jd`, looking ahead
/// [`NEXT_LUNATION_HORIZON_DAYS`].
pub fn next_lunation(
    provider: &dyn EphemerisProvider,
    jd: f64,
    kind: LunationKind,
) -> Result<LunationEvent, SearchError> {
    let grid = ScanGrid::new(jd, jd + NEXT_LUNATION_HORIZON_DAYS, LUNATION_STEP_DAYS);
    lunations_in(provider, &grid, &[kind])?
        .into_iter()
        .find(|ev| ev.jd > jd)
        .ok_or(SearchError::LunationNotFound {
            window_days: NEXT_LUNATION_HORIZON_DAYS,
        })
}

#[cfg(test)]
mod tests {
    use horae_core::SyntheticEphemeris;

    use super::*;

    /// Elongation grows 12°/day from zero at t = 0.
    fn sky() -> SyntheticEphemeris {
        SyntheticEphemeris::new()
            .with_uniform(Body::Sun, 0.0, 0.0, 1.0)
            .with_uniform(Body::Moon, 0.0, 0.0, 13.0)
    }

    #[test]
    fn first_quarter() {
        let p = lunar_phase_at(&sky(), 7.5).unwrap();
        assert!((p.elongation_deg - 90.0).abs() < 1e-9);
        assert!(p.waxing);
        assert_eq!(p.phase, LunarPhase::FirstQuarter);
        assert_eq!(p.octant, LunarOctant::FirstQuarter);
        assert!((p.illumination_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn full_is_fully_lit() {
        let p = lunar_phase_at(&sky(), 15.0).unwrap();
        assert_eq!(p.phase, LunarPhase::Full);
        assert!(!p.waxing);
        assert!((p.illumination_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn calendar_has_one_entry_per_sample() {
        let cal = lunar_phase_calendar(&sky(), &ScanGrid::new(0.0, 29.0, 1.0)).unwrap();
        assert_eq!(cal.len(), 30);
        assert_eq!(cal[0].phase, LunarPhase::New);
    }

    #[test]
    fn nearest_picks_full_moon() {
        let ev = nearest_lunation(&sky(), 14.0, DEFAULT_LUNATION_HALF_WINDOW_DAYS).unwrap();
        assert_eq!(ev.kind, LunationKind::Full);
        assert!((ev.jd - 15.0).abs() < 1e-6);
    }

    #[test]
    fn nearest_picks_new_moon() {
        let ev = nearest_lunation(&sky(), 28.0, DEFAULT_LUNATION_HALF_WINDOW_DAYS).unwrap();
        assert_eq!(ev.kind, LunationKind::New);
        assert!((ev.jd - 30.0).abs() < 1e-6);
    }

    #[test]
    fn next_new_moon() {
        let ev = next_lunation(&sky(), 1.0, LunationKind::New).unwrap();
        assert!((ev.jd - 30.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_empty_window() {
        assert!(matches!(
            nearest_lunation(&sky(), 0.0, 0.0),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn no_lunation_in_short_window() {
        assert!(matches!(
            nearest_lunation(&sky(), 7.5, 1.0),
            Err(SearchError::LunationNotFound { .. })
        ));
    }
}
