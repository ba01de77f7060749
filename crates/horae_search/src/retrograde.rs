//! Retrograde interval finder.
//!
//! Samples a body's daily speed on a fixed grid and groups consecutive
//! negative samples into intervals with a two-state machine
//! (direct / retrograde). Boundaries land on grid samples; station times are
//! not bisected.

use horae_core::{Body, EphemerisProvider};
use tracing::{debug, instrument};

use crate::error::SearchError;
use crate::retrograde_types::{RetrogradeConfig, RetrogradeInterval, RetrogradeStatus};
use crate::scan::ScanGrid;

/// Retrograde intervals of `body` over `[jd_start, jd_end]`.
///
/// An interval already open at the first sample starts at `jd_start` with
/// `began_before_scan`; one still open at the last sample ends at `jd_end`
/// with `ongoing`.
#[instrument(skip_all, fields(body = %body, jd_start = jd_start, jd_end = jd_end))]
pub fn find_retrograde_intervals(
    provider: &dyn EphemerisProvider,
    body: Body,
    jd_start: f64,
    jd_end: f64,
    config: &RetrogradeConfig,
) -> Result<Vec<RetrogradeInterval>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    let grid = ScanGrid::new(jd_start, jd_end, config.step_days);
    grid.validate()?;

    let mut intervals = Vec::new();
    // (start_jd, began_before_scan) of the open interval.
    let mut open: Option<(f64, bool)> = None;

    for (i, t) in grid.samples().enumerate() {
        let retrograde = provider.speed(t, body)? < 0.0;
        match (open, retrograde) {
            (None, true) => open = Some((t, i == 0)),
            (Some((start_jd, began_before_scan)), false) => {
                intervals.push(RetrogradeInterval {
                    body,
                    start_jd,
                    end_jd: t,
                    ongoing: false,
                    began_before_scan,
                });
                open = None;
            }
            _ => {}
        }
    }

    if let Some((start_jd, began_before_scan)) = open {
        intervals.push(RetrogradeInterval {
            body,
            start_jd,
            end_jd: jd_end,
            ongoing: true,
            began_before_scan,
        });
    }

    debug!(
        samples = grid.sample_count(),
        intervals = intervals.len(),
        "retrograde scan complete"
    );
    Ok(intervals)
}

/// Intervals for several bodies, grouped by body in the order given.
pub fn find_retrogrades_for(
    provider: &dyn EphemerisProvider,
    bodies: &[Body],
    jd_start: f64,
    jd_end: f64,
    config: &RetrogradeConfig,
) -> Result<Vec<RetrogradeInterval>, SearchError> {
    let mut all = Vec::new();
    for &body in bodies {
        all.extend(find_retrograde_intervals(
            provider, body, jd_start, jd_end, config,
        )?);
    }
    Ok(all)
}

/// Which of `bodies` are retrograde at `jd`.
pub fn retrograde_status(
    provider: &dyn EphemerisProvider,
    jd: f64,
    bodies: &[Body],
) -> Result<Vec<RetrogradeStatus>, SearchError> {
    bodies
        .iter()
        .map(|&body| {
            let speed = provider.speed(jd, body)?;
            Ok(RetrogradeStatus {
                body,
                retrograde: speed < 0.0,
                speed_deg_per_day: speed,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use horae_core::{BodyMotion, SyntheticEphemeris};

    use super::*;

    fn mars_loop() -> SyntheticEphemeris {
        SyntheticEphemeris::new().with_motion(
            Body::Mars,
            BodyMotion::uniform(0.0, 0.0, 0.5).with_segment(100.0, 130.0, -0.5),
        )
    }

    #[test]
    fn single_interval() {
        let eph = mars_loop();
        let iv = find_retrograde_intervals(&eph, Body::Mars, 0.0, 365.0, &RetrogradeConfig::default())
            .unwrap();
        assert_eq!(iv.len(), 1);
        assert_eq!(iv[0].start_jd, 100.0);
        assert_eq!(iv[0].end_jd, 130.0);
        assert!(!iv[0].ongoing);
        assert!(!iv[0].began_before_scan);
    }

    #[test]
    fn open_at_both_ends() {
        let eph = mars_loop();
        let iv = find_retrograde_intervals(&eph, Body::Mars, 110.0, 120.0, &RetrogradeConfig::default())
            .unwrap();
        assert_eq!(iv.len(), 1);
        assert_eq!((iv[0].start_jd, iv[0].end_jd), (110.0, 120.0));
        assert!(iv[0].ongoing);
        assert!(iv[0].began_before_scan);
    }

    #[test]
    fn direct_throughout() {
        let eph = mars_loop();
        let iv = find_retrograde_intervals(&eph, Body::Mars, 200.0, 300.0, &RetrogradeConfig::default())
            .unwrap();
        assert!(iv.is_empty());
    }

    #[test]
    fn rejects_reversed_range() {
        let eph = mars_loop();
        assert!(matches!(
            find_retrograde_intervals(&eph, Body::Mars, 10.0, 0.0, &RetrogradeConfig::default()),
            Err(SearchError::InvalidRange(_))
        ));
    }

    #[test]
    fn status_per_body() {
        let eph = mars_loop().with_uniform(Body::Sun, 0.0, 0.0, 1.0);
        let s = retrograde_status(&eph, 115.0, &[Body::Sun, Body::Mars]).unwrap();
        assert_eq!(s.len(), 2);
        assert!(!s[0].retrograde);
        assert!(s[1].retrograde);
        assert_eq!(s[1].speed_deg_per_day, -0.5);
    }

    #[test]
    fn multiple_bodies_grouped() {
        let eph = mars_loop().with_motion(
            Body::Mercury,
            BodyMotion::uniform(0.0, 0.0, 1.2).with_segment(10.0, 31.0, -0.7),
        );
        let iv = find_retrogrades_for(
            &eph,
            &[Body::Mercury, Body::Mars],
            0.0,
            200.0,
            &RetrogradeConfig::default(),
        )
        .unwrap();
        assert_eq!(iv.len(), 2);
        assert_eq!(iv[0].body, Body::Mercury);
        assert_eq!(iv[1].body, Body::Mars);
    }
}
