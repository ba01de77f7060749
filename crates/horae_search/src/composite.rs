//! Relationship charts built from two natal instants.
//!
//! A midpoint composite places each body halfway along the shorter arc
//! between its two natal longitudes. A Davison chart reads the sky at the
//! instant halfway between the births.

use horae_core::{AngularPosition, Body, EphemerisProvider, normalize_360, shortest_signed_angle};
use tracing::{debug, instrument};

use crate::aspect_types::BodyPosition;
use crate::aspects::positions_at;
use crate::composite_types::{CompositeChart, CompositeMethod, ElementBalance};
use crate::error::SearchError;

/// Midpoint of two longitudes along the shorter arc, `[0, 360)`.
///
/// Exactly opposite longitudes have two midpoints; the one 90° ahead of `a`
/// is returned.
pub fn midpoint_longitude(a: f64, b: f64) -> f64 {
    normalize_360(a + shortest_signed_angle(b, a) / 2.0)
}

/// Midpoint composite of the bodies present in both charts, in `chart_a`
/// order. The composite speed is the mean of the two natal speeds.
pub fn midpoint_composite(chart_a: &[BodyPosition], chart_b: &[BodyPosition]) -> CompositeChart {
    let positions: Vec<BodyPosition> = chart_a
        .iter()
        .filter_map(|a| {
            let b = chart_b.iter().find(|b| b.body == a.body)?;
            let (pa, pb) = (a.position, b.position);
            let p = AngularPosition::new(
                midpoint_longitude(pa.longitude_deg, pb.longitude_deg),
                (pa.speed_deg_per_day + pb.speed_deg_per_day) / 2.0,
            );
            Some(BodyPosition::new(a.body, p))
        })
        .collect();

    CompositeChart {
        method: CompositeMethod::Midpoint,
        reference_jd: None,
        elements: ElementBalance::from_positions(&positions),
        positions,
    }
}

/// Davison chart: positions of `bodies` at the midpoint of the two births.
pub fn davison_chart(
    provider: &dyn EphemerisProvider,
    jd_a: f64,
    jd_b: f64,
    bodies: &[Body],
) -> Result<CompositeChart, SearchError> {
    if !jd_a.is_finite() || !jd_b.is_finite() {
        return Err(SearchError::InvalidRange("non-finite Julian Day"));
    }
    let mid = jd_a + (jd_b - jd_a) / 2.0;
    let positions = positions_at(provider, mid, bodies)?;
    Ok(CompositeChart {
        method: CompositeMethod::Davison,
        reference_jd: Some(mid),
        elements: ElementBalance::from_positions(&positions),
        positions,
    })
}

/// Composite of the charts cast at `jd_a` and `jd_b`.
#[instrument(skip_all, fields(method = %method, jd_a = jd_a, jd_b = jd_b))]
pub fn composite_chart(
    provider: &dyn EphemerisProvider,
    jd_a: f64,
    jd_b: f64,
    bodies: &[Body],
    method: CompositeMethod,
) -> Result<CompositeChart, SearchError> {
    if bodies.is_empty() {
        return Err(SearchError::InvalidConfig("bodies must not be empty"));
    }
    let chart = match method {
        CompositeMethod::Midpoint => {
            if !jd_a.is_finite() || !jd_b.is_finite() {
                return Err(SearchError::InvalidRange("non-finite Julian Day"));
            }
            let a = positions_at(provider, jd_a, bodies)?;
            let b = positions_at(provider, jd_b, bodies)?;
            midpoint_composite(&a, &b)
        }
        CompositeMethod::Davison => davison_chart(provider, jd_a, jd_b, bodies)?,
    };
    debug!(
        bodies = chart.positions.len(),
        dominant = ?chart.elements.dominant(),
        "composite chart"
    );
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use horae_core::{Element, SyntheticEphemeris, ZodiacSign};

    use super::*;

    fn at(body: Body, lon: f64, speed: f64) -> BodyPosition {
        BodyPosition::new(body, AngularPosition::new(lon, speed))
    }

    #[test]
    fn midpoint_takes_shorter_arc() {
        assert!((midpoint_longitude(10.0, 50.0) - 30.0).abs() < 1e-12);
        assert!((midpoint_longitude(300.0, 100.0) - 20.0).abs() < 1e-12);
        assert!(midpoint_longitude(350.0, 10.0).abs() < 1e-12);
        assert!(midpoint_longitude(10.0, 350.0).abs() < 1e-12);
        assert!((midpoint_longitude(123.0, 123.0) - 123.0).abs() < 1e-12);
    }

    #[test]
    fn midpoint_is_symmetric_off_opposition() {
        for (a, b) in [(0.0, 90.0), (200.0, 10.0), (359.0, 178.5), (45.0, 224.0)] {
            assert!((midpoint_longitude(a, b) - midpoint_longitude(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn opposition_resolves_ahead_of_first() {
        assert!((midpoint_longitude(0.0, 180.0) - 90.0).abs() < 1e-12);
        assert!((midpoint_longitude(180.0, 0.0) - 270.0).abs() < 1e-12);
    }

    #[test]
    fn composite_keeps_shared_bodies() {
        let a = [
            at(Body::Sun, 10.0, 1.0),
            at(Body::Moon, 100.0, 13.0),
            at(Body::Venus, 300.0, 1.2),
        ];
        let b = [
            at(Body::Mars, 5.0, 0.6),
            at(Body::Moon, 340.0, 12.0),
            at(Body::Sun, 50.0, 1.0),
        ];
        let c = midpoint_composite(&a, &b);
        assert_eq!(c.method, CompositeMethod::Midpoint);
        assert_eq!(c.reference_jd, None);
        assert_eq!(c.positions.len(), 2);

        let sun = c.position(Body::Sun).unwrap();
        assert!((sun.position.longitude_deg - 30.0).abs() < 1e-12);
        let moon = c.position(Body::Moon).unwrap();
        assert!((moon.position.longitude_deg - 40.0).abs() < 1e-12);
        assert!((moon.position.speed_deg_per_day - 12.5).abs() < 1e-12);
        assert_eq!(moon.position.sign(), ZodiacSign::Taurus);
        assert_eq!(c.elements.earth, 2);
        assert_eq!(c.elements.dominant(), Some(Element::Earth));
    }

    #[test]
    fn davison_reads_sky_at_midpoint_instant() {
        let eph = SyntheticEphemeris::new().with_uniform(Body::Sun, 0.0, 0.0, 1.0);
        let c = davison_chart(&eph, 100.0, 300.0, &[Body::Sun]).unwrap();
        assert_eq!(c.reference_jd, Some(200.0));
        assert!((c.positions[0].position.longitude_deg - 200.0).abs() < 1e-9);

        let swapped = davison_chart(&eph, 300.0, 100.0, &[Body::Sun]).unwrap();
        assert_eq!(swapped.reference_jd, Some(200.0));
    }

    #[test]
    fn composite_chart_dispatches_on_method() {
        let eph = SyntheticEphemeris::new()
            .with_uniform(Body::Sun, 0.0, 0.0, 1.0)
            .with_uniform(Body::Mars, 0.0, 350.0, 0.5);
        let bodies = [Body::Sun, Body::Mars];

        let mid = composite_chart(&eph, 0.0, 40.0, &bodies, CompositeMethod::Midpoint).unwrap();
        assert!((mid.positions[0].position.longitude_deg - 20.0).abs() < 1e-9);
        assert!((mid.positions[1].position.longitude_deg - 0.0).abs() < 1e-9);

        let dav = composite_chart(&eph, 0.0, 40.0, &bodies, CompositeMethod::Davison).unwrap();
        assert_eq!(dav.method, CompositeMethod::Davison);
        assert!((dav.positions[1].position.longitude_deg - 0.0).abs() < 1e-9);
    }

    #[test]
    fn composite_rejects_bad_input() {
        let eph = SyntheticEphemeris::new().with_uniform(Body::Sun, 0.0, 0.0, 1.0);
        assert!(matches!(
            composite_chart(&eph, 0.0, 1.0, &[], CompositeMethod::Midpoint),
            Err(SearchError::InvalidConfig(_))
        ));
        assert!(matches!(
            composite_chart(&eph, f64::NAN, 1.0, &[Body::Sun], CompositeMethod::Davison),
            Err(SearchError::InvalidRange(_))
        ));
        assert!(matches!(
            composite_chart(&eph, 0.0, 1.0, &[Body::Venus], CompositeMethod::Midpoint),
            Err(SearchError::Ephemeris(_))
        ));
    }
}
