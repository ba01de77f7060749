//! Property tests for the scan + bisection return solver.

use horae_core::{Body, EphemerisProvider, SyntheticEphemeris};
use horae_search::{ReturnConfig, RetrogradeConfig, find_retrograde_intervals, find_return};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// With longitude(t) = t * rate mod 360, solving for longitude(t0) from a
    /// nearby guess recovers t0.
    #[test]
    fn return_round_trip(
        rate in 0.1f64..15.0,
        t0 in 0.0f64..5000.0,
        frac in -0.2f64..0.2,
    ) {
        let eph = SyntheticEphemeris::new().with_uniform(Body::Mars, 0.0, 0.0, rate);
        let period = 360.0 / rate;
        let target = eph.longitude(t0, Body::Mars).unwrap();
        let config = ReturnConfig {
            window_days: 0.8 * period,
            ..ReturnConfig::default()
        };

        let ev = find_return(&eph, Body::Mars, target, t0 + frac * period, &config).unwrap();
        prop_assert!((ev.jd - t0).abs() < 1e-6, "jd {} t0 {t0}", ev.jd);
        prop_assert!(ev.residual_deg.abs() < 1e-5);
    }

    /// A body retrograde exactly on whole days [d1, d2) yields one interval
    /// with those bounds.
    #[test]
    fn retrograde_interval_coverage(d1 in 10u32..200, len in 1u32..120) {
        let d1 = f64::from(d1);
        let d2 = d1 + f64::from(len);
        let eph = SyntheticEphemeris::new().with_motion(
            Body::Jupiter,
            horae_core::BodyMotion::uniform(0.0, 0.0, 0.2).with_segment(d1, d2, -0.1),
        );
        let iv = find_retrograde_intervals(&eph, Body::Jupiter, 0.0, 400.0, &RetrogradeConfig::default())
            .unwrap();
        prop_assert_eq!(iv.len(), 1);
        prop_assert_eq!(iv[0].start_jd, d1);
        prop_assert_eq!(iv[0].end_jd, d2);
    }
}
