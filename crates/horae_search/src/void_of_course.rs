//! Void-of-course Moon detection.
//!
//! Steps forward from the start instant while the Moon stays in its sign,
//! remembering the last step at which it aspected any of the configured
//! bodies. The ingress itself is refined by bisection on the sign boundary.

use horae_core::{Body, EphemerisProvider, ZodiacSign, shortest_signed_angle};
use horae_time::SYNODIC_MONTH_DAYS;
use tracing::{debug, instrument, warn};

use crate::aspect_types::{AspectMatch, BodyPosition};
use crate::aspects::moon_aspects;
use crate::error::SearchError;
use crate::scan::{Bracket, DEFAULT_BISECTION_ITERATIONS, refine};
use crate::void_of_course_types::{VocConfig, VoidOfCourseWindow};

/// Step cap for one scan: a full synodic month of steps.
pub fn guard_steps(step_days: f64) -> u32 {
    (SYNODIC_MONTH_DAYS / step_days).ceil() as u32
}

/// Void-of-course state of the Moon at `jd_start`, scanning forward to its
/// next sign change.
#[instrument(skip_all, fields(jd_start = jd_start, step = config.step_days))]
pub fn void_of_course(
    provider: &dyn EphemerisProvider,
    jd_start: f64,
    config: &VocConfig,
) -> Result<VoidOfCourseWindow, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if !jd_start.is_finite() {
        return Err(SearchError::InvalidRange("start must be finite"));
    }

    let bodies: Vec<Body> = config
        .bodies
        .iter()
        .copied()
        .filter(|&b| b != Body::Moon)
        .collect();
    let guard = guard_steps(config.step_days);

    let moon_sign = provider.position(jd_start, Body::Moon)?.sign();
    let mut last_aspect: Option<(f64, AspectMatch)> = None;
    let mut ingress: Option<(f64, f64, ZodiacSign)> = None;
    let mut t_prev = jd_start;

    for i in 0..guard {
        let t = jd_start + f64::from(i) * config.step_days;
        let moon = BodyPosition::new(Body::Moon, provider.position(t, Body::Moon)?);
        let sign = moon.position.sign();
        if sign != moon_sign {
            ingress = Some((t_prev, t, sign));
            break;
        }

        let others = bodies
            .iter()
            .map(|&b| Ok(BodyPosition::new(b, provider.position(t, b)?)))
            .collect::<Result<Vec<_>, SearchError>>()?;
        if let Some(m) = moon_aspects(&moon, &others, &config.orbs)
            .into_iter()
            .max_by(|a, b| a.tightness.total_cmp(&b.tightness))
        {
            last_aspect = Some((t, m));
        }
        t_prev = t;
    }

    let window_start_jd = last_aspect.map_or(jd_start, |(t, _)| t);
    let last_aspect = last_aspect.map(|(_, m)| m);

    let Some((t_in, t_out, new_sign)) = ingress else {
        warn!(guard, "no Moon ingress within guard");
        return Ok(VoidOfCourseWindow {
            jd_start,
            moon_sign,
            is_void_now: false,
            window_start_jd,
            sign_change_jd: None,
            last_aspect,
            guard_exceeded: true,
        });
    };

    let sign_change_jd = refine_ingress(provider, moon_sign, new_sign, t_in, t_out)?
        .max(window_start_jd);
    let is_void_now = jd_start >= window_start_jd && jd_start < sign_change_jd;

    debug!(
        window_start = window_start_jd,
        sign_change = sign_change_jd,
        void = is_void_now,
        "void-of-course scan complete"
    );
    Ok(VoidOfCourseWindow {
        jd_start,
        moon_sign,
        is_void_now,
        window_start_jd,
        sign_change_jd: Some(sign_change_jd),
        last_aspect,
        guard_exceeded: false,
    })
}

/// Bisect the crossing of the boundary between `from` and `to`.
fn refine_ingress(
    provider: &dyn EphemerisProvider,
    from: ZodiacSign,
    to: ZodiacSign,
    t_in: f64,
    t_out: f64,
) -> Result<f64, SearchError> {
    let boundary = if to == from.next() {
        to.start_longitude()
    } else {
        from.start_longitude()
    };
    let f = |t: f64| -> Result<f64, SearchError> {
        Ok(shortest_signed_angle(provider.longitude(t, Body::Moon)?, boundary))
    };
    let f_a = f(t_in)?;
    let f_b = f(t_out)?;
    if f_a * f_b > 0.0 {
        // Stepped over more than one boundary; keep the sample.
        return Ok(t_out);
    }
    refine(
        &f,
        &Bracket {
            t_a: t_in,
            f_a,
            t_b: t_out,
            f_b,
        },
        DEFAULT_BISECTION_ITERATIONS,
    )
}

#[cfg(test)]
mod tests {
    use horae_core::SyntheticEphemeris;

    use super::*;

    fn config(bodies: Vec<Body>) -> VocConfig {
        VocConfig {
            bodies,
            ..VocConfig::default()
        }
    }

    #[test]
    fn guard_is_one_synodic_month() {
        assert_eq!(guard_steps(1.0 / 96.0), 2835);
        assert_eq!(guard_steps(1.0), 30);
    }

    #[test]
    fn no_aspect_means_void_from_start() {
        // Moon at 5° Aries moving 12°/day reaches Taurus after 25/12 days.
        // Saturn at 170° stays 140°..165° away, outside every orb.
        let eph = SyntheticEphemeris::new()
            .with_uniform(Body::Moon, 0.0, 5.0, 12.0)
            .with_uniform(Body::Saturn, 0.0, 170.0, 0.0);
        let w = void_of_course(&eph, 0.0, &config(vec![Body::Saturn])).unwrap();
        assert_eq!(w.moon_sign, ZodiacSign::Aries);
        assert!(w.last_aspect.is_none());
        assert_eq!(w.window_start_jd, 0.0);
        assert!(w.is_void_now);
        let sc = w.sign_change_jd.unwrap();
        assert!((sc - 25.0 / 12.0).abs() < 1e-6);
        assert!(w.window_start_jd <= sc);
    }

    #[test]
    fn aspect_ahead_means_not_void() {
        // Saturn at 15° Leo trines 15° Aries; with a 7° orb the Moon stays
        // in aspect until 22° Aries.
        let eph = SyntheticEphemeris::new()
            .with_uniform(Body::Moon, 0.0, 5.0, 12.0)
            .with_uniform(Body::Saturn, 0.0, 135.0, 0.0);
        let w = void_of_course(&eph, 0.0, &config(vec![Body::Saturn])).unwrap();
        assert!(!w.is_void_now);
        let m = w.last_aspect.unwrap();
        assert_eq!(m.body_b, Body::Saturn);
        assert!(w.window_start_jd > 0.0);
        assert!(w.window_start_jd <= w.sign_change_jd.unwrap());
        assert!((w.window_start_jd - 17.0 / 12.0).abs() <= 2.0 / 96.0);
    }

    #[test]
    fn stationary_moon_hits_guard() {
        let eph = SyntheticEphemeris::new()
            .with_uniform(Body::Moon, 0.0, 5.0, 0.0)
            .with_uniform(Body::Sun, 0.0, 200.0, 0.0);
        let w = void_of_course(&eph, 0.0, &config(vec![Body::Sun])).unwrap();
        assert!(w.guard_exceeded);
        assert!(w.sign_change_jd.is_none());
        assert!(!w.is_void_now);
    }

    #[test]
    fn moon_in_body_list_is_ignored() {
        let eph = SyntheticEphemeris::new().with_uniform(Body::Moon, 0.0, 29.0, 12.0);
        let w = void_of_course(&eph, 0.0, &config(vec![Body::Moon])).unwrap();
        assert!(w.is_void_now);
        assert!(w.last_aspect.is_none());
    }

    #[test]
    fn invalid_step_rejected() {
        let eph = SyntheticEphemeris::new().with_uniform(Body::Moon, 0.0, 0.0, 12.0);
        let c = VocConfig {
            step_days: 0.0,
            ..VocConfig::default()
        };
        assert!(matches!(
            void_of_course(&eph, 0.0, &c),
            Err(SearchError::InvalidConfig(_))
        ));
    }
}
