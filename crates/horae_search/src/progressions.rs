//! Secondary progressions and solar arc directions.
//!
//! Both map a target date onto the sky shortly after birth: each Julian year
//! of life advances the progressed chart by one day. Solar arc directions
//! then move every natal body by the distance the progressed Sun has
//! travelled.

use horae_core::{Body, EphemerisProvider, ZodiacSign, angular_separation, normalize_360};
use horae_time::JULIAN_YEAR_DAYS;
use tracing::{debug, instrument};

use crate::aspect_types::{BodyPosition, OrbTable};
use crate::aspects::{cross_aspects, positions_at};
use crate::error::SearchError;
use crate::lunar_phase::elongation;
use crate::lunar_phase_types::LunarOctant;
use crate::progressions_types::{
    DirectedPosition, MAX_PROGRESSED_AGE_SPAN, ProgressedAspect, ProgressedChart,
    ProgressedMoonCycle, ProgressedMoonPhase, ProgressedPhaseChange, ProgressionConfig,
    ProgressionHighlight, SolarArcChart,
};

/// Age in Julian years at `target_jd`.
fn age_years(natal_jd: f64, target_jd: f64) -> Result<f64, SearchError> {
    if !natal_jd.is_finite() || !target_jd.is_finite() {
        return Err(SearchError::InvalidRange("non-finite Julian Day"));
    }
    if target_jd < natal_jd {
        return Err(SearchError::InvalidRange("target precedes natal instant"));
    }
    Ok((target_jd - natal_jd) / JULIAN_YEAR_DAYS)
}

/// Day-for-a-year mapping: the instant whose sky stands for `target_jd`.
pub fn progressed_jd(natal_jd: f64, target_jd: f64) -> f64 {
    natal_jd + (target_jd - natal_jd) / JULIAN_YEAR_DAYS
}

/// Progressed chart at `target_jd`, with aspects to the natal chart.
#[instrument(skip_all, fields(natal_jd = natal_jd, target_jd = target_jd))]
pub fn secondary_progressions(
    provider: &dyn EphemerisProvider,
    natal_jd: f64,
    target_jd: f64,
    config: &ProgressionConfig,
) -> Result<ProgressedChart, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    let age = age_years(natal_jd, target_jd)?;
    let pjd = progressed_jd(natal_jd, target_jd);

    let positions = positions_at(provider, pjd, &config.bodies)?;
    let natal = positions_at(provider, natal_jd, &config.bodies)?;
    let aspects_to_natal = progressed_to_natal_aspects(&positions, &natal, config);
    let highlights = progression_highlights(&positions, config);

    debug!(
        age,
        progressed_jd = pjd,
        aspects = aspects_to_natal.len(),
        highlights = highlights.len(),
        "secondary progressions"
    );
    Ok(ProgressedChart {
        natal_jd,
        target_jd,
        age_years: age,
        progressed_jd: pjd,
        positions,
        aspects_to_natal,
        highlights,
    })
}

/// Aspects from progressed bodies to natal bodies within a single orb,
/// tightest first.
pub fn progressed_to_natal_aspects(
    progressed: &[BodyPosition],
    natal: &[BodyPosition],
    config: &ProgressionConfig,
) -> Vec<ProgressedAspect> {
    cross_aspects(progressed, natal, &OrbTable::uniform(config.aspect_orb_deg))
        .into_iter()
        .map(|aspect| ProgressedAspect {
            exact: aspect.deviation_deg < config.exact_within_deg,
            aspect,
        })
        .collect()
}

/// Sign ingresses of the progressed luminaries and a progressed New Moon.
/// Needs both the Sun and the Moon among `positions` for the New Moon check.
pub fn progression_highlights(
    positions: &[BodyPosition],
    config: &ProgressionConfig,
) -> Vec<ProgressionHighlight> {
    let find = |body| positions.iter().find(|p| p.body == body).map(|p| p.position);
    let sun = find(Body::Sun);
    let moon = find(Body::Moon);
    let mut out = Vec::new();

    if let Some(m) = moon {
        let degree_in_sign = m.degree_in_sign();
        if !(1.0..=29.0).contains(&degree_in_sign) {
            out.push(ProgressionHighlight::MoonIngress {
                sign: m.sign(),
                degree_in_sign,
            });
        }
    }
    if let Some(s) = sun {
        if s.degree_in_sign() < 1.0 {
            out.push(ProgressionHighlight::SunIngress { sign: s.sign() });
        }
    }
    if let (Some(s), Some(m)) = (sun, moon) {
        let separation_deg = angular_separation(m.longitude_deg, s.longitude_deg);
        if separation_deg < config.new_moon_orb_deg {
            out.push(ProgressionHighlight::NewMoon { separation_deg });
        }
    }
    out
}

/// Natal bodies advanced by the solar arc at `target_jd`.
#[instrument(skip_all, fields(natal_jd = natal_jd, target_jd = target_jd))]
pub fn solar_arc_directions(
    provider: &dyn EphemerisProvider,
    natal_jd: f64,
    target_jd: f64,
    config: &ProgressionConfig,
) -> Result<SolarArcChart, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    let age = age_years(natal_jd, target_jd)?;
    let natal_sun = provider.longitude(natal_jd, Body::Sun)?;
    let progressed_sun = provider.longitude(progressed_jd(natal_jd, target_jd), Body::Sun)?;
    let arc_deg = normalize_360(progressed_sun - natal_sun);

    let positions = config
        .bodies
        .iter()
        .map(|&body| {
            let natal = provider.longitude(natal_jd, body)?;
            let directed = normalize_360(natal + arc_deg);
            Ok(DirectedPosition {
                body,
                natal_longitude_deg: natal,
                directed_longitude_deg: directed,
                natal_sign: ZodiacSign::from_longitude(natal),
                directed_sign: ZodiacSign::from_longitude(directed),
            })
        })
        .collect::<Result<Vec<_>, SearchError>>()?;

    debug!(age, arc_deg, "solar arc directions");
    Ok(SolarArcChart {
        natal_jd,
        target_jd,
        age_years: age,
        arc_deg,
        positions,
    })
}

/// Progressed Sun-Moon phase at every whole age in `start_age..=end_age`,
/// with the ages where the octant changes.
#[instrument(skip_all, fields(natal_jd = natal_jd, start_age = start_age, end_age = end_age))]
pub fn progressed_moon_cycle(
    provider: &dyn EphemerisProvider,
    natal_jd: f64,
    start_age: u32,
    end_age: u32,
) -> Result<ProgressedMoonCycle, SearchError> {
    if !natal_jd.is_finite() {
        return Err(SearchError::InvalidRange("non-finite Julian Day"));
    }
    if end_age < start_age {
        return Err(SearchError::InvalidRange("end_age precedes start_age"));
    }
    if end_age - start_age > MAX_PROGRESSED_AGE_SPAN {
        return Err(SearchError::InvalidRange("age span exceeds 120 years"));
    }

    let phases = (start_age..=end_age)
        .map(|age| {
            let progressed_jd = natal_jd + f64::from(age);
            let elongation_deg = elongation(provider, progressed_jd)?;
            Ok(ProgressedMoonPhase {
                age,
                target_jd: natal_jd + f64::from(age) * JULIAN_YEAR_DAYS,
                progressed_jd,
                elongation_deg,
                octant: LunarOctant::from_elongation(elongation_deg),
                moon_sign: provider.position(progressed_jd, Body::Moon)?.sign(),
            })
        })
        .collect::<Result<Vec<_>, SearchError>>()?;

    let changes: Vec<ProgressedPhaseChange> = phases
        .windows(2)
        .filter(|w| w[0].octant != w[1].octant)
        .map(|w| ProgressedPhaseChange {
            age: w[1].age,
            from: w[0].octant,
            to: w[1].octant,
        })
        .collect();

    debug!(samples = phases.len(), changes = changes.len(), "progressed moon cycle");
    Ok(ProgressedMoonCycle { phases, changes })
}
