//! Electional scoring: rank candidate instants by a weighted sum of simple
//! rules (lunar phase, dignity of the Moon and Venus, benefic aspects,
//! Mercury retrograde, void-of-course Moon).

use horae_core::{Body, EphemerisProvider};
use tracing::{debug, instrument};

use crate::aspect_types::AspectMatch;
use crate::aspects::{aspect_matrix, positions_at};
use crate::dignity::essential_dignity;
use crate::electional_types::{ElectionalConfig, ElectionalScore};
use crate::error::SearchError;
use crate::lunar_phase::lunar_phase_at;
use crate::scan::ScanGrid;
use crate::void_of_course::void_of_course;
use crate::void_of_course_types::VoidOfCourseWindow;

fn is_benefic_contact(m: &AspectMatch) -> bool {
    let benefic = |b: Body| matches!(b, Body::Venus | Body::Jupiter);
    m.kind.is_harmonious() && (benefic(m.body_a) || benefic(m.body_b))
}

/// Void state at `jd`, reusing `cache` while it still covers `jd`.
fn moon_void_at(
    provider: &dyn EphemerisProvider,
    jd: f64,
    config: &ElectionalConfig,
    cache: &mut Option<VoidOfCourseWindow>,
) -> Result<bool, SearchError> {
    if let Some(void) = cache.as_ref().and_then(|w| w.is_void_at(jd)) {
        return Ok(void);
    }
    let window = void_of_course(provider, jd, &config.voc)?;
    let void = window.is_void_now;
    *cache = Some(window);
    Ok(void)
}

fn score_with(
    provider: &dyn EphemerisProvider,
    jd: f64,
    config: &ElectionalConfig,
    voc_cache: &mut Option<VoidOfCourseWindow>,
) -> Result<ElectionalScore, SearchError> {
    let w = &config.weights;
    let mut score = 0.0;
    let mut reasons = Vec::new();

    let phase = lunar_phase_at(provider, jd)?.phase;
    score += w.phase(phase);
    reasons.push(format!("phase:{phase}"));

    for body in [Body::Moon, Body::Venus] {
        let sign = provider.position(jd, body)?.sign();
        for kind in essential_dignity(body, sign).kinds() {
            score += w.weight(kind);
            reasons.push(format!("{body}:{kind}"));
        }
    }

    let positions = positions_at(provider, jd, &config.bodies)?;
    let benefic = aspect_matrix(&positions, &config.orbs)
        .iter()
        .filter(|m| is_benefic_contact(m))
        .count();
    if benefic > 0 {
        score += w.benefic_aspect * benefic as f64;
        reasons.push(format!("benefic_aspects:{benefic}"));
    }

    if config.avoid_mercury_retrograde && provider.speed(jd, Body::Mercury)? < 0.0 {
        score += w.mercury_retrograde;
        reasons.push("mercury_retrograde".to_string());
    }

    if config.avoid_moon_void_of_course && moon_void_at(provider, jd, config, voc_cache)? {
        score += w.moon_void_of_course;
        reasons.push("moon_void_of_course".to_string());
    }

    Ok(ElectionalScore { jd, score, reasons })
}

/// Score a single instant.
pub fn score_instant(
    provider: &dyn EphemerisProvider,
    jd: f64,
    config: &ElectionalConfig,
) -> Result<ElectionalScore, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    score_with(provider, jd, config, &mut None)
}

/// Score every `step_days` across `[jd_start, jd_end]` and return the best
/// `max_results`, highest first. Equal scores keep time order.
#[instrument(skip_all, fields(jd_start = jd_start, jd_end = jd_end))]
pub fn search_electional(
    provider: &dyn EphemerisProvider,
    jd_start: f64,
    jd_end: f64,
    config: &ElectionalConfig,
) -> Result<Vec<ElectionalScore>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    let grid = ScanGrid::new(jd_start, jd_end, config.step_days);
    grid.validate()?;

    let mut voc_cache = None;
    let mut scores = grid
        .samples()
        .map(|jd| score_with(provider, jd, config, &mut voc_cache))
        .collect::<Result<Vec<_>, SearchError>>()?;

    let candidates = scores.len();
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores.truncate(config.max_results);

    debug!(candidates, kept = scores.len(), "electional search complete");
    Ok(scores)
}
