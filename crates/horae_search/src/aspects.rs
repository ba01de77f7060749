//! Aspect engine: which pairs of bodies form major aspects, and whether
//! those aspects are applying or separating.

use horae_core::{Body, EphemerisProvider, shortest_signed_angle};
use tracing::{debug, instrument};

use crate::aspect_types::{
    AspectKind, AspectMatch, AspectTone, BodyPosition, EnergySample, OrbTable,
};
use crate::error::SearchError;
use crate::scan::ScanGrid;

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Test one pair against every aspect kind and report the tightest match.
pub fn find_aspect(a: &BodyPosition, b: &BodyPosition, orbs: &OrbTable) -> Option<AspectMatch> {
    let d = shortest_signed_angle(a.position.longitude_deg, b.position.longitude_deg);
    let separation = d.abs();
    let relative_speed = a.position.speed_deg_per_day - b.position.speed_deg_per_day;

    AspectKind::ALL
        .iter()
        .filter_map(|&kind| {
            let orb = orbs.orb(kind);
            let excess = separation - kind.angle();
            let deviation = excess.abs();
            if deviation > orb {
                return None;
            }
            // d moving in this direction brings |d| back toward the exact angle.
            let direction = -sign(excess) * sign(d);
            Some(AspectMatch {
                body_a: a.body,
                body_b: b.body,
                kind,
                separation_deg: separation,
                orb_deg: orb,
                deviation_deg: deviation,
                tightness: orb - deviation,
                applying: relative_speed * direction > 0.0,
            })
        })
        .max_by(|x, y| x.tightness.total_cmp(&y.tightness))
}

/// Every unordered pair in `positions`, in input order.
pub fn aspect_matrix(positions: &[BodyPosition], orbs: &OrbTable) -> Vec<AspectMatch> {
    let mut out = Vec::new();
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            if let Some(m) = find_aspect(a, b, orbs) {
                out.push(m);
            }
        }
    }
    out
}

/// Aspects the Moon makes to `others`, with the Moon as `body_a`.
pub fn moon_aspects(
    moon: &BodyPosition,
    others: &[BodyPosition],
    orbs: &OrbTable,
) -> Vec<AspectMatch> {
    others
        .iter()
        .filter(|p| p.body != Body::Moon)
        .filter_map(|p| find_aspect(moon, p, orbs))
        .collect()
}

/// Aspects from every body of `chart_a` to every body of `chart_b`
/// (synastry), tightest first, ties broken by aspect name.
pub fn cross_aspects(
    chart_a: &[BodyPosition],
    chart_b: &[BodyPosition],
    orbs: &OrbTable,
) -> Vec<AspectMatch> {
    let mut out: Vec<AspectMatch> = chart_a
        .iter()
        .flat_map(|a| chart_b.iter().filter_map(move |b| find_aspect(a, b, orbs)))
        .collect();
    out.sort_by(|x, y| {
        y.tightness
            .total_cmp(&x.tightness)
            .then_with(|| x.kind.name().cmp(y.kind.name()))
    });
    out
}

/// Count harmonious (trine, sextile) and hard (square, opposition) aspects.
/// Conjunctions count toward neither.
pub fn aspect_tone(aspects: &[AspectMatch]) -> AspectTone {
    aspects.iter().fold(AspectTone::default(), |mut t, m| {
        if m.kind.is_harmonious() {
            t.harmonious += 1;
        } else if m.kind.is_hard() {
            t.hard += 1;
        }
        t
    })
}

/// Positions of `bodies` at `jd`, in the order given.
pub fn positions_at(
    provider: &dyn EphemerisProvider,
    jd: f64,
    bodies: &[Body],
) -> Result<Vec<BodyPosition>, SearchError> {
    bodies
        .iter()
        .map(|&body| Ok(BodyPosition::new(body, provider.position(jd, body)?)))
        .collect()
}

/// Aspect tone of `bodies` sampled across `grid`.
#[instrument(skip_all, fields(start = grid.start, end = grid.end, step = grid.step))]
pub fn transit_energy_series(
    provider: &dyn EphemerisProvider,
    grid: &ScanGrid,
    bodies: &[Body],
    orbs: &OrbTable,
) -> Result<Vec<EnergySample>, SearchError> {
    grid.validate()?;
    orbs.validate().map_err(SearchError::InvalidConfig)?;

    let series = grid
        .samples()
        .map(|jd| {
            let aspects = aspect_matrix(&positions_at(provider, jd, bodies)?, orbs);
            Ok(EnergySample {
                jd,
                aspects: aspects.len(),
                tone: aspect_tone(&aspects),
            })
        })
        .collect::<Result<Vec<_>, SearchError>>()?;

    debug!(samples = series.len(), "energy series complete");
    Ok(series)
}
