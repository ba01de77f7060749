//! Eclipse event search.
//!
//! Repeatedly asks the provider for the next eclipse of a kind, classifies
//! its flag bits and advances a cursor past it. The loop is bounded three
//! ways: the requested end, `max_events`, and a guard on provider calls that
//! stops providers returning zero or non-advancing times.
//!
//! Classification precedence:
//! - solar: non-central is partial; otherwise total > hybrid > annular >
//!   partial, defaulting to partial.
//! - lunar: umbral magnitude ≥ 1 is total, in (0, 1) partial, else a positive
//!   penumbral magnitude is penumbral; without magnitudes the bits decide
//!   total > partial > penumbral, defaulting to penumbral.

use horae_core::{EclipseHit, EclipseKind, EclipseRequest, EphemerisError, EphemerisProvider, eclipse_flags as flags};
use tracing::{debug, instrument, trace, warn};

use crate::bounded::Bounded;
use crate::eclipse_types::{
    EVENT_ADVANCE_DAYS, EclipseEvent, EclipseSearchConfig, EclipseType, STALL_ADVANCE_DAYS,
};
use crate::error::SearchError;

/// Solar eclipse type from provider flag bits.
pub fn classify_solar(bits: u32) -> EclipseType {
    if bits & flags::NONCENTRAL != 0 {
        EclipseType::Partial
    } else if bits & flags::TOTAL != 0 {
        EclipseType::Total
    } else if bits & flags::ANNULAR_TOTAL != 0 {
        EclipseType::Hybrid
    } else if bits & flags::ANNULAR != 0 {
        EclipseType::Annular
    } else {
        EclipseType::Partial
    }
}

/// Lunar eclipse type, preferring magnitudes over flag bits.
pub fn classify_lunar(hit: &EclipseHit) -> EclipseType {
    if let Some(umbral) = hit.umbral_magnitude {
        if umbral >= 1.0 {
            return EclipseType::Total;
        }
        if umbral > 0.0 {
            return EclipseType::Partial;
        }
    }
    if hit.penumbral_magnitude.is_some_and(|p| p > 0.0) {
        return EclipseType::Penumbral;
    }

    if hit.flags & flags::TOTAL != 0 {
        EclipseType::Total
    } else if hit.flags & flags::PARTIAL != 0 {
        EclipseType::Partial
    } else {
        EclipseType::Penumbral
    }
}

fn classify(kind: EclipseKind, hit: &EclipseHit) -> EclipseType {
    match kind {
        EclipseKind::Solar => classify_solar(hit.flags),
        EclipseKind::Lunar => classify_lunar(hit),
    }
}

/// Eclipses of `kind` with maximum in `(jd_start, jd_end]`, in time order.
///
/// A provider with nothing further to report ends the search normally. When
/// the guard cap ends it, the events found so far are returned with
/// `guard_exceeded` set.
#[instrument(skip_all, fields(kind = %kind, jd_start = jd_start, jd_end = jd_end))]
pub fn search_eclipses(
    provider: &dyn EphemerisProvider,
    kind: EclipseKind,
    jd_start: f64,
    jd_end: f64,
    config: &EclipseSearchConfig,
) -> Result<Bounded<Vec<EclipseEvent>>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if !jd_start.is_finite() || !jd_end.is_finite() {
        return Err(SearchError::InvalidRange("range bounds must be finite"));
    }
    if jd_end <= jd_start {
        return Err(SearchError::InvalidRange("end must be after start"));
    }

    let request = EclipseRequest::any(kind);
    let mut events = Vec::new();
    let mut cursor = jd_start;
    let mut iterations = 0u32;

    while cursor < jd_end && events.len() < config.max_events {
        if iterations >= config.guard_iterations {
            warn!(iterations, found = events.len(), "eclipse search guard exceeded");
            return Ok(Bounded::partial(events, iterations));
        }
        iterations += 1;

        let hit = match provider.next_eclipse(cursor, &request) {
            Ok(hit) => hit,
            Err(EphemerisError::NoEclipse) => break,
            Err(e) => return Err(e.into()),
        };

        let jd_max = match hit.jd_max() {
            Some(t) if t > 0.0 && t > cursor => t,
            other => {
                trace!(cursor, jd_max = ?other, "unusable eclipse time; skipping ahead");
                cursor += STALL_ADVANCE_DAYS;
                continue;
            }
        };
        if jd_max > jd_end {
            break;
        }

        events.push(EclipseEvent {
            kind,
            eclipse_type: classify(kind, &hit),
            jd_max,
            debug_flags: config.include_debug_flags.then_some(hit.flags),
        });
        cursor = jd_max + EVENT_ADVANCE_DAYS;
    }

    debug!(iterations, found = events.len(), "eclipse search complete");
    Ok(Bounded::complete(events, iterations))
}
