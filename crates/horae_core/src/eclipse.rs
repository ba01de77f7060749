//! Eclipse request/response shapes exchanged with a provider.
//!
//! Flag bit values follow the Swiss Ephemeris `SE_ECL_*` constants, which is
//! what tabulated exports carry verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Eclipse type and centrality bits.
pub mod flags {
    pub const CENTRAL: u32 = 1;
    pub const NONCENTRAL: u32 = 2;
    pub const TOTAL: u32 = 4;
    pub const ANNULAR: u32 = 8;
    pub const PARTIAL: u32 = 16;
    /// Hybrid eclipse: annular along part of the track, total elsewhere.
    pub const ANNULAR_TOTAL: u32 = 32;
    pub const PENUMBRAL: u32 = 64;

    /// Every solar eclipse type.
    pub const ALL_SOLAR: u32 = CENTRAL | NONCENTRAL | TOTAL | ANNULAR | PARTIAL | ANNULAR_TOTAL;
    /// Every lunar eclipse type.
    pub const ALL_LUNAR: u32 = TOTAL | PARTIAL | PENUMBRAL;
}

/// Solar or lunar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EclipseKind {
    Solar,
    Lunar,
}

impl EclipseKind {
    /// Mask selecting every eclipse type of this kind.
    pub const fn all_types_mask(self) -> u32 {
        match self {
            Self::Solar => flags::ALL_SOLAR,
            Self::Lunar => flags::ALL_LUNAR,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Solar => "solar",
            Self::Lunar => "lunar",
        }
    }
}

impl fmt::Display for EclipseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// "Next global eclipse after `jd`" query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EclipseRequest {
    pub kind: EclipseKind,
    /// Only eclipses whose flags intersect this mask qualify.
    pub type_mask: u32,
}

impl EclipseRequest {
    /// Request matching any type of the given kind.
    pub const fn any(kind: EclipseKind) -> Self {
        Self {
            kind,
            type_mask: kind.all_types_mask(),
        }
    }

    pub const fn matches(&self, flags: u32) -> bool {
        flags & self.type_mask != 0
    }
}

/// Provider answer to an [`EclipseRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipseHit {
    /// Type/centrality bits (see [`flags`]).
    pub flags: u32,
    /// Contact times as Julian Days; `times[0]` is the time of maximum.
    pub times: Vec<f64>,
    #[serde(default)]
    pub umbral_magnitude: Option<f64>,
    #[serde(default)]
    pub penumbral_magnitude: Option<f64>,
}

impl EclipseHit {
    /// Time of greatest eclipse, if the provider reported one.
    pub fn jd_max(&self) -> Option<f64> {
        self.times.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_cover_kind_bits() {
        assert_ne!(flags::ALL_SOLAR & flags::ANNULAR_TOTAL, 0);
        assert_eq!(flags::ALL_SOLAR & flags::PENUMBRAL, 0);
        assert_ne!(flags::ALL_LUNAR & flags::PENUMBRAL, 0);
        assert_eq!(flags::ALL_LUNAR & flags::ANNULAR, 0);
    }

    #[test]
    fn request_matches_flags() {
        let req = EclipseRequest::any(EclipseKind::Lunar);
        assert!(req.matches(flags::TOTAL));
        assert!(!req.matches(flags::ANNULAR));
    }

    #[test]
    fn jd_max_is_first_time() {
        let hit = EclipseHit {
            flags: flags::TOTAL,
            times: vec![2_460_409.26, 2_460_409.2],
            umbral_magnitude: None,
            penumbral_magnitude: None,
        };
        assert_eq!(hit.jd_max(), Some(2_460_409.26));
        let empty = EclipseHit { times: vec![], ..hit };
        assert_eq!(empty.jd_max(), None);
    }
}
