//! Types for the aspect engine.

use std::fmt;

use horae_core::{AngularPosition, Body};
use serde::{Deserialize, Serialize};

/// The five major (Ptolemaic) aspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectKind {
    pub const ALL: [AspectKind; 5] = [
        AspectKind::Conjunction,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Opposition,
    ];

    /// Exact separation in degrees.
    pub const fn angle(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Opposition => 180.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "conjunction",
            Self::Sextile => "sextile",
            Self::Square => "square",
            Self::Trine => "trine",
            Self::Opposition => "opposition",
        }
    }

    /// Trine or sextile.
    pub const fn is_harmonious(self) -> bool {
        matches!(self, Self::Trine | Self::Sextile)
    }

    /// Square or opposition.
    pub const fn is_hard(self) -> bool {
        matches!(self, Self::Square | Self::Opposition)
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maximum deviation from exact, per aspect kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbTable {
    pub conjunction: f64,
    pub sextile: f64,
    pub square: f64,
    pub trine: f64,
    pub opposition: f64,
}

impl Default for OrbTable {
    fn default() -> Self {
        Self {
            conjunction: 8.0,
            sextile: 5.0,
            square: 6.0,
            trine: 7.0,
            opposition: 8.0,
        }
    }
}

impl OrbTable {
    /// The same orb for every aspect kind.
    pub const fn uniform(orb_deg: f64) -> Self {
        Self {
            conjunction: orb_deg,
            sextile: orb_deg,
            square: orb_deg,
            trine: orb_deg,
            opposition: orb_deg,
        }
    }

    pub fn orb(&self, kind: AspectKind) -> f64 {
        match kind {
            AspectKind::Conjunction => self.conjunction,
            AspectKind::Sextile => self.sextile,
            AspectKind::Square => self.square,
            AspectKind::Trine => self.trine,
            AspectKind::Opposition => self.opposition,
        }
    }

    /// Replace one orb. Non-positive or non-finite values are ignored.
    pub fn with_override(mut self, kind: AspectKind, orb_deg: f64) -> Self {
        if !orb_deg.is_finite() || orb_deg <= 0.0 {
            return self;
        }
        let slot = match kind {
            AspectKind::Conjunction => &mut self.conjunction,
            AspectKind::Sextile => &mut self.sextile,
            AspectKind::Square => &mut self.square,
            AspectKind::Trine => &mut self.trine,
            AspectKind::Opposition => &mut self.opposition,
        };
        *slot = orb_deg;
        self
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        let ok = AspectKind::ALL.iter().all(|&k| {
            let o = self.orb(k);
            o.is_finite() && o > 0.0 && o < 90.0
        });
        if ok {
            Ok(())
        } else {
            Err("orbs must be in (0, 90) degrees")
        }
    }
}

/// A body and its position at the instant under study.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub body: Body,
    #[serde(flatten)]
    pub position: AngularPosition,
}

impl BodyPosition {
    pub fn new(body: Body, position: AngularPosition) -> Self {
        Self { body, position }
    }
}

/// One aspect between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AspectMatch {
    pub body_a: Body,
    pub body_b: Body,
    pub kind: AspectKind,
    /// Unsigned separation, `[0, 180]`.
    pub separation_deg: f64,
    pub orb_deg: f64,
    /// Distance from exact, `|separation - angle|`.
    pub deviation_deg: f64,
    /// `orb - deviation`; larger is tighter.
    pub tightness: f64,
    /// Relative motion is closing the deviation.
    pub applying: bool,
}

/// Count of harmonious vs. hard aspects in a set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AspectTone {
    pub harmonious: u32,
    pub hard: u32,
}

impl AspectTone {
    /// Harmonious minus hard.
    pub fn net(&self) -> i64 {
        i64::from(self.harmonious) - i64::from(self.hard)
    }
}

/// Aspect tone of the sky at one sample of a transit series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergySample {
    pub jd: f64,
    pub aspects: usize,
    #[serde(flatten)]
    pub tone: AspectTone,
}
