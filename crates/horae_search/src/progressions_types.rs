//! Types for secondary progressions and solar arc directions.

use horae_core::{Body, ZodiacSign};
use serde::{Deserialize, Serialize};

use crate::aspect_types::{AspectMatch, BodyPosition};
use crate::lunar_phase_types::LunarOctant;

/// Longest span of ages a progressed Moon cycle may cover.
pub const MAX_PROGRESSED_AGE_SPAN: u32 = 120;

/// Configuration for [`crate::secondary_progressions`] and
/// [`crate::solar_arc_directions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub bodies: Vec<Body>,
    /// Orb for progressed-to-natal aspects, the same for every kind.
    pub aspect_orb_deg: f64,
    /// Deviation below which a progressed aspect counts as exact.
    pub exact_within_deg: f64,
    /// Elongation from the progressed Sun that marks a progressed New Moon.
    pub new_moon_orb_deg: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            bodies: Body::PLANETS.to_vec(),
            aspect_orb_deg: 1.0,
            exact_within_deg: 0.5,
            new_moon_orb_deg: 3.0,
        }
    }
}

impl ProgressionConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.bodies.is_empty() {
            return Err("bodies must not be empty");
        }
        if !self.aspect_orb_deg.is_finite()
            || self.aspect_orb_deg <= 0.0
            || self.aspect_orb_deg >= 90.0
        {
            return Err("aspect_orb_deg must be in (0, 90)");
        }
        if !self.exact_within_deg.is_finite()
            || self.exact_within_deg < 0.0
            || self.exact_within_deg > self.aspect_orb_deg
        {
            return Err("exact_within_deg must be in [0, aspect_orb_deg]");
        }
        if !self.new_moon_orb_deg.is_finite()
            || self.new_moon_orb_deg <= 0.0
            || self.new_moon_orb_deg >= 45.0
        {
            return Err("new_moon_orb_deg must be in (0, 45)");
        }
        Ok(())
    }
}

/// A progressed body in aspect to a natal body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressedAspect {
    /// `body_a` is progressed, `body_b` natal.
    #[serde(flatten)]
    pub aspect: AspectMatch,
    pub exact: bool,
}

/// A notable configuration of the progressed chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressionHighlight {
    /// Progressed Moon within a degree of a sign boundary.
    MoonIngress { sign: ZodiacSign, degree_in_sign: f64 },
    /// Progressed Sun in the first degree of a sign.
    SunIngress { sign: ZodiacSign },
    /// Progressed Moon conjunct the progressed Sun.
    NewMoon { separation_deg: f64 },
}

/// Secondary progressed chart: one day after birth for each year of life.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressedChart {
    pub natal_jd: f64,
    pub target_jd: f64,
    pub age_years: f64,
    /// Instant whose sky is read as the progressed chart.
    pub progressed_jd: f64,
    pub positions: Vec<BodyPosition>,
    /// Tightest first.
    pub aspects_to_natal: Vec<ProgressedAspect>,
    pub highlights: Vec<ProgressionHighlight>,
}

impl ProgressedChart {
    pub fn position(&self, body: Body) -> Option<&BodyPosition> {
        self.positions.iter().find(|p| p.body == body)
    }
}

/// A natal body moved forward by the solar arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectedPosition {
    pub body: Body,
    pub natal_longitude_deg: f64,
    pub directed_longitude_deg: f64,
    pub natal_sign: ZodiacSign,
    pub directed_sign: ZodiacSign,
}

impl DirectedPosition {
    pub fn changed_sign(&self) -> bool {
        self.natal_sign != self.directed_sign
    }
}

/// Solar arc directed chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarArcChart {
    pub natal_jd: f64,
    pub target_jd: f64,
    pub age_years: f64,
    /// Progressed Sun minus natal Sun, `[0, 360)`.
    pub arc_deg: f64,
    pub positions: Vec<DirectedPosition>,
}

/// Progressed lunar phase at one whole age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressedMoonPhase {
    pub age: u32,
    pub target_jd: f64,
    pub progressed_jd: f64,
    /// Progressed Moon minus progressed Sun, `[0, 360)`.
    pub elongation_deg: f64,
    pub octant: LunarOctant,
    pub moon_sign: ZodiacSign,
}

/// Octant change between two consecutive ages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressedPhaseChange {
    /// First age in the new octant.
    pub age: u32,
    pub from: LunarOctant,
    pub to: LunarOctant,
}

/// Progressed lunation cycle sampled once per year of life.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressedMoonCycle {
    pub phases: Vec<ProgressedMoonPhase>,
    pub changes: Vec<ProgressedPhaseChange>,
}

impl ProgressedMoonCycle {
    /// Phase at the last age sampled.
    pub fn current(&self) -> Option<&ProgressedMoonPhase> {
        self.phases.last()
    }
}
