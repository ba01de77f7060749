//! Types for electional scoring.

use horae_core::Body;
use serde::{Deserialize, Serialize};

use crate::aspect_types::OrbTable;
use crate::dignity::{DignityKind, EssentialDignity};
use crate::lunar_phase_types::LunarPhase;
use crate::void_of_course_types::VocConfig;

/// Default candidate spacing: 15 minutes.
pub const DEFAULT_ELECTIONAL_STEP_DAYS: f64 = 1.0 / 96.0;

/// Score contributions of each rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionalWeights {
    pub phase_new: f64,
    pub phase_waxing: f64,
    pub phase_first_quarter: f64,
    pub phase_full: f64,
    pub phase_waning: f64,
    pub phase_last_quarter: f64,
    pub domicile: f64,
    pub exaltation: f64,
    pub detriment: f64,
    pub fall: f64,
    /// Per trine or sextile involving Venus or Jupiter.
    pub benefic_aspect: f64,
    pub mercury_retrograde: f64,
    pub moon_void_of_course: f64,
}

impl Default for ElectionalWeights {
    fn default() -> Self {
        Self {
            phase_new: -1.0,
            phase_waxing: 1.0,
            phase_first_quarter: 0.5,
            phase_full: 0.0,
            phase_waning: -0.5,
            phase_last_quarter: -0.5,
            domicile: 2.0,
            exaltation: 1.5,
            detriment: -1.5,
            fall: -1.0,
            benefic_aspect: 1.0,
            mercury_retrograde: -3.0,
            moon_void_of_course: -4.0,
        }
    }
}

impl ElectionalWeights {
    pub fn phase(&self, phase: LunarPhase) -> f64 {
        match phase {
            LunarPhase::New => self.phase_new,
            LunarPhase::Waxing => self.phase_waxing,
            LunarPhase::FirstQuarter => self.phase_first_quarter,
            LunarPhase::Full => self.phase_full,
            LunarPhase::Waning => self.phase_waning,
            LunarPhase::LastQuarter => self.phase_last_quarter,
        }
    }

    pub fn weight(&self, kind: DignityKind) -> f64 {
        match kind {
            DignityKind::Domicile => self.domicile,
            DignityKind::Exaltation => self.exaltation,
            DignityKind::Detriment => self.detriment,
            DignityKind::Fall => self.fall,
        }
    }

    /// Sum of the weights of every flag set in `dignity`.
    pub fn dignity(&self, dignity: EssentialDignity) -> f64 {
        dignity.kinds().map(|k| self.weight(k)).sum()
    }
}

/// Configuration for [`crate::search_electional`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionalConfig {
    pub step_days: f64,
    pub avoid_mercury_retrograde: bool,
    pub avoid_moon_void_of_course: bool,
    pub max_results: usize,
    /// Bodies whose mutual aspects are checked for benefic contacts.
    pub bodies: Vec<Body>,
    pub orbs: OrbTable,
    pub weights: ElectionalWeights,
    pub voc: VocConfig,
}

impl Default for ElectionalConfig {
    fn default() -> Self {
        Self {
            step_days: DEFAULT_ELECTIONAL_STEP_DAYS,
            avoid_mercury_retrograde: true,
            avoid_moon_void_of_course: true,
            max_results: 50,
            bodies: Body::PLANETS.to_vec(),
            orbs: OrbTable::default(),
            weights: ElectionalWeights::default(),
            voc: VocConfig::default(),
        }
    }
}

impl ElectionalConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if self.max_results == 0 {
            return Err("max_results must be > 0");
        }
        self.orbs.validate()?;
        if self.avoid_moon_void_of_course {
            self.voc.validate()?;
        }
        Ok(())
    }
}

/// Score of one candidate instant.
///
/// `reasons` holds one tag per rule that fired, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectionalScore {
    pub jd: f64,
    pub score: f64,
    pub reasons: Vec<String>,
}
