//! Types for lunar phase classification and lunation search.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Half-width of the New/Quarter/Full buckets, in degrees of elongation.
pub const PHASE_TOLERANCE_DEG: f64 = 10.0;

/// Accepted range for [`LunationEvent::window`] half-widths, in days.
pub const LUNATION_WINDOW_DAYS: std::ops::RangeInclusive<u32> = 1..=10;

/// Coarse phase used for electional scoring.
///
/// The four principal phases cover ±[`PHASE_TOLERANCE_DEG`] around their
/// exact elongation; everything else is waxing or waning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LunarPhase {
    New,
    Waxing,
    FirstQuarter,
    Full,
    Waning,
    LastQuarter,
}

impl LunarPhase {
    /// Classify a Sun-Moon elongation in `[0, 360)`.
    pub fn from_elongation(e: f64) -> Self {
        let near = |target: f64| (e - target).abs() <= PHASE_TOLERANCE_DEG;
        if e <= PHASE_TOLERANCE_DEG || e >= 360.0 - PHASE_TOLERANCE_DEG {
            Self::New
        } else if near(90.0) {
            Self::FirstQuarter
        } else if near(180.0) {
            Self::Full
        } else if near(270.0) {
            Self::LastQuarter
        } else if e < 180.0 {
            Self::Waxing
        } else {
            Self::Waning
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Waxing => "waxing",
            Self::FirstQuarter => "first_quarter",
            Self::Full => "full",
            Self::Waning => "waning",
            Self::LastQuarter => "last_quarter",
        }
    }
}

impl fmt::Display for LunarPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The eight traditional phase names, in 45° buckets starting at New Moon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LunarOctant {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl LunarOctant {
    pub const ALL: [LunarOctant; 8] = [
        LunarOctant::NewMoon,
        LunarOctant::WaxingCrescent,
        LunarOctant::FirstQuarter,
        LunarOctant::WaxingGibbous,
        LunarOctant::FullMoon,
        LunarOctant::WaningGibbous,
        LunarOctant::LastQuarter,
        LunarOctant::WaningCrescent,
    ];

    /// Octant of an elongation in `[0, 360)`.
    pub fn from_elongation(e: f64) -> Self {
        let i = (e / 45.0).floor() as i64;
        Self::ALL[i.rem_euclid(8) as usize]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for LunarOctant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lunar phase at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunarPhaseInfo {
    pub jd: f64,
    /// Moon longitude minus Sun longitude, `[0, 360)`.
    pub elongation_deg: f64,
    pub waxing: bool,
    pub phase: LunarPhase,
    pub octant: LunarOctant,
    /// Illuminated fraction of the disc, percent.
    pub illumination_pct: f64,
}

/// Exact New or Full Moon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LunationKind {
    New,
    Full,
}

impl LunationKind {
    /// Elongation at which this lunation is exact.
    pub const fn elongation(self) -> f64 {
        match self {
            Self::New => 0.0,
            Self::Full => 180.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::New => "new moon",
            Self::Full => "full moon",
        }
    }
}

impl fmt::Display for LunationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A refined New or Full Moon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunationEvent {
    pub jd: f64,
    pub kind: LunationKind,
    pub moon_longitude_deg: f64,
}

impl LunationEvent {
    /// Day-spaced instants from `jd - days` to `jd + days` inclusive.
    ///
    /// `days` must lie in [`LUNATION_WINDOW_DAYS`].
    pub fn window(&self, days: u32) -> Result<Vec<f64>, &'static str> {
        if !LUNATION_WINDOW_DAYS.contains(&days) {
            return Err("window days must be within 1..=10");
        }
        let d = i64::from(days);
        Ok((-d..=d).map(|k| self.jd + k as f64).collect())
    }
}
