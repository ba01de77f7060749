//! Types for eclipse event search.

use std::fmt;

use horae_core::EclipseKind;
use serde::{Deserialize, Serialize};

/// Accepted range for [`EclipseSearchConfig::max_events`].
pub const MAX_EVENTS_RANGE: std::ops::RangeInclusive<usize> = 1..=50;

/// Cursor advance when the provider reports an unusable maximum time.
pub const STALL_ADVANCE_DAYS: f64 = 10.0;

/// Cursor advance past an accepted eclipse.
pub const EVENT_ADVANCE_DAYS: f64 = 1.0;

/// Configuration for [`crate::search_eclipses`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EclipseSearchConfig {
    pub max_events: usize,
    /// Hard cap on provider calls.
    pub guard_iterations: u32,
    /// Attach the provider's raw flag bits to each event.
    pub include_debug_flags: bool,
}

impl Default for EclipseSearchConfig {
    fn default() -> Self {
        Self {
            max_events: 10,
            guard_iterations: 200,
            include_debug_flags: false,
        }
    }
}

impl EclipseSearchConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !MAX_EVENTS_RANGE.contains(&self.max_events) {
            return Err("max_events must be within 1..=50");
        }
        if self.guard_iterations == 0 {
            return Err("guard_iterations must be > 0");
        }
        Ok(())
    }
}

/// Human classification of an eclipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EclipseType {
    Total,
    /// Annular-total.
    Hybrid,
    Annular,
    Partial,
    Penumbral,
}

impl EclipseType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Hybrid => "hybrid",
            Self::Annular => "annular",
            Self::Partial => "partial",
            Self::Penumbral => "penumbral",
        }
    }
}

impl fmt::Display for EclipseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One classified eclipse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EclipseEvent {
    pub kind: EclipseKind,
    pub eclipse_type: EclipseType,
    /// Julian Day of greatest eclipse.
    pub jd_max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_flags: Option<u32>,
}
