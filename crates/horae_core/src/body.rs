//! Bodies whose positions the engine can request from a provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EphemerisError;

/// A body the provider can position on the ecliptic.
///
/// Computed points (nodes, lots, house cusps) are not bodies: the engine
/// only consumes what a provider tabulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
}

impl Body {
    /// Every supported body.
    pub const ALL: [Body; 11] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Chiron,
    ];

    /// The ten classical chart bodies (luminaries and planets, no Chiron).
    pub const PLANETS: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Lowercase identifier used in files, config and CLI arguments.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
            Self::Pluto => "pluto",
            Self::Chiron => "chiron",
        }
    }

    /// Approximate time for the body to come back to the same geocentric
    /// longitude, in Julian years. Used to size return search windows.
    pub const fn approx_period_years(self) -> f64 {
        match self {
            Self::Sun => 1.0,
            Self::Moon => 0.0748,
            Self::Mercury => 1.0,
            Self::Venus => 1.0,
            Self::Mars => 1.881,
            Self::Jupiter => 11.862,
            Self::Saturn => 29.457,
            Self::Uranus => 84.02,
            Self::Neptune => 164.8,
            Self::Pluto => 247.9,
            Self::Chiron => 50.0,
        }
    }

    /// Sun and Moon never station geocentrically.
    pub const fn is_luminary(self) -> bool {
        matches!(self, Self::Sun | Self::Moon)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Body::ALL
            .into_iter()
            .find(|b| b.name() == needle)
            .ok_or_else(|| EphemerisError::Parse(format!("unknown body: {s}")))
    }
}
