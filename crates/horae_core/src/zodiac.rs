//! The twelve 30° tropical zodiac signs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::angle::normalize_360;

/// Zodiac sign, index 0 (Aries) through 11 (Pisces).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// Classical element of a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Earth => "earth",
            Self::Air => "air",
            Self::Water => "water",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Width of one sign in degrees.
pub const SIGN_WIDTH_DEG: f64 = 30.0;

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign index 0..=11.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Sign for an index; wraps modulo 12.
    pub const fn from_index(index: u8) -> Self {
        Self::ALL[(index % 12) as usize]
    }

    /// Sign containing an ecliptic longitude (any real value).
    pub fn from_longitude(lon_deg: f64) -> Self {
        let idx = (normalize_360(lon_deg) / SIGN_WIDTH_DEG).floor() as u8;
        Self::from_index(idx.min(11))
    }

    /// The sign 180° away.
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 6)
    }

    /// The following sign in zodiacal order.
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Fire, earth, air, water, repeating from Aries.
    pub const fn element(self) -> Element {
        Element::ALL[(self.index() % 4) as usize]
    }

    /// Longitude where the sign begins.
    pub fn start_longitude(self) -> f64 {
        self.index() as f64 * SIGN_WIDTH_DEG
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_longitude_boundaries() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(29.999), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(30.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude(359.999), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(-1.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(725.0), ZodiacSign::Aries);
    }

    #[test]
    fn opposite_is_six_signs_away() {
        assert_eq!(ZodiacSign::Aries.opposite(), ZodiacSign::Libra);
        assert_eq!(ZodiacSign::Virgo.opposite(), ZodiacSign::Pisces);
        for sign in ZodiacSign::ALL {
            assert_eq!(sign.opposite().opposite(), sign);
        }
    }

    #[test]
    fn elements_cycle_from_aries() {
        assert_eq!(ZodiacSign::Aries.element(), Element::Fire);
        assert_eq!(ZodiacSign::Virgo.element(), Element::Earth);
        assert_eq!(ZodiacSign::Aquarius.element(), Element::Air);
        assert_eq!(ZodiacSign::Pisces.element(), Element::Water);
        for sign in ZodiacSign::ALL {
            // Signs a trine apart share an element.
            assert_eq!(sign.element(), ZodiacSign::from_index(sign.index() + 4).element());
        }
    }

    #[test]
    fn next_wraps() {
        assert_eq!(ZodiacSign::Pisces.next(), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::Leo.next(), ZodiacSign::Virgo);
    }

    #[test]
    fn index_roundtrip() {
        for (i, sign) in ZodiacSign::ALL.iter().enumerate() {
            assert_eq!(sign.index() as usize, i);
            assert_eq!(ZodiacSign::from_index(i as u8), *sign);
        }
        assert_eq!(ZodiacSign::from_index(12), ZodiacSign::Aries);
    }

    #[test]
    fn start_longitude_values() {
        assert_eq!(ZodiacSign::Aries.start_longitude(), 0.0);
        assert_eq!(ZodiacSign::Cancer.start_longitude(), 90.0);
        assert_eq!(ZodiacSign::Pisces.start_longitude(), 330.0);
    }
}
