//! Traditional essential dignities of the seven visible planets.

use std::fmt;

use horae_core::{Body, ZodiacSign};
use serde::Serialize;

/// One kind of essential dignity or debility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DignityKind {
    Domicile,
    Exaltation,
    Detriment,
    Fall,
}

impl DignityKind {
    pub const ALL: [DignityKind; 4] = [
        DignityKind::Domicile,
        DignityKind::Exaltation,
        DignityKind::Detriment,
        DignityKind::Fall,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Domicile => "domicile",
            Self::Exaltation => "exaltation",
            Self::Detriment => "detriment",
            Self::Fall => "fall",
        }
    }
}

impl fmt::Display for DignityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Essential dignity of a body in a sign.
///
/// The flags are independent: Mercury in Virgo is both in domicile and
/// exalted, and in Pisces both in detriment and fall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct EssentialDignity {
    pub domicile: bool,
    pub exaltation: bool,
    pub detriment: bool,
    pub fall: bool,
}

impl EssentialDignity {
    pub fn has(self, kind: DignityKind) -> bool {
        match kind {
            DignityKind::Domicile => self.domicile,
            DignityKind::Exaltation => self.exaltation,
            DignityKind::Detriment => self.detriment,
            DignityKind::Fall => self.fall,
        }
    }

    /// Set flags, in table order.
    pub fn kinds(self) -> impl Iterator<Item = DignityKind> {
        DignityKind::ALL.into_iter().filter(move |&k| self.has(k))
    }

    /// No flag set.
    pub fn is_peregrine(self) -> bool {
        self.kinds().next().is_none()
    }
}

impl fmt::Display for EssentialDignity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.kinds().map(DignityKind::name).collect();
        if names.is_empty() {
            f.write_str("peregrine")
        } else {
            f.write_str(&names.join("+"))
        }
    }
}

/// Signs ruled by `body`. Empty for the outer bodies.
pub fn domiciles(body: Body) -> &'static [ZodiacSign] {
    use ZodiacSign::*;
    match body {
        Body::Sun => &[Leo],
        Body::Moon => &[Cancer],
        Body::Mercury => &[Gemini, Virgo],
        Body::Venus => &[Taurus, Libra],
        Body::Mars => &[Aries, Scorpio],
        Body::Jupiter => &[Sagittarius, Pisces],
        Body::Saturn => &[Capricorn, Aquarius],
        _ => &[],
    }
}

/// Sign of exaltation, if any.
pub fn exaltation(body: Body) -> Option<ZodiacSign> {
    use ZodiacSign::*;
    match body {
        Body::Sun => Some(Aries),
        Body::Moon => Some(Taurus),
        Body::Mercury => Some(Virgo),
        Body::Venus => Some(Pisces),
        Body::Mars => Some(Capricorn),
        Body::Jupiter => Some(Cancer),
        Body::Saturn => Some(Libra),
        _ => None,
    }
}

/// Dignity of `body` in `sign`.
///
/// Detriment is the sign opposite a domicile; fall is opposite exaltation.
/// Outer bodies are always peregrine.
pub fn essential_dignity(body: Body, sign: ZodiacSign) -> EssentialDignity {
    let ruled = domiciles(body);
    let exalted = exaltation(body);
    EssentialDignity {
        domicile: ruled.contains(&sign),
        exaltation: exalted == Some(sign),
        detriment: ruled.iter().any(|s| s.opposite() == sign),
        fall: exalted.is_some_and(|s| s.opposite() == sign),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(kind: DignityKind) -> EssentialDignity {
        let mut d = EssentialDignity::default();
        match kind {
            DignityKind::Domicile => d.domicile = true,
            DignityKind::Exaltation => d.exaltation = true,
            DignityKind::Detriment => d.detriment = true,
            DignityKind::Fall => d.fall = true,
        }
        d
    }

    #[test]
    fn sun_table() {
        assert_eq!(essential_dignity(Body::Sun, ZodiacSign::Leo), only(DignityKind::Domicile));
        assert_eq!(essential_dignity(Body::Sun, ZodiacSign::Aries), only(DignityKind::Exaltation));
        assert_eq!(essential_dignity(Body::Sun, ZodiacSign::Aquarius), only(DignityKind::Detriment));
        assert_eq!(essential_dignity(Body::Sun, ZodiacSign::Libra), only(DignityKind::Fall));
        assert!(essential_dignity(Body::Sun, ZodiacSign::Gemini).is_peregrine());
    }

    #[test]
    fn moon_and_venus() {
        assert_eq!(essential_dignity(Body::Moon, ZodiacSign::Taurus), only(DignityKind::Exaltation));
        assert_eq!(essential_dignity(Body::Moon, ZodiacSign::Capricorn), only(DignityKind::Detriment));
        assert_eq!(essential_dignity(Body::Moon, ZodiacSign::Scorpio), only(DignityKind::Fall));
        assert_eq!(essential_dignity(Body::Venus, ZodiacSign::Libra), only(DignityKind::Domicile));
        assert_eq!(essential_dignity(Body::Venus, ZodiacSign::Virgo), only(DignityKind::Fall));
        assert_eq!(essential_dignity(Body::Venus, ZodiacSign::Aries), only(DignityKind::Detriment));
    }

    #[test]
    fn mercury_keeps_overlapping_flags() {
        let virgo = essential_dignity(Body::Mercury, ZodiacSign::Virgo);
        assert!(virgo.domicile && virgo.exaltation);
        assert!(!virgo.detriment && !virgo.fall);
        assert_eq!(
            virgo.kinds().collect::<Vec<_>>(),
            vec![DignityKind::Domicile, DignityKind::Exaltation]
        );

        let pisces = essential_dignity(Body::Mercury, ZodiacSign::Pisces);
        assert!(pisces.detriment && pisces.fall);
        assert!(!pisces.domicile && !pisces.exaltation);
        assert_eq!(pisces.to_string(), "detriment+fall");
    }

    #[test]
    fn outer_bodies_are_peregrine() {
        for body in [Body::Uranus, Body::Neptune, Body::Pluto, Body::Chiron] {
            for sign in ZodiacSign::ALL {
                assert!(essential_dignity(body, sign).is_peregrine());
            }
        }
        assert_eq!(EssentialDignity::default().to_string(), "peregrine");
    }
}
