use serde::{Deserialize, Serialize};

use crate::angle::normalize_360;
use crate::zodiac::ZodiacSign;

/// Ecliptic longitude and its daily rate for one body at one instant.
///
/// `longitude_deg` is always in `[0, 360)`; a negative
/// `speed_deg_per_day` means the body is retrograde.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularPosition {
    pub longitude_deg: f64,
    pub speed_deg_per_day: f64,
}

impl AngularPosition {
    /// Build a position, normalizing the longitude.
    pub fn new(longitude_deg: f64, speed_deg_per_day: f64) -> Self {
        Self {
            longitude_deg: normalize_360(longitude_deg),
            speed_deg_per_day,
        }
    }

    pub fn is_retrograde(&self) -> bool {
        self.speed_deg_per_day < 0.0
    }

    pub fn sign(&self) -> ZodiacSign {
        ZodiacSign::from_longitude(self.longitude_deg)
    }

    /// Degrees into the current sign, `[0, 30)`.
    pub fn degree_in_sign(&self) -> f64 {
        self.longitude_deg - self.sign().start_longitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes() {
        let p = AngularPosition::new(-30.0, 1.0);
        assert!((p.longitude_deg - 330.0).abs() < 1e-12);
        assert_eq!(p.sign(), ZodiacSign::Pisces);
    }

    #[test]
    fn retrograde_flag() {
        assert!(AngularPosition::new(10.0, -0.2).is_retrograde());
        assert!(!AngularPosition::new(10.0, 0.0).is_retrograde());
    }

    #[test]
    fn degree_in_sign() {
        let p = AngularPosition::new(54.2, 1.0);
        assert_eq!(p.sign(), ZodiacSign::Taurus);
        assert!((p.degree_in_sign() - 24.2).abs() < 1e-9);
    }
}
