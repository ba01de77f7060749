//! Angle arithmetic on the 360° circle.
//!
//! Every angular error function in the workspace goes through
//! [`shortest_signed_angle`]. Raw subtraction of two longitudes jumps by 360°
//! at the wrap point and sends bisection to the wrong root.

/// Normalize an angle in degrees to `[0, 360)`.
///
/// `rem_euclid` can round a tiny negative input up to exactly 360.0; that
/// case folds back to 0.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Signed difference `a - b` folded into `(-180, 180]`.
pub fn shortest_signed_angle(a: f64, b: f64) -> f64 {
    let d = normalize_360(a - b);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Unsigned angular distance between two longitudes, in `[0, 180]`.
pub fn angular_separation(a: f64, b: f64) -> f64 {
    shortest_signed_angle(a, b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_basic() {
        assert!((normalize_360(370.0) - 10.0).abs() < 1e-12);
        assert!((normalize_360(-10.0) - 350.0).abs() < 1e-12);
        assert_eq!(normalize_360(360.0), 0.0);
        assert_eq!(normalize_360(0.0), 0.0);
    }

    #[test]
    fn normalize_tiny_negative_stays_below_360() {
        let r = normalize_360(-1e-20);
        assert!((0.0..360.0).contains(&r), "got {r}");
    }

    #[test]
    fn signed_across_wrap() {
        assert!((shortest_signed_angle(1.0, 359.0) - 2.0).abs() < 1e-12);
        assert!((shortest_signed_angle(359.0, 1.0) + 2.0).abs() < 1e-12);
    }

    #[test]
    fn signed_half_turn_is_positive() {
        assert_eq!(shortest_signed_angle(180.0, 0.0), 180.0);
        assert_eq!(shortest_signed_angle(0.0, 180.0), 180.0);
    }

    #[test]
    fn separation_symmetric() {
        assert!((angular_separation(10.0, 350.0) - 20.0).abs() < 1e-12);
        assert!((angular_separation(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((angular_separation(0.0, 180.0) - 180.0).abs() < 1e-12);
    }
}
