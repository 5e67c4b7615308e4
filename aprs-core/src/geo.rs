//! Great-circle geometry between decoded positions.
//!
//! Spherical-earth math: haversine distance, initial bearing, and 8-point
//! compass quantization. Accuracy is sub-percent against ellipsoidal models
//! at typical APRS ranges.

/// Mean earth radius in kilometers, as used by the classic APRS tooling.
pub const EARTH_RADIUS_KM: f64 = 6366.71;

/// Compass labels clockwise from north, 45 degrees per sector.
pub const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Great-circle distance in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Initial great-circle bearing from point 1 to point 2, in [0, 360).
pub fn initial_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Quantize a bearing to the nearest compass point.
///
/// Sector boundaries sit at 22.5 degrees mod 45; a bearing exactly on a
/// boundary lands in the higher-index sector.
pub fn compass_point(bearing_deg: f64) -> &'static str {
    COMPASS_POINTS[(((bearing_deg + 22.5) / 45.0).floor() as usize) % 8]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let d = haversine_km(60.2, 5.4, 60.2, 5.4);
        assert!(d < 0.001, "Same point should be ~0 km, got {d}");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Bergen to Oslo: ~305 km
        let d = haversine_km(60.3913, 5.3221, 59.9139, 10.7522);
        assert!((280.0..=330.0).contains(&d), "Bergen-Oslo should be ~305 km, got {d}");
    }

    #[test]
    fn test_haversine_symmetry() {
        let d1 = haversine_km(60.3913, 5.3221, 59.9139, 10.7522);
        let d2 = haversine_km(59.9139, 10.7522, 60.3913, 5.3221);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_due_north() {
        let b = initial_bearing_deg(50.0, 10.0, 51.0, 10.0);
        assert!(b.abs() < 0.01, "Due north should be ~0, got {b}");
    }

    #[test]
    fn test_bearing_due_east_on_equator() {
        let b = initial_bearing_deg(0.0, 10.0, 0.0, 11.0);
        assert!((b - 90.0).abs() < 0.01, "Due east should be ~90, got {b}");
    }

    #[test]
    fn test_bearing_range() {
        let b = initial_bearing_deg(51.0, 10.0, 50.0, 9.0);
        assert!((0.0..360.0).contains(&b), "Bearing out of range: {b}");
    }

    #[test]
    fn test_bearing_reciprocity() {
        // Short mid-latitude leg: forward and reverse bearings differ by ~180.
        let fwd = initial_bearing_deg(60.0, 5.0, 60.2, 5.5);
        let rev = initial_bearing_deg(60.2, 5.5, 60.0, 5.0);
        let diff = (fwd - rev).rem_euclid(360.0);
        assert!((diff - 180.0).abs() < 1.0, "Expected ~180 apart, got {diff}");
    }

    #[test]
    fn test_compass_cardinal_centers() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(45.0), "NE");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(135.0), "SE");
        assert_eq!(compass_point(180.0), "S");
        assert_eq!(compass_point(225.0), "SW");
        assert_eq!(compass_point(270.0), "W");
        assert_eq!(compass_point(315.0), "NW");
    }

    #[test]
    fn test_compass_boundaries_round_up() {
        // Exactly on a boundary lands in the higher-index sector.
        assert_eq!(compass_point(22.5), "NE");
        assert_eq!(compass_point(22.499), "N");
        assert_eq!(compass_point(67.5), "E");
        assert_eq!(compass_point(337.5), "N");
        assert_eq!(compass_point(337.499), "NW");
    }

    #[test]
    fn test_compass_wraps_near_360() {
        assert_eq!(compass_point(359.9), "N");
    }

    #[test]
    fn test_compass_partitions_evenly() {
        // Eight equal 45-degree sectors over [0, 360).
        let mut counts = std::collections::HashMap::new();
        let mut deg = 0.0;
        while deg < 360.0 {
            *counts.entry(compass_point(deg)).or_insert(0u32) += 1;
            deg += 0.25;
        }
        assert_eq!(counts.len(), 8);
        for (label, count) in counts {
            assert_eq!(count, 180, "Sector {label} should span 45 degrees");
        }
    }
}
