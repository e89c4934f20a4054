//! Great-circle distance and its display form.

/// Mean Earth radius used by [`calculate_distance`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two points given in degrees.
#[must_use]
pub fn calculate_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Formats a distance in kilometers: whole meters below 1 km, whole
/// kilometers otherwise.
#[must_use]
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{:.0} m", (distance_km * 1000.0).round())
    } else {
        format!("{:.0} km", distance_km.round())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_distance_uses_meters_below_one_km() {
        assert_eq!(format_distance(0.1), "100 m");
        assert_eq!(format_distance(0.5), "500 m");
        assert_eq!(format_distance(0.99), "990 m");
    }

    #[test]
    fn format_distance_rounds_whole_kilometers() {
        assert_eq!(format_distance(1.0), "1 km");
        assert_eq!(format_distance(1.4), "1 km");
        assert_eq!(format_distance(1.6), "2 km");
        assert_eq!(format_distance(2.5), "3 km");
        assert_eq!(format_distance(10.7), "11 km");
    }

    #[test]
    fn new_york_to_los_angeles() {
        let d = calculate_distance(40.7128, -74.0060, 34.0522, -118.2437);
        assert!((d - 3936.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn same_point_is_zero() {
        assert!(calculate_distance(10.0, 20.0, 10.0, 20.0).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = calculate_distance(38.9072, -77.0369, 41.8781, -87.6298);
        let back = calculate_distance(41.8781, -87.6298, 38.9072, -77.0369);
        assert!((there - back).abs() < 1e-9);
    }
}
