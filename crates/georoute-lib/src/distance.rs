//! Great-circle distance used both for edge weights and as the A* heuristic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Unit every weight of a single graph is expressed in. Units are never mixed
/// inside one graph (and therefore inside one search).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Meters,
}

impl DistanceUnit {
    /// Earth radius in this unit.
    pub fn earth_radius(self) -> f64 {
        match self {
            DistanceUnit::Kilometers => EARTH_RADIUS_KM,
            DistanceUnit::Meters => EARTH_RADIUS_M,
        }
    }

    /// Short label used in rendered output.
    pub fn label(self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Meters => "m",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Haversine distance bound to a fixed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DistanceMetric {
    unit: DistanceUnit,
}

impl DistanceMetric {
    pub fn new(unit: DistanceUnit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// Non-negative, symmetric distance; zero for coincident points.
    pub fn distance(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        haversine_distance(a, b, self.unit)
    }
}

/// Haversine great-circle distance between two coordinates.
pub fn haversine_distance(a: &Coordinate, b: &Coordinate, unit: DistanceUnit) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);

    // Rounding can push h marginally above 1 for antipodal points.
    2.0 * unit.earth_radius() * h.clamp(0.0, 1.0).sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).expect("valid coordinate")
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let metric = DistanceMetric::default();
        let points = [
            coord(37.5665, 126.9780),
            coord(35.1796, 129.0756),
            coord(-33.8688, 151.2093),
            coord(51.5074, -0.1278),
        ];

        for a in &points {
            assert_eq!(metric.distance(a, a), 0.0);
            for b in &points {
                assert_eq!(metric.distance(a, b), metric.distance(b, a));
                assert!(metric.distance(a, b) >= 0.0);
            }
        }
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_distance(&coord(0.0, 0.0), &coord(1.0, 0.0), DistanceUnit::Kilometers);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn meters_scale_kilometers_by_a_thousand() {
        let a = coord(37.0, 127.0);
        let b = coord(37.1, 127.1);
        let km = haversine_distance(&a, &b, DistanceUnit::Kilometers);
        let m = haversine_distance(&a, &b, DistanceUnit::Meters);
        assert!((m - km * 1000.0).abs() < 1e-6);
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let d = haversine_distance(&coord(0.0, 0.0), &coord(0.0, 180.0), DistanceUnit::Kilometers);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}
