use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Geographic point expressed in floating-point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Build a validated coordinate.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let coordinate = Self { lat, lng };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check the range invariants. Deserialised values bypass [`Coordinate::new`],
    /// so request boundaries call this explicitly.
    pub fn validate(&self) -> Result<()> {
        let reason = if !self.lat.is_finite() || !self.lng.is_finite() {
            Some("coordinates must be finite")
        } else if !(-90.0..=90.0).contains(&self.lat) {
            Some("latitude must be within [-90, 90]")
        } else if !(-180.0..=180.0).contains(&self.lng) {
            Some("longitude must be within [-180, 180]")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Linear interpolation in degree space; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(&self, other: &Coordinate, t: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }

    /// Initial great-circle bearing towards `other`, in degrees within `[0, 360)`.
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let dlambda = (other.lng - self.lng).to_radians();

        let y = dlambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();

        y.atan2(x).to_degrees().rem_euclid(360.0)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.1).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn deserialised_values_are_checked_by_validate() {
        let coordinate: Coordinate = serde_json::from_str(r#"{"lat":123.0,"lng":5.0}"#).unwrap();
        let error = coordinate.validate().unwrap_err();
        assert!(error.to_string().contains("latitude"));
    }

    #[test]
    fn lerp_hits_both_ends_and_midpoint() {
        let a = Coordinate::new(37.0, 127.0).unwrap();
        let b = Coordinate::new(38.0, 129.0).unwrap();
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.lat - 37.5).abs() < 1e-12);
        assert!((mid.lng - 128.0).abs() < 1e-12);
    }

    #[test]
    fn bearing_points_along_cardinal_directions() {
        let origin = Coordinate::new(0.0, 0.0).unwrap();
        let north = Coordinate::new(1.0, 0.0).unwrap();
        let east = Coordinate::new(0.0, 1.0).unwrap();
        let south = Coordinate::new(-1.0, 0.0).unwrap();
        let west = Coordinate::new(0.0, -1.0).unwrap();

        assert!(origin.bearing_to(&north).abs() < 1e-9);
        assert!((origin.bearing_to(&east) - 90.0).abs() < 1e-9);
        assert!((origin.bearing_to(&south) - 180.0).abs() < 1e-9);
        assert!((origin.bearing_to(&west) - 270.0).abs() < 1e-9);
    }
}
