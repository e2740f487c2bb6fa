use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A point in degrees.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn lat(&self) -> f64 {
        self.latitude
    }

    pub fn lon(&self) -> f64 {
        self.longitude
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<&Location> for geo_types::Point<f64> {
    fn from(location: &Location) -> Self {
        geo_types::Point::new(location.longitude, location.latitude)
    }
}

impl From<Location> for geo_types::Point<f64> {
    fn from(location: Location) -> Self {
        (&location).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_is_lon_lat() {
        let point: geo_types::Point = Location::new(40.7128, -74.0060).into();
        assert_eq!(point.x(), -74.0060);
        assert_eq!(point.y(), 40.7128);
    }

    #[test]
    fn test_is_valid() {
        assert!(Location::new(40.0, -74.0).is_valid());
        assert!(!Location::new(91.0, 0.0).is_valid());
        assert!(!Location::new(0.0, f64::INFINITY).is_valid());
    }
}
