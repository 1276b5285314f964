//! Location model for geographic coordinates

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};

/// Query coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both axes differ by at most `tolerance_degrees`
    #[must_use]
    pub fn is_within(&self, other: &Coordinates, tolerance_degrees: f64) -> bool {
        (self.latitude - other.latitude).abs() <= tolerance_degrees
            && (self.longitude - other.longitude).abs() <= tolerance_degrees
    }

    /// Great-circle distance in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        distance(self.into(), other.into(), Units::Kilometers)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl From<&Coordinates> for HaversineLocation {
    fn from(value: &Coordinates) -> Self {
        HaversineLocation {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}
