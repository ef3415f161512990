use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_RADIUS_METERS: u32 = 2000;

/// A geocoded point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// One "find <type> near <location>" request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery {
    pub place_type: String,
    pub location_text: String,
    pub radius_meters: u32,
}

impl PlaceQuery {
    pub fn new(place_type: impl Into<String>, location_text: impl Into<String>) -> Self {
        Self {
            place_type: place_type.into(),
            location_text: location_text.into(),
            radius_meters: DEFAULT_RADIUS_METERS,
        }
    }

    pub fn with_radius(mut self, radius_meters: u32) -> Self {
        self.radius_meters = radius_meters;
        self
    }
}
