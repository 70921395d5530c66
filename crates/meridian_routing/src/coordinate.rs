use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{haversine::haversine_distance, km::Km};

/// A WGS84 position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.is_finite() && (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn haversine_distance(&self, other: &Coordinate) -> Km {
        haversine_distance(self, other)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

impl From<Coordinate> for geo_types::Point {
    fn from(coordinate: Coordinate) -> Self {
        geo_types::Point::new(coordinate.lng, coordinate.lat)
    }
}

impl From<&Coordinate> for geo_types::Point {
    fn from(coordinate: &Coordinate) -> Self {
        geo_types::Point::new(coordinate.lng, coordinate.lat)
    }
}

impl From<&Coordinate> for geo_types::Coord {
    fn from(coordinate: &Coordinate) -> Self {
        geo_types::Coord {
            x: coordinate.lng,
            y: coordinate.lat,
        }
    }
}

impl From<geo_types::Point> for Coordinate {
    fn from(point: geo_types::Point) -> Self {
        Coordinate::new(point.y(), point.x())
    }
}
