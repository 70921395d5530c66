use serde::{Deserialize, Serialize};

use crate::{coordinate::Coordinate, km::Km};

/// A computed route with its display path and travel estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub start: Coordinate,
    pub end: Coordinate,

    /// Points to draw, `path[0] == start` and `path[last] == end`
    pub path: Vec<Coordinate>,

    /// Unrounded great-circle distance
    pub distance: Km,
    pub duration_minutes: i64,
}

impl Route {
    pub fn distance_km(&self) -> f64 {
        self.distance.value()
    }

    pub fn display_distance(&self) -> String {
        self.distance.to_string()
    }

    pub fn display_duration(&self) -> String {
        format!("{} mins", self.duration_minutes)
    }

    pub fn line_string(&self) -> geo_types::LineString {
        self.path
            .iter()
            .map(|c| geo_types::Coord { x: c.lng, y: c.lat })
            .collect()
    }
}
