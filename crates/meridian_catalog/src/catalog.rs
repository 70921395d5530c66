use std::{
    collections::HashSet,
    path::Path,
    sync::{Arc, LazyLock},
    time::Duration,
};

use meridian_routing::coordinate::Coordinate;
use thiserror::Error;
use tracing::debug;

use crate::{
    location_search::{LocationSearch, LookupFailure},
    location_suggestion::LocationSuggestion,
};

pub const DEFAULT_SEARCH_LATENCY: Duration = Duration::from_millis(300);

static BUILTIN_LOCATIONS: LazyLock<Arc<[LocationSuggestion]>> = LazyLock::new(|| {
    [
        ("1", "Downtown Plaza", "123 Main St, Downtown", 40.7128, -74.0060),
        ("2", "Central Park", "Central Park, Midtown", 40.7829, -73.9654),
        ("3", "Times Square", "Times Square, Midtown", 40.7580, -73.9855),
        ("4", "Grand Central", "42 E 42nd St, Midtown", 40.7527, -73.9772),
        ("5", "Brooklyn Bridge", "Brooklyn Bridge, Brooklyn", 40.7061, -73.9969),
        ("6", "Statue of Liberty", "Liberty Island, NY", 40.6892, -74.0445),
        ("7", "Empire State Building", "350 5th Ave, Midtown", 40.7484, -73.9857),
        ("8", "One World Trade", "285 Fulton St, Lower Manhattan", 40.7126, -74.0129),
    ]
    .into_iter()
    .map(|(id, name, address, lat, lng)| {
        LocationSuggestion::new(id, name, address, Coordinate::new(lat, lng))
    })
    .collect()
});

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Duplicate location id: {0}")]
    DuplicateId(String),

    #[error("Location {id} has an invalid coordinate {coordinate}")]
    InvalidCoordinate { id: String, coordinate: Coordinate },
}

/// Read-only table of named locations with a simulated lookup delay.
#[derive(Clone)]
pub struct LocationCatalog {
    locations: Arc<[LocationSuggestion]>,
    latency: Duration,
}

impl Default for LocationCatalog {
    fn default() -> Self {
        Self {
            locations: BUILTIN_LOCATIONS.clone(),
            latency: DEFAULT_SEARCH_LATENCY,
        }
    }
}

impl LocationCatalog {
    pub fn from_locations(locations: Vec<LocationSuggestion>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::with_capacity(locations.len());

        for location in &locations {
            if !location.coordinate.is_valid() {
                return Err(CatalogError::InvalidCoordinate {
                    id: location.id.clone(),
                    coordinate: location.coordinate,
                });
            }
            if !ids.insert(location.id.as_str()) {
                return Err(CatalogError::DuplicateId(location.id.clone()));
            }
        }

        Ok(Self {
            locations: locations.into(),
            latency: DEFAULT_SEARCH_LATENCY,
        })
    }

    /// Loads a JSON array of locations.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        let locations: Vec<LocationSuggestion> = serde_json::from_reader(file)?;

        Self::from_locations(locations)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn locations(&self) -> &[LocationSuggestion] {
        &self.locations
    }

    pub fn find_by_id(&self, id: &str) -> Option<&LocationSuggestion> {
        self.locations.iter().find(|location| location.id == id)
    }

    /// Filters the table without the simulated delay, keeping catalog order.
    pub fn filter(&self, query: &str) -> Vec<LocationSuggestion> {
        if query.is_empty() {
            return Vec::new();
        }

        let query = query.to_lowercase();
        self.locations
            .iter()
            .filter(|location| location.matches(&query))
            .cloned()
            .collect()
    }
}

impl LocationSearch for LocationCatalog {
    async fn search(&self, query: &str) -> Result<Vec<LocationSuggestion>, LookupFailure> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        debug!("LocationCatalog: searching {:?}", query);
        tokio::time::sleep(self.latency).await;

        Ok(self.filter(query))
    }
}
