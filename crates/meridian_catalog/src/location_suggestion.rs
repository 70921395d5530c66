use meridian_routing::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub id: String,
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
}

impl LocationSuggestion {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            coordinate,
        }
    }

    /// Case-insensitive substring match on the name or the address.
    /// `lowercase_query` must already be lowercased.
    pub fn matches(&self, lowercase_query: &str) -> bool {
        self.name.to_lowercase().contains(lowercase_query)
            || self.address.to_lowercase().contains(lowercase_query)
    }
}
