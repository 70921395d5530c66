use std::fmt::Display;

use meridian_catalog::{location_search::LookupFailure, location_suggestion::LocationSuggestion};
use meridian_routing::{
    coordinate::Coordinate, route::Route, route_provider::ComputationFailure,
};
use thiserror::Error;

/// The two text fields of a session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SearchField {
    Start,
    Destination,
}

impl Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SearchField::Start => "start",
                SearchField::Destination => "destination",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Search for {field} failed: {failure}")]
    Lookup {
        field: SearchField,
        failure: LookupFailure,
    },

    #[error("Route computation failed: {0}")]
    Computation(#[from] ComputationFailure),
}

impl SessionError {
    pub fn is_lookup(&self, of: SearchField) -> bool {
        matches!(self, SessionError::Lookup { field, .. } if *field == of)
    }

    pub fn is_computation(&self) -> bool {
        matches!(self, SessionError::Computation(_))
    }
}

/// Snapshot of everything a session exposes to its observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub start_query: String,
    pub destination_query: String,
    pub start_suggestions: Vec<LocationSuggestion>,
    pub destination_suggestions: Vec<LocationSuggestion>,
    pub selected_start: Option<LocationSuggestion>,
    pub selected_destination: Option<LocationSuggestion>,
    pub route: Option<Route>,
    pub is_loading: bool,
    pub marker_position: Option<Coordinate>,
    pub is_animating: bool,

    /// Last failure of a search or route computation
    pub error: Option<SessionError>,
}

impl SessionState {
    pub fn query(&self, field: SearchField) -> &str {
        match field {
            SearchField::Start => &self.start_query,
            SearchField::Destination => &self.destination_query,
        }
    }

    pub fn suggestions(&self, field: SearchField) -> &[LocationSuggestion] {
        match field {
            SearchField::Start => &self.start_suggestions,
            SearchField::Destination => &self.destination_suggestions,
        }
    }

    pub fn selection(&self, field: SearchField) -> Option<&LocationSuggestion> {
        match field {
            SearchField::Start => self.selected_start.as_ref(),
            SearchField::Destination => self.selected_destination.as_ref(),
        }
    }

    pub fn is_route_ready(&self) -> bool {
        self.route.is_some() && !self.is_loading
    }

    pub(crate) fn query_mut(&mut self, field: SearchField) -> &mut String {
        match field {
            SearchField::Start => &mut self.start_query,
            SearchField::Destination => &mut self.destination_query,
        }
    }

    pub(crate) fn suggestions_mut(&mut self, field: SearchField) -> &mut Vec<LocationSuggestion> {
        match field {
            SearchField::Start => &mut self.start_suggestions,
            SearchField::Destination => &mut self.destination_suggestions,
        }
    }

    pub(crate) fn selection_mut(&mut self, field: SearchField) -> &mut Option<LocationSuggestion> {
        match field {
            SearchField::Start => &mut self.selected_start,
            SearchField::Destination => &mut self.selected_destination,
        }
    }
}
