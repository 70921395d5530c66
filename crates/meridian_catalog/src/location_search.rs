use std::future::Future;

use thiserror::Error;

use crate::location_suggestion::LocationSuggestion;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupFailure {
    #[error("Geocoding backend unavailable: {0}")]
    Unavailable(String),

    #[error("Query rejected: {0}")]
    InvalidQuery(String),
}

/// Source of location suggestions for a free-text query.
pub trait LocationSearch: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<LocationSuggestion>, LookupFailure>> + Send;
}
