pub mod catalog;
pub mod location_search;
pub mod location_suggestion;
