pub mod coordinate;
pub mod haversine;
pub mod km;
pub mod kmh;
pub mod route;
pub mod route_calculator;
pub mod route_provider;
