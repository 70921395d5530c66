use std::future::Future;

use thiserror::Error;

use crate::{coordinate::Coordinate, route::Route};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationFailure {
    #[error("Routing backend unavailable: {0}")]
    Unavailable(String),

    #[error("No route between {start} and {end}")]
    NoRoute { start: Coordinate, end: Coordinate },
}

/// Anything able to turn two coordinates into a route.
///
/// The bundled [`RouteCalculator`](crate::route_calculator::RouteCalculator) never fails,
/// a remote backend may.
pub trait RouteProvider: Send + Sync + 'static {
    fn compute(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> impl Future<Output = Result<Route, ComputationFailure>> + Send;
}
