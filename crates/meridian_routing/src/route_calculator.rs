use std::{f64::consts::PI, time::Duration};

use tracing::debug;

use crate::{
    coordinate::Coordinate,
    kmh::Kmh,
    route::Route,
    route_provider::{ComputationFailure, RouteProvider},
};

pub const DEFAULT_PATH_STEPS: usize = 50;
pub const DEFAULT_AVERAGE_SPEED: Kmh = Kmh::new(40.0);
pub const DEFAULT_ROUTE_LATENCY: Duration = Duration::from_millis(500);

/// Lateral offset in degrees at the middle of the path.
pub const CURVATURE_DEGREES: f64 = 0.0002;

#[derive(Debug, Clone)]
pub struct RouteCalculatorParams {
    /// Simulated backend round trip
    pub latency: Duration,
    pub average_speed: Kmh,
    pub path_steps: usize,
}

impl Default for RouteCalculatorParams {
    fn default() -> Self {
        Self {
            latency: DEFAULT_ROUTE_LATENCY,
            average_speed: DEFAULT_AVERAGE_SPEED,
            path_steps: DEFAULT_PATH_STEPS,
        }
    }
}

#[derive(Default)]
pub struct RouteCalculator {
    params: RouteCalculatorParams,
}

impl RouteCalculator {
    pub fn new(params: RouteCalculatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RouteCalculatorParams {
        &self.params
    }

    /// Computes the route synchronously.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is not finite.
    pub fn calculate(&self, start: Coordinate, end: Coordinate) -> Route {
        assert_finite(&start, &end);

        let distance = start.haversine_distance(&end);

        Route {
            start,
            end,
            path: interpolate_path(start, end, self.params.path_steps),
            distance,
            duration_minutes: distance.travel_minutes(self.params.average_speed),
        }
    }
}

impl RouteProvider for RouteCalculator {
    async fn compute(&self, start: Coordinate, end: Coordinate) -> Result<Route, ComputationFailure> {
        assert_finite(&start, &end);

        debug!("RouteCalculator: computing route {} -> {}", start, end);
        tokio::time::sleep(self.params.latency).await;

        Ok(self.calculate(start, end))
    }
}

fn assert_finite(start: &Coordinate, end: &Coordinate) {
    assert!(
        start.is_finite() && end.is_finite(),
        "route endpoints must be finite, got {:?} -> {:?}",
        start,
        end
    );
}

/// Straight-line interpolation with a slight arc on the latitude, `steps + 1` points.
pub fn interpolate_path(start: Coordinate, end: Coordinate, steps: usize) -> Vec<Coordinate> {
    let steps = steps.max(1);
    let mut points = Vec::with_capacity(steps + 1);

    for i in 0..=steps {
        let fraction = i as f64 / steps as f64;
        let lat = start.lat + (end.lat - start.lat) * fraction;
        let lng = start.lng + (end.lng - start.lng) * fraction;
        let curve = (fraction * PI).sin() * CURVATURE_DEGREES;

        points.push(Coordinate::new(lat + curve, lng));
    }

    // sin(PI) and the lerp both leave rounding residue at the far end.
    points[0] = start;
    points[steps] = end;

    points
}
