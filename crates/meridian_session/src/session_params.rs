use std::time::Duration;

use meridian_catalog::catalog::DEFAULT_SEARCH_LATENCY;
use meridian_routing::{
    kmh::Kmh,
    route_calculator::{
        DEFAULT_AVERAGE_SPEED, DEFAULT_PATH_STEPS, DEFAULT_ROUTE_LATENCY, RouteCalculatorParams,
    },
};
use thiserror::Error;

use crate::animation::DEFAULT_ANIMATION_DURATION;

pub const SEARCH_LATENCY_ENV_VAR: &str = "MERIDIAN_SEARCH_LATENCY_MS";
pub const ROUTE_LATENCY_ENV_VAR: &str = "MERIDIAN_ROUTE_LATENCY_MS";
pub const ANIMATION_DURATION_ENV_VAR: &str = "MERIDIAN_ANIMATION_MS";

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct SessionParams {
    pub search_latency: Duration,
    pub route_latency: Duration,

    /// Length of a full marker playback, whatever the number of points
    pub animation_duration: Duration,
    pub average_speed: Kmh,
    pub path_steps: usize,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            search_latency: DEFAULT_SEARCH_LATENCY,
            route_latency: DEFAULT_ROUTE_LATENCY,
            animation_duration: DEFAULT_ANIMATION_DURATION,
            average_speed: DEFAULT_AVERAGE_SPEED,
            path_steps: DEFAULT_PATH_STEPS,
        }
    }
}

impl SessionParams {
    /// Defaults overridden by the `MERIDIAN_*_MS` environment variables.
    pub fn from_env() -> Result<Self, ParamsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ParamsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut params = Self::default();

        if let Some(latency) = parse_millis(SEARCH_LATENCY_ENV_VAR, &lookup)? {
            params.search_latency = latency;
        }
        if let Some(latency) = parse_millis(ROUTE_LATENCY_ENV_VAR, &lookup)? {
            params.route_latency = latency;
        }
        if let Some(duration) = parse_millis(ANIMATION_DURATION_ENV_VAR, &lookup)? {
            params.animation_duration = duration;
        }

        Ok(params)
    }

    pub fn route_calculator_params(&self) -> RouteCalculatorParams {
        RouteCalculatorParams {
            latency: self.route_latency,
            average_speed: self.average_speed,
            path_steps: self.path_steps,
        }
    }
}

fn parse_millis<F>(name: &'static str, lookup: &F) -> Result<Option<Duration>, ParamsError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|millis| Some(Duration::from_millis(millis)))
            .map_err(|_| ParamsError::InvalidValue { name, value }),
    }
}
