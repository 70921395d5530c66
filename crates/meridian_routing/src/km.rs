use std::{
    fmt::Display,
    ops::{Add, Div},
};

use serde::{Deserialize, Serialize};

use crate::kmh::Kmh;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Km(f64);

impl Km {
    pub const ZERO: Km = Km(0.0);

    pub const fn new(value: f64) -> Self {
        Km(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Whole minutes needed to cover this distance at `speed`, rounded to the nearest minute.
    pub fn travel_minutes(self, speed: Kmh) -> i64 {
        (self.0 / speed.value() * 60.0).round() as i64
    }
}

impl Display for Km {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} km", self.0)
    }
}

impl From<f64> for Km {
    fn from(value: f64) -> Self {
        Km::new(value)
    }
}

impl Add for Km {
    type Output = Km;

    fn add(self, other: Km) -> Km {
        Km(self.0 + other.0)
    }
}

impl Div<Kmh> for Km {
    type Output = f64;

    /// Travel time in hours.
    fn div(self, speed: Kmh) -> f64 {
        self.0 / speed.value()
    }
}
