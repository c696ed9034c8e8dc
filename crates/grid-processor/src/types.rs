//! Sample types produced by temporal aggregation.

use chrono::{DateTime, Utc};

/// One scattered precipitation sample: position in degrees plus the
/// accumulated value at that position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Longitude in degrees.
    pub x: f64,
    /// Latitude in degrees.
    pub y: f64,
    /// Accumulated precipitation.
    pub value: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }
}

/// The accumulated samples of one calendar day.
#[derive(Debug, Clone)]
pub struct DailySamples {
    /// Representative timestamp: the first rounded timestamp of the
    /// day-group in time-axis order.
    pub timestamp: DateTime<Utc>,
    /// One sample per (lat, lon) grid position.
    pub samples: Vec<Sample>,
}
