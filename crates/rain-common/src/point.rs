//! Monitoring point geometry and attributes.

use serde::{Deserialize, Serialize};

/// A fixed monitoring location with its administrative group code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringPoint {
    /// Longitude in degrees.
    pub x: f64,
    /// Latitude in degrees.
    pub y: f64,
    /// Administrative/organizational group code this point belongs to.
    pub kode_kk: String,
}

impl MonitoringPoint {
    pub fn new(x: f64, y: f64, kode_kk: impl Into<String>) -> Self {
        Self {
            x,
            y,
            kode_kk: kode_kk.into(),
        }
    }
}
