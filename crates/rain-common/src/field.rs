//! The 4-D precipitation field read from a forecast file.

use ndarray::Array4;

use crate::error::{RainError, RainResult};

/// Encoding metadata of a CF time axis.
#[derive(Debug, Clone)]
pub struct TimeCoding {
    /// CF units string, e.g. `"hours since 2024-01-15 12:00:00"`.
    pub units: String,
    /// Optional CF calendar attribute; absent means standard Gregorian.
    pub calendar: Option<String>,
}

/// Immutable 4-D precipitation field indexed `(time, level, lat, lon)`.
///
/// Forecast precipitation files carry a single vertical level; the level
/// axis is kept so indices line up with the on-disk variable layout.
#[derive(Debug, Clone)]
pub struct PrecipitationField {
    values: Array4<f64>,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    time_values: Vec<f64>,
    time_coding: TimeCoding,
}

impl PrecipitationField {
    /// Assemble a field, validating that each coordinate array matches the
    /// corresponding value-array axis.
    pub fn new(
        values: Array4<f64>,
        latitudes: Vec<f64>,
        longitudes: Vec<f64>,
        time_values: Vec<f64>,
        time_coding: TimeCoding,
    ) -> RainResult<Self> {
        let shape = values.shape();

        if shape[0] != time_values.len() {
            return Err(RainError::ShapeMismatch {
                axis: "time",
                field_len: shape[0],
                coord_len: time_values.len(),
            });
        }
        if shape[2] != latitudes.len() {
            return Err(RainError::ShapeMismatch {
                axis: "lat",
                field_len: shape[2],
                coord_len: latitudes.len(),
            });
        }
        if shape[3] != longitudes.len() {
            return Err(RainError::ShapeMismatch {
                axis: "lon",
                field_len: shape[3],
                coord_len: longitudes.len(),
            });
        }

        Ok(Self {
            values,
            latitudes,
            longitudes,
            time_values,
            time_coding,
        })
    }

    pub fn values(&self) -> &Array4<f64> {
        &self.values
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    pub fn time_values(&self) -> &[f64] {
        &self.time_values
    }

    pub fn time_coding(&self) -> &TimeCoding {
        &self.time_coding
    }
}
