//! NetCDF reader for gridded precipitation forecasts.
//!
//! Reads forecast files laid out the way the upstream provider ships them:
//! coordinate variables `lat`, `lon`, a CF-encoded `time` axis, and a 4-D
//! total-precipitation variable `tp` indexed `(time, level, lat, lon)`.
//! The result is an in-memory [`PrecipitationField`] with its axis lengths
//! validated against the coordinate arrays.

use std::path::Path;

use ndarray::Array4;
use tracing::debug;

use rain_common::{PrecipitationField, RainResult, TimeCoding};

pub mod error;

pub use error::{NetCdfError, NetCdfResult};

/// Latitude coordinate variable name.
const VAR_LAT: &str = "lat";
/// Longitude coordinate variable name.
const VAR_LON: &str = "lon";
/// Time coordinate variable name.
const VAR_TIME: &str = "time";
/// Total precipitation variable name.
const VAR_PRECIPITATION: &str = "tp";

/// Read a precipitation forecast file into a [`PrecipitationField`].
pub fn read_precipitation(path: impl AsRef<Path>) -> RainResult<PrecipitationField> {
    let path = path.as_ref();
    let file = netcdf::open(path)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;

    let latitudes = read_coordinate(&file, VAR_LAT)?;
    let longitudes = read_coordinate(&file, VAR_LON)?;

    let time_var = file
        .variable(VAR_TIME)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", VAR_TIME)))?;
    let time_values: Vec<f64> = time_var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read time axis: {}", e)))?;
    let time_coding = TimeCoding {
        units: get_str_attr(&time_var, "units").ok_or_else(|| {
            NetCdfError::MissingData("units attribute on time variable".to_string())
        })?,
        calendar: get_str_attr(&time_var, "calendar"),
    };

    let precip_var = file
        .variable(VAR_PRECIPITATION)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", VAR_PRECIPITATION)))?;

    let dims: Vec<usize> = precip_var.dimensions().iter().map(|d| d.len()).collect();
    if dims.len() != 4 {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} must be 4-D (time, level, lat, lon), got {} dimensions",
            VAR_PRECIPITATION,
            dims.len()
        ))
        .into());
    }

    let raw: Vec<f64> = precip_var.get_values(..).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to read {}: {}", VAR_PRECIPITATION, e))
    })?;
    let values = Array4::from_shape_vec((dims[0], dims[1], dims[2], dims[3]), raw)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Value array shape: {}", e)))?;

    debug!(
        path = %path.display(),
        time_steps = dims[0],
        lat = dims[2],
        lon = dims[3],
        "Read precipitation field"
    );

    PrecipitationField::new(values, latitudes, longitudes, time_values, time_coding)
}

/// Read a 1-D coordinate variable as f64.
fn read_coordinate(file: &netcdf::File, name: &str) -> NetCdfResult<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", name)))?;

    var.get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get a string attribute.
fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
