//! Error types for NetCDF parsing.

use rain_common::RainError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl From<NetCdfError> for RainError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::Io(e) => RainError::Io(e),
            other => RainError::NetCdf(other.to_string()),
        }
    }
}
