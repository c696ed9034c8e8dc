//! Error types for the rainfall monitoring pipeline.

use thiserror::Error;

/// Result type alias using RainError.
pub type RainResult<T> = Result<T, RainError>;

/// Primary error type for pipeline operations.
///
/// Stage-local variants (decode, shape, samples, bounds) abort the unit of
/// work they occur in — one day or one raster — without touching output
/// already produced for other units.
#[derive(Debug, Error)]
pub enum RainError {
    // === Stage-local errors ===
    #[error("Failed to decode time axis: {0}")]
    Decode(String),

    #[error("Shape mismatch on {axis} axis: field has {field_len}, coordinates have {coord_len}")]
    ShapeMismatch {
        axis: &'static str,
        field_len: usize,
        coord_len: usize,
    },

    #[error("No samples available for interpolation")]
    InsufficientSamples,

    #[error("Point ({x}, {y}) falls outside the raster extent")]
    OutOfBounds { x: f64, y: f64 },

    // === Collaborator errors ===
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Raster codec error: {0}")]
    RasterCodec(String),

    #[error("Vector format error: {0}")]
    VectorFormat(String),

    #[error("Invalid NetCDF data: {0}")]
    NetCdf(String),

    // === Infrastructure ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
