//! Georeferenced raster artifact.

use ndarray::Array2;

use crate::crs::Crs;
use crate::transform::GeoTransform;

/// A single-band raster: 2-D values plus the affine transform and CRS that
/// tie array indices to geographic coordinates.
///
/// Row 0 is the northernmost row (north-up convention); the transform's
/// origin is the raster's top-left corner.
#[derive(Debug, Clone)]
pub struct RasterArtifact {
    pub data: Array2<f64>,
    pub transform: GeoTransform,
    pub crs: Crs,
}

impl RasterArtifact {
    pub fn new(data: Array2<f64>, transform: GeoTransform, crs: Crs) -> Self {
        Self {
            data,
            transform,
            crs,
        }
    }

    /// Raster width in cells.
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    /// Raster height in cells.
    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}
