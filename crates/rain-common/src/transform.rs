//! Affine transforms between raster indices and geographic coordinates.

use serde::{Deserialize, Serialize};

/// North-up affine transform for a regular raster.
///
/// Maps fractional (col, row) indices to geographic (x, y):
///
/// ```text
/// x = origin_x + col * pixel_width
/// y = origin_y + row * pixel_height
/// ```
///
/// `origin_x`/`origin_y` is the top-left corner; `pixel_height` is negative
/// so that y decreases as rows go down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Create a north-up transform from the top-left corner and cell sizes.
    ///
    /// `x_size` and `y_size` are both positive; the stored `pixel_height`
    /// is negated.
    pub fn from_origin(origin_x: f64, origin_y: f64, x_size: f64, y_size: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width: x_size,
            pixel_height: -y_size,
        }
    }

    /// Convert a fractional pixel index to geographic coordinates.
    #[inline]
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width,
            self.origin_y + row * self.pixel_height,
        )
    }

    /// Convert geographic coordinates to a fractional pixel index.
    ///
    /// Returns `None` when the transform is degenerate (zero-sized pixels).
    #[inline]
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if self.pixel_width == 0.0 || self.pixel_height == 0.0 {
            return None;
        }

        let col = (x - self.origin_x) / self.pixel_width;
        let row = (y - self.origin_y) / self.pixel_height;
        Some((col, row))
    }

    /// Pixel width as a positive cell size.
    #[inline]
    pub fn abs_pixel_width(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Pixel height as a positive cell size.
    #[inline]
    pub fn abs_pixel_height(&self) -> f64 {
        self.pixel_height.abs()
    }
}
