//! Output raster grid geometry.

use rain_common::{BoundingBox, GeoTransform, RainError, RainResult};

use crate::types::Sample;

/// Default output cell size in degrees.
pub const DEFAULT_CELL_SIZE: f64 = 0.092;

/// A regular north-up interpolation grid derived from a sample bounding box.
///
/// The origin is the top-left corner `(x_min, y_max)`; row 0 is the
/// northernmost row so that the stored array matches the affine transform
/// without any flipping. Both bounding-box extremes are covered inclusively,
/// with the cell count derived by ceiling-dividing the extent by the cell
/// size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterGrid {
    bbox: BoundingBox,
    cell_size: f64,
    width: usize,
    height: usize,
}

impl RasterGrid {
    /// Derive the grid covering a set of samples.
    ///
    /// Fails with [`RainError::InsufficientSamples`] on an empty set.
    pub fn from_samples(samples: &[Sample], cell_size: f64) -> RainResult<Self> {
        let bbox = BoundingBox::from_positions(samples.iter().map(|s| (s.x, s.y)))
            .ok_or(RainError::InsufficientSamples)?;
        Ok(Self::from_bbox(bbox, cell_size))
    }

    /// Build a grid over an explicit bounding box.
    pub fn from_bbox(bbox: BoundingBox, cell_size: f64) -> Self {
        Self {
            bbox,
            cell_size,
            width: span_points(bbox.width(), cell_size),
            height: span_points(bbox.height(), cell_size),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// X coordinate of a column's grid point.
    #[inline]
    pub fn x_at(&self, col: usize) -> f64 {
        self.bbox.min_x + col as f64 * self.cell_size
    }

    /// Y coordinate of a row's grid point (row 0 is northernmost).
    #[inline]
    pub fn y_at(&self, row: usize) -> f64 {
        self.bbox.max_y - row as f64 * self.cell_size
    }

    /// Affine transform tying the interpolated array to this grid.
    pub fn transform(&self) -> GeoTransform {
        GeoTransform::from_origin(self.bbox.min_x, self.bbox.max_y, self.cell_size, self.cell_size)
    }
}

/// Number of grid points covering `extent` inclusively at `step` spacing.
fn span_points(extent: f64, step: f64) -> usize {
    (extent / step).ceil() as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_samples_dimensions() {
        let samples = vec![
            Sample::new(106.0, -7.0, 0.0),
            Sample::new(107.0, -6.0, 0.0),
        ];
        let grid = RasterGrid::from_samples(&samples, 0.5).unwrap();

        // 1 degree span at 0.5 step: points at 0.0, 0.5, 1.0 offsets.
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.x_at(0), 106.0);
        assert_eq!(grid.x_at(2), 107.0);
        assert_eq!(grid.y_at(0), -6.0);
        assert_eq!(grid.y_at(2), -7.0);
    }

    #[test]
    fn test_non_divisible_extent_rounds_up() {
        let samples = vec![
            Sample::new(0.0, 0.0, 0.0),
            Sample::new(1.0, 1.0, 0.0),
        ];
        let grid = RasterGrid::from_samples(&samples, 0.3).unwrap();

        // ceil(1.0 / 0.3) = 4, plus the origin point.
        assert_eq!(grid.width(), 5);
        assert!(grid.x_at(grid.width() - 1) >= 1.0);
    }

    #[test]
    fn test_single_sample_gives_unit_grid() {
        let samples = vec![Sample::new(110.25, -3.5, 12.0)];
        let grid = RasterGrid::from_samples(&samples, 0.092).unwrap();

        assert_eq!((grid.width(), grid.height()), (1, 1));
        assert_eq!(grid.x_at(0), 110.25);
        assert_eq!(grid.y_at(0), -3.5);
    }

    #[test]
    fn test_empty_samples_fail() {
        assert!(matches!(
            RasterGrid::from_samples(&[], 0.092).unwrap_err(),
            RainError::InsufficientSamples
        ));
    }

    #[test]
    fn test_transform_matches_grid_points() {
        let samples = vec![
            Sample::new(106.0, -7.0, 0.0),
            Sample::new(107.0, -6.0, 0.0),
        ];
        let grid = RasterGrid::from_samples(&samples, 0.5).unwrap();
        let gt = grid.transform();

        for row in 0..grid.height() {
            for col in 0..grid.width() {
                let (x, y) = gt.pixel_to_geo(col as f64, row as f64);
                assert!((x - grid.x_at(col)).abs() < 1e-12);
                assert!((y - grid.y_at(row)).abs() < 1e-12);
            }
        }
    }
}
