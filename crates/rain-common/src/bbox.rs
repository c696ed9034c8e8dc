//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Compute the bounding box of a set of (x, y) positions.
    ///
    /// Returns `None` for an empty set.
    pub fn from_positions<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = positions.into_iter();
        let (x0, y0) = iter.next()?;
        let mut bbox = Self::new(x0, y0, x0, y0);

        for (x, y) in iter {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }

        Some(bbox)
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_positions() {
        let bbox =
            BoundingBox::from_positions(vec![(1.0, 2.0), (5.0, 8.0), (3.0, 1.0)]).unwrap();
        assert_eq!(bbox.min_x, 1.0);
        assert_eq!(bbox.max_x, 5.0);
        assert_eq!(bbox.min_y, 1.0);
        assert_eq!(bbox.max_y, 8.0);
    }

    #[test]
    fn test_from_positions_empty() {
        assert!(BoundingBox::from_positions(Vec::new()).is_none());
    }

    #[test]
    fn test_from_positions_single() {
        let bbox = BoundingBox::from_positions(vec![(110.5, -7.25)]).unwrap();
        assert_eq!(bbox.width(), 0.0);
        assert_eq!(bbox.height(), 0.0);
        assert!(bbox.contains_point(110.5, -7.25));
    }

    #[test]
    fn test_contains_point() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.contains_point(5.0, 5.0));
        assert!(bbox.contains_point(0.0, 10.0));
        assert!(!bbox.contains_point(-1.0, 5.0));
        assert!(!bbox.contains_point(5.0, 11.0));
    }
}
