//! Inverse distance weighting over an R-tree of scattered samples.

use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use rain_common::{RainError, RainResult};

use crate::grid::RasterGrid;
use crate::types::Sample;

/// Default inverse-distance power.
pub const DEFAULT_POWER: f64 = 2.0;
/// Default number of nearest neighbours per target point.
pub const DEFAULT_NEIGHBORS: usize = 10;

#[derive(Debug, Clone)]
struct IndexedSample {
    position: [f64; 2],
    value: f64,
}

impl RTreeObject for IndexedSample {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedSample {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Inverse-distance-weighting interpolator for one day's samples.
///
/// Each target point takes the k nearest samples (all samples when fewer
/// exist) weighted by `1 / distance^power`, weights normalized to sum to 1.
#[derive(Debug)]
pub struct IdwInterpolator {
    tree: RTree<IndexedSample>,
    power: f64,
    neighbors: usize,
}

impl IdwInterpolator {
    /// Build the spatial index over the sample positions.
    ///
    /// Fails with [`RainError::InsufficientSamples`] on an empty set.
    pub fn new(samples: &[Sample], power: f64, neighbors: usize) -> RainResult<Self> {
        if samples.is_empty() {
            return Err(RainError::InsufficientSamples);
        }

        let entries = samples
            .iter()
            .map(|s| IndexedSample {
                position: [s.x, s.y],
                value: s.value,
            })
            .collect();

        Ok(Self {
            tree: RTree::bulk_load(entries),
            power,
            neighbors: neighbors.max(1),
        })
    }

    /// Normalized `(value, weight)` pairs of the nearest samples for one
    /// target position.
    ///
    /// A zero-distance neighbour would make its raw weight infinite, so an
    /// exact hit short-circuits to that sample with weight 1.
    pub fn neighbor_weights(&self, x: f64, y: f64) -> Vec<(f64, f64)> {
        let target = [x, y];
        let mut raw: Vec<(f64, f64)> = Vec::with_capacity(self.neighbors);

        for entry in self.tree.nearest_neighbor_iter(&target).take(self.neighbors) {
            let d2 = entry.distance_2(&target);
            if d2 == 0.0 {
                return vec![(entry.value, 1.0)];
            }
            raw.push((entry.value, d2.sqrt().powf(self.power).recip()));
        }

        let total: f64 = raw.iter().map(|(_, w)| w).sum();
        raw.into_iter().map(|(v, w)| (v, w / total)).collect()
    }

    /// Interpolated value at a single position.
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        self.neighbor_weights(x, y)
            .iter()
            .map(|(v, w)| v * w)
            .sum()
    }

    /// Interpolate onto every point of a raster grid.
    ///
    /// Rows are independent and evaluated in parallel.
    pub fn interpolate(&self, grid: &RasterGrid) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((grid.height(), grid.width()));

        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, mut line)| {
                let y = grid.y_at(row);
                for col in 0..grid.width() {
                    line[col] = self.value_at(grid.x_at(col), y);
                }
            });

        out
    }
}
