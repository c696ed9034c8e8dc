//! Core grid processing for the rainfall monitoring pipeline.
//!
//! Three stages, each a pure function over immutable inputs:
//!
//! - [`aggregate::aggregate_daily`] collapses a 4-D precipitation field into
//!   per-day accumulated samples.
//! - [`idw::IdwInterpolator`] interpolates a day's scattered samples onto a
//!   regular grid with inverse distance weighting.
//! - [`grid::RasterGrid`] derives the output grid geometry (extents, cell
//!   size, north-up orientation) consumed by the raster writer.
//!
//! Distinct days are independent; callers may process them in any order or
//! in parallel.

pub mod aggregate;
pub mod grid;
pub mod idw;
pub mod types;

pub use aggregate::aggregate_daily;
pub use grid::{RasterGrid, DEFAULT_CELL_SIZE};
pub use idw::{IdwInterpolator, DEFAULT_NEIGHBORS, DEFAULT_POWER};
pub use types::{DailySamples, Sample};
