//! Monitoring-point extraction from interpolated rasters.
//!
//! Samples a raster at each monitoring point, classifies the value with two
//! independent threshold schemes, and reduces the classified table to one
//! representative row per administrative group with per-level counts.

pub mod classify;
pub mod extract;

pub use classify::{classify_kg, classify_kl};
pub use extract::{extract, sample_raster, ClassifiedPoint, Extraction, GroupSummary};
