//! Per-day processing: audit CSV, interpolated raster, and extracted
//! point layers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use extraction::extract;
use grid_processor::{DailySamples, IdwInterpolator, RasterGrid};
use rain_common::{Crs, RasterArtifact};
use raster_io::{read_geotiff, write_geotiff};
use vector_io::{read_monitoring_points, write_group_summaries};

use crate::config::{PipelineConfig, PointLayer};
use crate::csv::write_daily_csv;

/// File stem shared by a day's CSV, raster, and extracted layers.
pub fn artifact_stem(timestamp: DateTime<Utc>) -> String {
    format!("pch_day_{}", timestamp.format("%m%d%Y_%H%M"))
}

/// Artifacts produced for one day.
pub struct DayOutputs {
    pub raster_path: PathBuf,
    pub vector_paths: Vec<PathBuf>,
}

/// Run the full processing chain for one day's samples.
///
/// A failing point layer is logged and skipped; the day's raster and the
/// remaining layers are unaffected.
pub fn process_day(
    config: &PipelineConfig,
    day: NaiveDate,
    samples: &DailySamples,
) -> Result<DayOutputs> {
    let stem = artifact_stem(samples.timestamp);

    let csv_path = config.csv_dir.join(format!("{}.csv", stem));
    write_daily_csv(&csv_path, samples)
        .with_context(|| format!("writing {}", csv_path.display()))?;

    let grid = RasterGrid::from_samples(&samples.samples, config.cell_size)?;
    let idw = IdwInterpolator::new(&samples.samples, config.idw_power, config.idw_neighbors)?;
    let surface = idw.interpolate(&grid);

    let raster_path = config.raster_dir.join(format!("{}.tif", stem));
    write_geotiff(
        &raster_path,
        &RasterArtifact::new(surface, grid.transform(), Crs::wgs84()),
    )
    .with_context(|| format!("writing {}", raster_path.display()))?;

    info!(
        day = %day,
        path = %raster_path.display(),
        width = grid.width(),
        height = grid.height(),
        "Wrote interpolated raster"
    );

    // Extraction reads the artifact back from disk, sampling exactly what
    // downstream consumers of the file will see.
    let raster = read_geotiff(&raster_path)?;

    let mut vector_paths = Vec::new();
    for layer in &config.point_layers {
        match extract_layer(config, layer, &raster, &stem) {
            Ok(path) => vector_paths.push(path),
            Err(e) => {
                warn!(layer = %layer.name, day = %day, error = %e, "Layer extraction failed");
            }
        }
    }

    Ok(DayOutputs {
        raster_path,
        vector_paths,
    })
}

/// Extract one monitoring-point layer against a raster and persist the
/// group summaries.
fn extract_layer(
    config: &PipelineConfig,
    layer: &PointLayer,
    raster: &RasterArtifact,
    stem: &str,
) -> Result<PathBuf> {
    let points = read_monitoring_points(&layer.path)
        .with_context(|| format!("reading {}", layer.path.display()))?;

    let extraction = extract(&points, raster)?;

    let dir = config.result_dir.join(&layer.name);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}_{}.geojson", layer.name, stem));
    write_group_summaries(&path, &extraction.groups)
        .with_context(|| format!("writing {}", path.display()))?;

    info!(
        layer = %layer.name,
        points = extraction.points.len(),
        groups = extraction.groups.len(),
        path = %path.display(),
        "Extracted point layer"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_artifact_stem_format() {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(artifact_stem(stamp), "pch_day_01152024_1200");
    }
}
