//! Pipeline configuration from environment variables.
//!
//! All settings are read once at startup into an explicit structure that is
//! passed by reference into each stage; no component reads the environment
//! after this point.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use grid_processor::{DEFAULT_CELL_SIZE, DEFAULT_NEIGHBORS, DEFAULT_POWER};

/// A named monitoring-point layer extracted against every produced raster.
#[derive(Debug, Clone)]
pub struct PointLayer {
    /// Layer name, used as the output file prefix and subdirectory.
    pub name: String,
    /// Path to the layer's GeoJSON point file.
    pub path: PathBuf,
}

/// Map-catalog publishing target.
#[derive(Debug, Clone)]
pub struct GeoServerConfig {
    pub endpoint: String,
    pub workspace: String,
}

/// Pipeline configuration assembled once at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base URL of the forecast file source.
    pub source_base_url: String,
    /// Forecast cycle of the source file name (e.g. "12").
    pub cycle: String,
    /// Directory for downloaded source files.
    pub download_dir: PathBuf,
    /// Directory for per-day aggregated-sample CSVs.
    pub csv_dir: PathBuf,
    /// Directory for interpolated rasters.
    pub raster_dir: PathBuf,
    /// Root directory for extracted result layers (one subdirectory per
    /// point layer).
    pub result_dir: PathBuf,
    /// Monitoring-point layers to extract.
    pub point_layers: Vec<PointLayer>,
    /// Publishing target; `None` disables publishing.
    pub geoserver: Option<GeoServerConfig>,
    /// Output grid cell size in degrees.
    pub cell_size: f64,
    /// IDW inverse-distance power.
    pub idw_power: f64,
    /// IDW neighbour count per target cell.
    pub idw_neighbors: usize,
}

impl PipelineConfig {
    /// Build the configuration from environment variables.
    ///
    /// `SOURCE_BASE_URL` is required; everything else has defaults matching
    /// the standard repository layout.
    pub fn from_env() -> Result<Self> {
        let source_base_url =
            env::var("SOURCE_BASE_URL").context("SOURCE_BASE_URL is required")?;
        let cycle = env::var("CYCLE").unwrap_or_else(|_| "12".to_string());

        let data_dir =
            PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "repository".to_string()));

        let layer_list = env::var("POINT_LAYERS").unwrap_or_else(|_| {
            "pulau=input/data_vektor/sampel_pch_pulau.geojson,\
             balai=input/data_vektor/sampel_pch_balai.geojson"
                .to_string()
        });
        let point_layers = parse_point_layers(&layer_list, &data_dir)?;

        let geoserver = match (env::var("GEOSERVER_ENDPOINT"), env::var("WORKSPACE")) {
            (Ok(endpoint), Ok(workspace)) => Some(GeoServerConfig {
                endpoint,
                workspace,
            }),
            _ => None,
        };

        let cell_size = parse_env("CELL_SIZE", DEFAULT_CELL_SIZE)?;
        let idw_power = parse_env("IDW_POWER", DEFAULT_POWER)?;
        let idw_neighbors = parse_env("IDW_NEIGHBORS", DEFAULT_NEIGHBORS)?;

        let config = Self {
            source_base_url,
            cycle,
            download_dir: data_dir.join("input/data_raster"),
            csv_dir: data_dir.join("output/daily/nc_to_csv"),
            raster_dir: data_dir.join("output/daily/csv_to_idw"),
            result_dir: data_dir.join("output/daily/result"),
            point_layers,
            geoserver,
            cell_size,
            idw_power,
            idw_neighbors,
        };

        debug!(layers = config.point_layers.len(), "Loaded pipeline configuration");
        Ok(config)
    }
}

/// Parse a `name=path,name=path` layer list. Relative paths are resolved
/// against the data directory.
fn parse_point_layers(raw: &str, data_dir: &Path) -> Result<Vec<PointLayer>> {
    let mut layers = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, path) = entry
            .split_once('=')
            .with_context(|| format!("invalid point layer entry: {}", entry))?;

        let path = Path::new(path.trim());
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            data_dir.join(path)
        };

        layers.push(PointLayer {
            name: name.trim().to_string(),
            path: resolved,
        });
    }

    Ok(layers)
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {}", name)),
        Err(_) => Ok(default),
    }
}
