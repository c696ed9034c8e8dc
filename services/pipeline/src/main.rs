//! Daily rainfall monitoring pipeline.
//!
//! Downloads the day's gridded precipitation forecast, aggregates it into
//! daily accumulations, interpolates each day onto a regular grid, writes
//! GeoTIFF rasters, extracts and classifies monitoring-point layers, and
//! publishes the artifacts to a GeoServer catalog.

mod config;
mod csv;
mod download;
mod process;
mod publish;

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use rain_common::RainError;

use config::PipelineConfig;
use download::SourceClient;

#[derive(Parser, Debug)]
#[command(name = "pipeline")]
#[command(about = "Daily rainfall forecast processing pipeline")]
struct Args {
    /// Forecast date to process (YYYY-MM-DD, default: yesterday)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Skip publishing artifacts to the map catalog
    #[arg(long)]
    no_publish: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting rainfall pipeline");

    let config = PipelineConfig::from_env()?;
    let date = args
        .date
        .unwrap_or_else(|| (Utc::now() - Duration::days(1)).date_naive());

    let source = SourceClient::new(&config.source_base_url)?;
    let local_path = source
        .fetch_for_date(date, &config.cycle, &config.download_dir)
        .await?
        .ok_or_else(|| {
            RainError::UpstreamUnavailable(format!("no source file available for {}", date))
        })?;

    for dir in [&config.csv_dir, &config.raster_dir, &config.result_dir] {
        std::fs::create_dir_all(dir)?;
    }

    let field = netcdf_parser::read_precipitation(&local_path)?;
    let daily = grid_processor::aggregate_daily(&field)?;
    info!(days = daily.len(), "Aggregated daily accumulations");

    // One day failing leaves the others' output in place.
    let mut produced = Vec::new();
    for (day, samples) in &daily {
        match process::process_day(&config, *day, samples) {
            Ok(outputs) => produced.push(outputs),
            Err(e) => warn!(day = %day, error = %e, "Day processing failed"),
        }
    }

    match (&config.geoserver, args.no_publish) {
        (Some(geoserver), false) => {
            let client = reqwest::Client::new();
            for outputs in &produced {
                for path in std::iter::once(&outputs.raster_path).chain(&outputs.vector_paths) {
                    let store = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    if let Err(e) =
                        publish::publish_artifact(&client, geoserver, path, &store).await
                    {
                        warn!(path = %path.display(), error = %e, "Publishing failed");
                    }
                }
            }
        }
        _ => info!("Publishing skipped"),
    }

    info!(days = produced.len(), "Pipeline run complete");
    Ok(())
}
