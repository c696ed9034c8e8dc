//! Temporal aggregation: 4-D forecast field to daily accumulated samples.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use ndarray::{s, Array2};
use tracing::debug;

use rain_common::{round_to_three_hours, CfTimeDecoder, PrecipitationField, RainResult};

use crate::types::{DailySamples, Sample};

/// Collapse a precipitation field into per-day accumulated samples.
///
/// The time axis is decoded to UTC, rounded to the nearest 3-hour boundary,
/// and grouped by calendar day. Each day's value planes are summed as whole
/// arrays; the flattened (lat, lon) positions become scattered samples for
/// interpolation. Coordinates are rounded to 15 decimal places so that
/// grouping keys are stable across slices.
pub fn aggregate_daily(
    field: &PrecipitationField,
) -> RainResult<BTreeMap<NaiveDate, DailySamples>> {
    let coding = field.time_coding();
    let decoder = CfTimeDecoder::parse(&coding.units, coding.calendar.as_deref())?;
    let stamps: Vec<DateTime<Utc>> = decoder
        .decode_axis(field.time_values())?
        .into_iter()
        .map(round_to_three_hours)
        .collect();

    // Group time indices by calendar day. The first rounded timestamp seen
    // for a day becomes its representative.
    let mut day_groups: BTreeMap<NaiveDate, (DateTime<Utc>, Vec<usize>)> = BTreeMap::new();
    for (idx, stamp) in stamps.iter().enumerate() {
        day_groups
            .entry(stamp.date_naive())
            .or_insert_with(|| (*stamp, Vec::new()))
            .1
            .push(idx);
    }

    let n_lat = field.latitudes().len();
    let n_lon = field.longitudes().len();
    let lats: Vec<f64> = field
        .latitudes()
        .iter()
        .map(|&v| round_coordinate(v))
        .collect();
    let lons: Vec<f64> = field
        .longitudes()
        .iter()
        .map(|&v| round_coordinate(v))
        .collect();

    let mut daily = BTreeMap::new();
    for (day, (timestamp, indices)) in day_groups {
        let mut total = Array2::<f64>::zeros((n_lat, n_lon));
        for &t in &indices {
            total += &field.values().slice(s![t, 0, .., ..]);
        }

        let mut samples = Vec::with_capacity(n_lat * n_lon);
        for (i, &lat) in lats.iter().enumerate() {
            for (j, &lon) in lons.iter().enumerate() {
                samples.push(Sample::new(lon, lat, total[[i, j]]));
            }
        }

        debug!(
            day = %day,
            time_steps = indices.len(),
            samples = samples.len(),
            "Aggregated daily accumulation"
        );
        daily.insert(day, DailySamples { timestamp, samples });
    }

    Ok(daily)
}

/// Round a coordinate to 15 decimal places for stable grouping keys.
fn round_coordinate(v: f64) -> f64 {
    (v * 1e15).round() / 1e15
}
