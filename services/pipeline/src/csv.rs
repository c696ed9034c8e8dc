//! Audit CSV export of aggregated daily samples.
//!
//! One file per day, columns `y,x,time,z`, mirroring the scattered samples
//! handed to the interpolator.

use std::path::Path;

use tracing::debug;

use grid_processor::DailySamples;
use rain_common::RainResult;

/// Write one day's aggregated samples as CSV.
pub fn write_daily_csv(path: impl AsRef<Path>, day: &DailySamples) -> RainResult<()> {
    let path = path.as_ref();
    let stamp = day.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();

    let mut out = String::with_capacity(16 + day.samples.len() * 48);
    out.push_str("y,x,time,z\n");
    for sample in &day.samples {
        out.push_str(&format!(
            "{},{},{},{}\n",
            sample.y, sample.x, stamp, sample.value
        ));
    }

    std::fs::write(path, out)?;
    debug!(path = %path.display(), rows = day.samples.len(), "Wrote daily CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use grid_processor::Sample;
    use tempfile::tempdir;

    #[test]
    fn test_write_daily_csv() {
        let day = DailySamples {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            samples: vec![
                Sample::new(106.0, -6.0, 1.5),
                Sample::new(106.5, -6.5, 0.0),
            ],
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("pch_day_01152024_1200.csv");
        write_daily_csv(&path, &day).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "y,x,time,z");
        assert_eq!(lines[1], "-6,106,2024-01-15 12:00:00,1.5");
        assert_eq!(lines.len(), 3);
    }
}
