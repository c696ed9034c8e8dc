//! Raster sampling and per-group summary tables.

use std::collections::BTreeMap;

use tracing::debug;

use rain_common::{MonitoringPoint, RainError, RainResult, RasterArtifact};

use crate::classify::{classify_kg, classify_kl};

/// A monitoring point annotated with its sampled value and both
/// classification codes.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedPoint {
    pub point: MonitoringPoint,
    pub value: f64,
    pub grid_kl: u8,
    pub grid_kg: u8,
}

/// Summary row for one administrative group.
///
/// `kelas_*` counts cover the group's points; `total_*` counts cover the
/// whole dataset and repeat identically on every row. Array index `i` holds
/// the count for classification level `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub kode_kk: String,
    /// The group's point with the maximum sampled value; exact ties keep
    /// the first point in input order.
    pub representative: ClassifiedPoint,
    pub kelas_kl: [u32; 5],
    pub kelas_kg: [u32; 4],
    pub total_kl: [u32; 5],
    pub total_kg: [u32; 4],
}

/// Result of extracting one raster: the full annotated point table and the
/// reduced one-row-per-group summary that gets persisted.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub points: Vec<ClassifiedPoint>,
    pub groups: Vec<GroupSummary>,
}

/// Sample a raster at a geographic position.
///
/// The affine transform is inverted to a fractional (col, row) index which
/// is truncated, not rounded. Positions outside the raster extent fail with
/// [`RainError::OutOfBounds`] instead of reading out of range.
pub fn sample_raster(raster: &RasterArtifact, x: f64, y: f64) -> RainResult<f64> {
    let (col_f, row_f) = raster
        .transform
        .geo_to_pixel(x, y)
        .ok_or(RainError::OutOfBounds { x, y })?;

    if col_f < 0.0 || row_f < 0.0 {
        return Err(RainError::OutOfBounds { x, y });
    }

    let (col, row) = (col_f as usize, row_f as usize);
    if col >= raster.width() || row >= raster.height() {
        return Err(RainError::OutOfBounds { x, y });
    }

    Ok(raster.data[[row, col]])
}

/// Sample and classify every monitoring point, then reduce to per-group
/// summaries.
///
/// Any point outside the raster extent aborts this raster's extraction;
/// other rasters are unaffected.
pub fn extract(points: &[MonitoringPoint], raster: &RasterArtifact) -> RainResult<Extraction> {
    let mut classified = Vec::with_capacity(points.len());
    for point in points {
        let value = sample_raster(raster, point.x, point.y)?;
        classified.push(ClassifiedPoint {
            point: point.clone(),
            value,
            grid_kl: classify_kl(value),
            grid_kg: classify_kg(value),
        });
    }

    let groups = summarize(&classified);
    debug!(
        points = classified.len(),
        groups = groups.len(),
        "Extracted and classified raster values"
    );

    Ok(Extraction {
        points: classified,
        groups,
    })
}

/// Reduce a classified point table to one row per `kode_kk`.
fn summarize(points: &[ClassifiedPoint]) -> Vec<GroupSummary> {
    let mut total_kl = [0u32; 5];
    let mut total_kg = [0u32; 4];
    for p in points {
        total_kl[(p.grid_kl - 1) as usize] += 1;
        total_kg[(p.grid_kg - 1) as usize] += 1;
    }

    // Per group: index of the representative row plus per-level counts.
    let mut groups: BTreeMap<&str, (usize, [u32; 5], [u32; 4])> = BTreeMap::new();
    for (idx, p) in points.iter().enumerate() {
        let entry = groups
            .entry(p.point.kode_kk.as_str())
            .or_insert((idx, [0; 5], [0; 4]));
        entry.1[(p.grid_kl - 1) as usize] += 1;
        entry.2[(p.grid_kg - 1) as usize] += 1;

        // Strict comparison keeps the earliest point on exact ties.
        if p.value > points[entry.0].value {
            entry.0 = idx;
        }
    }

    groups
        .into_iter()
        .map(|(kode_kk, (best, kelas_kl, kelas_kg))| GroupSummary {
            kode_kk: kode_kk.to_string(),
            representative: points[best].clone(),
            kelas_kl,
            kelas_kg,
            total_kl,
            total_kg,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rain_common::{Crs, GeoTransform};

    /// 2x3 raster over [0,3]x[0,2] with 1-degree cells, row 0 at the top.
    fn raster() -> RasterArtifact {
        let data = Array2::from_shape_vec(
            (2, 3),
            vec![
                1.0, 2.0, 3.0, // y in (1, 2]
                4.0, 5.0, 6.0, // y in [0, 1]
            ],
        )
        .unwrap();
        RasterArtifact::new(data, GeoTransform::from_origin(0.0, 2.0, 1.0, 1.0), Crs::wgs84())
    }

    #[test]
    fn test_sample_truncates_to_containing_cell() {
        let raster = raster();
        assert_eq!(sample_raster(&raster, 0.5, 1.5).unwrap(), 1.0);
        assert_eq!(sample_raster(&raster, 2.9, 1.1).unwrap(), 3.0);
        assert_eq!(sample_raster(&raster, 1.5, 0.5).unwrap(), 5.0);
    }

    #[test]
    fn test_sample_out_of_bounds() {
        let raster = raster();
        for (x, y) in [(-0.5, 1.0), (3.5, 1.0), (1.0, 2.5), (1.0, -0.5)] {
            assert!(matches!(
                sample_raster(&raster, x, y).unwrap_err(),
                RainError::OutOfBounds { .. }
            ));
        }
    }

    #[test]
    fn test_extract_aborts_on_out_of_bounds_point() {
        let raster = raster();
        let points = vec![
            MonitoringPoint::new(0.5, 1.5, "A"),
            MonitoringPoint::new(10.0, 10.0, "A"),
        ];
        assert!(extract(&points, &raster).is_err());
    }

    fn classified(kode_kk: &str, value: f64) -> ClassifiedPoint {
        ClassifiedPoint {
            point: MonitoringPoint::new(0.0, 0.0, kode_kk),
            value,
            grid_kl: classify_kl(value),
            grid_kg: classify_kg(value),
        }
    }

    #[test]
    fn test_group_reduction_picks_max_value() {
        let points = vec![
            classified("A", 3.0),
            classified("A", 7.0),
            classified("B", 1.0),
        ];
        let groups = summarize(&points);

        assert_eq!(groups.len(), 2);
        let a = groups.iter().find(|g| g.kode_kk == "A").unwrap();
        assert_eq!(a.representative.value, 7.0);
        let b = groups.iter().find(|g| g.kode_kk == "B").unwrap();
        assert_eq!(b.representative.value, 1.0);
    }

    #[test]
    fn test_group_reduction_tie_keeps_first() {
        let mut first = classified("A", 5.0);
        first.point.x = 111.0;
        let points = vec![first.clone(), classified("A", 5.0)];

        let groups = summarize(&points);
        assert_eq!(groups[0].representative.point.x, 111.0);
    }

    #[test]
    fn test_count_conservation() {
        let points = vec![
            classified("A", 0.5),  // kl 1, kg 1
            classified("A", 2.0),  // kl 2, kg 1
            classified("A", 9.0),  // kl 5, kg 4
            classified("B", 3.0),  // kl 3, kg 2
            classified("B", 3.0),  // kl 3, kg 2
        ];
        let groups = summarize(&points);

        for group in &groups {
            let group_size = points
                .iter()
                .filter(|p| p.point.kode_kk == group.kode_kk)
                .count() as u32;
            assert_eq!(group.kelas_kl.iter().sum::<u32>(), group_size);
            assert_eq!(group.kelas_kg.iter().sum::<u32>(), group_size);
            assert_eq!(group.total_kl.iter().sum::<u32>(), points.len() as u32);
            assert_eq!(group.total_kg.iter().sum::<u32>(), points.len() as u32);
        }

        let a = groups.iter().find(|g| g.kode_kk == "A").unwrap();
        assert_eq!(a.kelas_kl, [1, 1, 0, 0, 1]);
        assert_eq!(a.kelas_kg, [2, 0, 0, 1]);
        assert_eq!(a.total_kl, [1, 1, 2, 0, 1]);
    }

    #[test]
    fn test_extract_full_table_and_summary() {
        let raster = raster();
        let points = vec![
            MonitoringPoint::new(0.5, 1.5, "A"), // value 1.0
            MonitoringPoint::new(1.5, 0.5, "A"), // value 5.0
            MonitoringPoint::new(2.5, 0.5, "B"), // value 6.0
        ];
        let extraction = extract(&points, &raster).unwrap();

        assert_eq!(extraction.points.len(), 3);
        assert_eq!(extraction.groups.len(), 2);

        let a = extraction.groups.iter().find(|g| g.kode_kk == "A").unwrap();
        assert_eq!(a.representative.value, 5.0);
        assert_eq!(a.representative.grid_kl, 3);
        assert_eq!(a.representative.grid_kg, 3);
    }
}
