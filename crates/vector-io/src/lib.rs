//! GeoJSON persistence for monitoring points and extraction results.
//!
//! Monitoring-point layers are GeoJSON FeatureCollections of point
//! geometries carrying a `kode_kk` group attribute. Extraction output is
//! written in the same format, one feature per group summary with all
//! per-level counts as properties.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use extraction::GroupSummary;
use rain_common::{MonitoringPoint, RainError, RainResult};

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    pub features: Vec<Feature>,
}

/// A GeoJSON Feature with free-form properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// The geometry of this feature.
    pub geometry: Geometry,

    /// Attribute table of this feature.
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// GeoJSON geometry; only points appear in monitoring layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        /// Coordinates as [longitude, latitude].
        coordinates: [f64; 2],
    },
}

/// Load a monitoring-point layer from a GeoJSON file.
///
/// Every feature must be a point carrying a `kode_kk` property (string or
/// numeric).
pub fn read_monitoring_points(path: impl AsRef<Path>) -> RainResult<Vec<MonitoringPoint>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let collection: FeatureCollection = serde_json::from_str(&text)
        .map_err(|e| RainError::VectorFormat(format!("{}: {}", path.display(), e)))?;

    let mut points = Vec::with_capacity(collection.features.len());
    for (idx, feature) in collection.features.iter().enumerate() {
        let Geometry::Point { coordinates } = &feature.geometry;

        let kode_kk = match feature.properties.get("kode_kk") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => {
                return Err(RainError::VectorFormat(format!(
                    "feature {}: kode_kk has unsupported type: {}",
                    idx, other
                )))
            }
            None => {
                return Err(RainError::VectorFormat(format!(
                    "feature {}: missing kode_kk property",
                    idx
                )))
            }
        };

        points.push(MonitoringPoint::new(coordinates[0], coordinates[1], kode_kk));
    }

    debug!(path = %path.display(), points = points.len(), "Read monitoring points");
    Ok(points)
}

/// Persist group summaries as a GeoJSON FeatureCollection.
///
/// One feature per group, positioned at the group's representative point,
/// with the same attribute columns the extraction stage computes.
pub fn write_group_summaries(
    path: impl AsRef<Path>,
    summaries: &[GroupSummary],
) -> RainResult<()> {
    let path = path.as_ref();
    let collection = FeatureCollection {
        type_: "FeatureCollection".to_string(),
        features: summaries.iter().map(summary_feature).collect(),
    };

    let json = serde_json::to_string_pretty(&collection)
        .map_err(|e| RainError::VectorFormat(e.to_string()))?;
    std::fs::write(path, json)?;

    debug!(path = %path.display(), groups = summaries.len(), "Wrote group summaries");
    Ok(())
}

fn summary_feature(summary: &GroupSummary) -> Feature {
    let mut properties = Map::new();
    properties.insert("kode_kk".to_string(), Value::from(summary.kode_kk.clone()));
    properties.insert(
        "value".to_string(),
        Value::from(summary.representative.value),
    );
    properties.insert(
        "grid_kl".to_string(),
        Value::from(summary.representative.grid_kl),
    );
    properties.insert(
        "grid_kg".to_string(),
        Value::from(summary.representative.grid_kg),
    );

    insert_counts(&mut properties, "kelas_kl", &summary.kelas_kl);
    insert_counts(&mut properties, "kelas_kg", &summary.kelas_kg);
    insert_counts(&mut properties, "total_kl", &summary.total_kl);
    insert_counts(&mut properties, "total_kg", &summary.total_kg);

    Feature {
        type_: "Feature".to_string(),
        geometry: Geometry::Point {
            coordinates: [
                summary.representative.point.x,
                summary.representative.point.y,
            ],
        },
        properties,
    }
}

fn insert_counts(properties: &mut Map<String, Value>, prefix: &str, counts: &[u32]) {
    for (i, &count) in counts.iter().enumerate() {
        properties.insert(format!("{}_{}", prefix, i + 1), Value::from(count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extraction::{classify_kg, classify_kl, ClassifiedPoint};
    use tempfile::tempdir;

    const LAYER: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [106.8, -6.2] },
                "properties": { "kode_kk": "3171", "nama": "Jakarta Pusat" }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [110.4, -7.0] },
                "properties": { "kode_kk": 3374 }
            }
        ]
    }"#;

    #[test]
    fn test_read_points() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sampel_pch.geojson");
        std::fs::write(&path, LAYER).unwrap();

        let points = read_monitoring_points(&path).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].kode_kk, "3171");
        assert_eq!(points[0].x, 106.8);
        assert_eq!(points[1].kode_kk, "3374");
    }

    #[test]
    fn test_read_missing_kode_kk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.geojson");
        std::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"Point","coordinates":[0,0]},"properties":{}}
            ]}"#,
        )
        .unwrap();

        assert!(matches!(
            read_monitoring_points(&path).unwrap_err(),
            RainError::VectorFormat(_)
        ));
    }

    #[test]
    fn test_read_non_point_geometry_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("line.geojson");
        std::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]},"properties":{"kode_kk":"X"}}
            ]}"#,
        )
        .unwrap();

        assert!(read_monitoring_points(&path).is_err());
    }

    #[test]
    fn test_write_summaries_roundtrip() {
        let representative = ClassifiedPoint {
            point: MonitoringPoint::new(106.8, -6.2, "3171"),
            value: 6.5,
            grid_kl: classify_kl(6.5),
            grid_kg: classify_kg(6.5),
        };
        let summary = GroupSummary {
            kode_kk: "3171".to_string(),
            representative,
            kelas_kl: [1, 0, 2, 1, 0],
            kelas_kg: [1, 2, 0, 1],
            total_kl: [3, 1, 2, 1, 0],
            total_kg: [3, 2, 1, 1],
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("pulau_pch_day.geojson");
        write_group_summaries(&path, &[summary]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: FeatureCollection = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.features.len(), 1);

        let props = &parsed.features[0].properties;
        assert_eq!(props["kode_kk"], "3171");
        assert_eq!(props["value"], 6.5);
        assert_eq!(props["grid_kl"], 4);
        assert_eq!(props["grid_kg"], 4);
        assert_eq!(props["kelas_kl_3"], 2);
        assert_eq!(props["total_kg_1"], 3);
    }
}
