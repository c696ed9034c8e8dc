//! GeoTIFF write/read round-trip.

use ndarray::Array2;
use tempfile::tempdir;

use rain_common::{Crs, GeoTransform, RasterArtifact};
use raster_io::{read_geotiff, write_geotiff};

#[test]
fn roundtrip_preserves_array_and_transform() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pch_day_01152024_1200.tif");

    let data = Array2::from_shape_fn((3, 4), |(row, col)| row as f64 * 10.0 + col as f64 + 0.25);
    let transform = GeoTransform::from_origin(106.0, -6.0, 0.092, 0.092);
    let raster = RasterArtifact::new(data.clone(), transform, Crs::wgs84());

    write_geotiff(&path, &raster).unwrap();
    let restored = read_geotiff(&path).unwrap();

    // Identical array, bit for bit.
    assert_eq!(restored.data, data);
    assert_eq!(restored.transform, transform);
}

#[test]
fn roundtrip_transform_inverts_corners() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corners.tif");

    let (rows, cols) = (5usize, 7usize);
    let data = Array2::from_elem((rows, cols), 1.5);
    let transform = GeoTransform::from_origin(95.0, 6.0, 0.5, 0.5);
    write_geotiff(&path, &RasterArtifact::new(data, transform, Crs::wgs84())).unwrap();

    let restored = read_geotiff(&path).unwrap();
    let gt = restored.transform;

    // Top-left cell center inverts to (0, 0).
    let (x, y) = gt.pixel_to_geo(0.5, 0.5);
    let (col, row) = gt.geo_to_pixel(x, y).unwrap();
    assert_eq!((col.floor() as usize, row.floor() as usize), (0, 0));

    // Bottom-right cell center inverts to (cols-1, rows-1).
    let (x, y) = gt.pixel_to_geo(cols as f64 - 0.5, rows as f64 - 0.5);
    let (col, row) = gt.geo_to_pixel(x, y).unwrap();
    assert_eq!(
        (col.floor() as usize, row.floor() as usize),
        (cols - 1, rows - 1)
    );
}

#[test]
fn read_missing_file_fails() {
    let dir = tempdir().unwrap();
    assert!(read_geotiff(dir.path().join("absent.tif")).is_err());
}
