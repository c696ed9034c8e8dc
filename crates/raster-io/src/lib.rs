//! GeoTIFF persistence for raster artifacts.
//!
//! Writes a [`RasterArtifact`] as a single-band 64-bit float GeoTIFF with
//! ModelPixelScale and ModelTiepoint georeferencing tags, and reads one back
//! with its transform reconstructed. The codec here carries no algorithmic
//! content; grid geometry is computed upstream in `grid-processor`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;
use tracing::debug;

use rain_common::{Crs, GeoTransform, RainError, RainResult, RasterArtifact};

/// GeoTIFF ModelPixelScaleTag.
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
/// GeoTIFF ModelTiepointTag.
const TAG_MODEL_TIEPOINT: u16 = 33922;
/// GeoTIFF GeoKeyDirectoryTag.
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;

/// Write a raster artifact as a single-band f64 GeoTIFF.
pub fn write_geotiff(path: impl AsRef<Path>, raster: &RasterArtifact) -> RainResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file)).map_err(codec_error)?;

    let width = raster.width() as u32;
    let height = raster.height() as u32;
    let mut image = encoder
        .new_image::<colortype::Gray64Float>(width, height)
        .map_err(codec_error)?;

    let gt = &raster.transform;
    let pixel_scale = [gt.abs_pixel_width(), gt.abs_pixel_height(), 0.0];
    // Raster index (0, 0) is tied to the top-left geographic origin.
    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    let geo_keys = geo_key_directory(raster.crs);

    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_MODEL_PIXEL_SCALE), &pixel_scale[..])
        .map_err(codec_error)?;
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_MODEL_TIEPOINT), &tiepoint[..])
        .map_err(codec_error)?;
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_GEO_KEY_DIRECTORY), &geo_keys[..])
        .map_err(codec_error)?;

    let buffer = raster.data.as_standard_layout();
    let values = buffer
        .as_slice()
        .ok_or_else(|| RainError::RasterCodec("non-contiguous raster buffer".to_string()))?;
    image.write_data(values).map_err(codec_error)?;

    debug!(path = %path.display(), width, height, "Wrote GeoTIFF");
    Ok(())
}

/// Read a single-band f64 GeoTIFF back into a raster artifact.
pub fn read_geotiff(path: impl AsRef<Path>) -> RainResult<RasterArtifact> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file)).map_err(codec_error)?;

    let (width, height) = decoder.dimensions().map_err(codec_error)?;

    let pixel_scale = decoder
        .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_PIXEL_SCALE))
        .map_err(|_| RainError::RasterCodec("missing ModelPixelScale tag".to_string()))?;
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_TIEPOINT))
        .map_err(|_| RainError::RasterCodec("missing ModelTiepoint tag".to_string()))?;
    if pixel_scale.len() < 2 || tiepoint.len() < 5 {
        return Err(RainError::RasterCodec(
            "malformed georeferencing tags".to_string(),
        ));
    }

    let transform = GeoTransform::from_origin(
        tiepoint[3],
        tiepoint[4],
        pixel_scale[0],
        pixel_scale[1],
    );

    let values = match decoder.read_image().map_err(codec_error)? {
        DecodingResult::F64(v) => v,
        other => {
            return Err(RainError::RasterCodec(format!(
                "expected 64-bit float samples, got {}",
                sample_kind(&other)
            )))
        }
    };

    let data = Array2::from_shape_vec((height as usize, width as usize), values)
        .map_err(|e| RainError::RasterCodec(format!("raster shape: {}", e)))?;

    debug!(path = %path.display(), width, height, "Read GeoTIFF");
    Ok(RasterArtifact::new(data, transform, Crs::wgs84()))
}

/// Minimal GeoKeyDirectory for a geographic CRS: model type geographic,
/// raster type pixel-is-area, geographic CRS code.
fn geo_key_directory(crs: Crs) -> [u16; 16] {
    [
        1, 1, 0, 3, // version 1.1, 3 keys
        1024, 0, 1, 2, // GTModelTypeGeoKey = geographic
        1025, 0, 1, 1, // GTRasterTypeGeoKey = PixelIsArea
        2048, 0, 1, crs.epsg as u16, // GeographicTypeGeoKey
    ]
}

fn codec_error(err: tiff::TiffError) -> RainError {
    RainError::RasterCodec(err.to_string())
}

fn sample_kind(result: &DecodingResult) -> &'static str {
    match result {
        DecodingResult::F32(_) => "f32",
        DecodingResult::F64(_) => "f64",
        _ => "non-floating-point",
    }
}
