//! Grid ingestion from encoded raster images.

use image::GenericImageView;
use tracing::debug;

use heatmap_common::{ScalarGrid, TileError, TileResult};

/// Decode an encoded raster image (PNG, JPEG, ...) into a scalar grid.
///
/// One sample per pixel, taken from the red channel; grids are commonly
/// shipped as grayscale images where the channels agree.
pub fn grid_from_image_bytes(bytes: &[u8]) -> TileResult<ScalarGrid> {
    let img = image::load_from_memory(bytes).map_err(|e| TileError::Decode(e.to_string()))?;
    let (width, height) = img.dimensions();
    debug!(width, height, "decoded grid image");

    let rgba = img.to_rgba8();
    let samples: Vec<f32> = rgba
        .as_raw()
        .chunks_exact(4)
        .map(|px| px[0] as f32)
        .collect();

    ScalarGrid::new(samples, width as usize, height as usize)
}
