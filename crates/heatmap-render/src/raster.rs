//! Per-tile rasterization: transform, containment, sampling, painting.

use image::{Rgba, RgbaImage};
use tracing::debug;

use heatmap_common::{BoundingBox, GridField, TileCoord, TileGrid, TileResult, ValueScale};

use crate::labels::{TextRenderer, TextStyle};
use crate::sampler;
use crate::scale::ColorScale;
use crate::transform::CoordTransform;

/// Default sampling stride in heatmap mode.
pub const HEATMAP_STRIDE: u32 = 4;
/// Default sampling stride in matrix mode; labels need room to paint.
pub const MATRIX_STRIDE: u32 = 64;

/// What gets painted into each sampled block.
pub enum RenderMode<'a> {
    /// Continuous color gradient from the scale.
    Heatmap,
    /// Numeric labels of rescaled sample values.
    Matrix {
        value_scale: ValueScale,
        text: &'a dyn TextRenderer,
        style: TextStyle,
    },
}

/// A short-lived rasterization context over one configuration snapshot.
///
/// Holds only shared references, so any number of rasterizers may run
/// concurrently against the same state. Output depends on nothing but the
/// inputs: identical inputs produce byte-identical buffers.
pub struct TileRasterizer<'a> {
    field: &'a GridField,
    scale: &'a ColorScale,
    render_bbox: BoundingBox,
    transform: &'a CoordTransform,
    tile_grid: &'a TileGrid,
    mode: RenderMode<'a>,
    stride: u32,
}

impl<'a> TileRasterizer<'a> {
    /// Build a rasterizer.
    ///
    /// An explicit `compression` overrides the per-mode stride defaults
    /// (64 for matrix, 4 for heatmap).
    pub fn new(
        field: &'a GridField,
        scale: &'a ColorScale,
        render_bbox: BoundingBox,
        transform: &'a CoordTransform,
        tile_grid: &'a TileGrid,
        mode: RenderMode<'a>,
        compression: Option<u32>,
    ) -> Self {
        let stride = compression
            .unwrap_or(match mode {
                RenderMode::Matrix { .. } => MATRIX_STRIDE,
                RenderMode::Heatmap => HEATMAP_STRIDE,
            })
            .clamp(1, tile_grid.tile_size());
        Self {
            field,
            scale,
            render_bbox,
            transform,
            tile_grid,
            mode,
            stride,
        }
    }

    /// Rasterize one tile into an RGBA buffer of
    /// `tile_size x tile_size` pixels.
    ///
    /// Pixel row 0 is the tile's northern edge. Blocks whose center falls
    /// outside the render bbox, or over a grid region with no data, stay
    /// fully transparent.
    pub fn rasterize(&self, coord: &TileCoord) -> TileResult<RgbaImage> {
        let bbox = self.tile_grid.tile_bbox(coord)?;
        let size = self.tile_grid.tile_size();
        let step = (bbox.max_x - bbox.min_x) / size as f64;
        let half = self.stride as f64 / 2.0;

        debug!(
            z = coord.z,
            x = coord.x,
            y = coord.y,
            stride = self.stride,
            "rasterizing tile"
        );

        let mut img = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));

        let mut j = 0u32;
        while j < size {
            let mut i = 0u32;
            while i < size {
                // Block center in tile CRS units; latitude runs opposite to
                // the pixel row.
                let px = bbox.min_x + step * (i as f64 + half);
                let py = bbox.max_y - step * (j as f64 + half);
                let (lon, lat) = self.transform.apply(px, py);

                if self.render_bbox.contains_point(lon, lat) {
                    let value = sampler::sample(self.field, lon, lat);
                    // 0 is a valid sample; only non-finite means "no data".
                    if value.round().is_finite() {
                        self.paint(&mut img, i, j, value);
                    }
                }
                i += self.stride;
            }
            j += self.stride;
        }

        Ok(img)
    }

    fn paint(&self, img: &mut RgbaImage, i: u32, j: u32, value: f64) {
        let size = self.tile_grid.tile_size();
        match &self.mode {
            RenderMode::Heatmap => {
                let color = self.scale.color_for(value);
                let pixel = Rgba([color.r, color.g, color.b, 255]);
                for row in j..(j + self.stride).min(size) {
                    for col in i..(i + self.stride).min(size) {
                        img.put_pixel(col, row, pixel);
                    }
                }
            }
            RenderMode::Matrix {
                value_scale,
                text,
                style,
            } => {
                let label = value_scale.format(value);
                text.draw(img, &label, i as i32, j as i32, style);
            }
        }
    }
}
