//! Immutable layer configuration snapshots.

use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use heatmap_common::{
    BoundingBox, GridField, TileCoord, TileError, TileGrid, TileResult, ValueScale,
};
use heatmap_render::labels::{TextRenderer, TextStyle};
use heatmap_render::raster::{RenderMode, TileRasterizer};
use heatmap_render::scale::ColorScale;
use heatmap_render::transform::CoordTransform;

/// Rendering mode of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Heatmap,
    Matrix,
}

/// One configuration snapshot.
///
/// Snapshots are immutable; the layer publishes updates by swapping an
/// `Arc` to a new one. A rasterization clones the Arc up front and can
/// never observe a half-applied update, e.g. a fresh schema against stale
/// grid dimensions.
#[derive(Clone)]
pub struct LayerState {
    /// Grid anchored to its data bbox; None until data arrives
    pub field: Option<Arc<GridField>>,
    /// Configured data extent, used to anchor the next grid
    pub data_bbox: BoundingBox,
    /// Optional crop; None means "render the full data extent"
    pub render_bbox: Option<BoundingBox>,
    pub scale: ColorScale,
    pub transform: CoordTransform,
    pub tile_grid: TileGrid,
    pub mode: Mode,
    /// Explicit sampling stride; None uses the per-mode default
    pub compression: Option<u32>,
    pub value_scale: Option<ValueScale>,
    pub text_style: TextStyle,
    pub text: Option<Arc<dyn TextRenderer>>,
}

impl LayerState {
    /// Effective render extent.
    pub fn effective_render_bbox(&self) -> BoundingBox {
        self.render_bbox.unwrap_or(self.data_bbox)
    }

    /// Rasterize one tile against this snapshot.
    pub fn render_tile(&self, coord: &TileCoord) -> TileResult<RgbaImage> {
        let field = self
            .field
            .as_deref()
            .ok_or(TileError::Uninitialized("grid data has not been set"))?;

        let mode = match self.mode {
            Mode::Heatmap => RenderMode::Heatmap,
            Mode::Matrix => RenderMode::Matrix {
                value_scale: self.value_scale.ok_or(TileError::Uninitialized(
                    "matrix mode requires an explicit value range",
                ))?,
                text: self
                    .text
                    .as_deref()
                    .ok_or(TileError::Uninitialized("matrix mode requires a text renderer"))?,
                style: self.text_style,
            },
        };

        let rasterizer = TileRasterizer::new(
            field,
            &self.scale,
            self.effective_render_bbox(),
            &self.transform,
            &self.tile_grid,
            mode,
            self.compression,
        );
        rasterizer.rasterize(coord)
    }
}
