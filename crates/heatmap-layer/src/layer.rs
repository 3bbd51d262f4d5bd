//! The layer adapter: configuration surface, state swaps, value queries.

use std::sync::{Arc, PoisonError, RwLock};

use image::RgbaImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use heatmap_common::{
    BoundingBox, ColorSchema, CrsCode, GridField, ScalarGrid, TileCoord, TileError, TileGrid,
    TileResult, ValueScale,
};
use heatmap_render::labels::{TextRenderer, TextStyle};
use heatmap_render::png;
use heatmap_render::sampler;
use heatmap_render::scale::{parse_color, ColorScale};
use heatmap_render::transform::{CoordTransform, TransformFn};

use crate::source;
use crate::state::{LayerState, Mode};

/// Host-registered callback fired after a state swap stales produced tiles.
pub type InvalidateHook = Box<dyn Fn() + Send + Sync>;

/// Construction-time layer configuration.
///
/// `value_range` has no default on purpose: there is no universally correct
/// rescale range, so matrix mode and value queries refuse to run without an
/// explicit one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerOptions {
    pub data_bbox: BoundingBox,
    pub render_bbox: Option<BoundingBox>,
    pub projection: CrsCode,
    pub data_projection: CrsCode,
    /// Falls back to the stock palette when unset
    pub color_schema: Option<ColorSchema>,
    pub mode: Mode,
    pub compression: Option<u32>,
    /// Real-world values of samples 0 and 255
    pub value_range: Option<[f64; 2]>,
    pub value_round_digits: u8,
    pub font_size: f32,
    pub font_color: String,
    /// Falls back to the stock grid matching `projection` when unset
    pub tile_grid: Option<TileGrid>,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            data_bbox: BoundingBox::WORLD_GEOGRAPHIC,
            render_bbox: None,
            projection: CrsCode::Epsg3857,
            data_projection: CrsCode::Epsg4326,
            color_schema: None,
            mode: Mode::Heatmap,
            compression: None,
            value_range: None,
            value_round_digits: 0,
            font_size: 24.0,
            font_color: "#fff".to_string(),
            tile_grid: None,
        }
    }
}

impl LayerOptions {
    /// Parse options from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> TileResult<Self> {
        serde_json::from_str(json).map_err(|e| TileError::Config(e.to_string()))
    }
}

/// Host-supplied capabilities the engine treats as external.
#[derive(Default)]
pub struct Collaborators {
    /// General reprojection, consulted when no built-in transform applies
    pub reproject: Option<TransformFn>,
    /// Glyph drawing, required for matrix mode
    pub text: Option<Arc<dyn TextRenderer>>,
    /// Render-invalidation signal
    pub on_invalidate: Option<InvalidateHook>,
}

/// A tile layer over one scalar grid.
///
/// All mutation goes through setters that build a fresh [`LayerState`] and
/// swap it in atomically; rendering and queries run against the snapshot
/// current when they started.
pub struct HeatmapLayer {
    state: RwLock<Arc<LayerState>>,
    on_invalidate: RwLock<Option<InvalidateHook>>,
    reproject: Option<TransformFn>,
}

impl HeatmapLayer {
    pub fn new(options: LayerOptions) -> TileResult<Self> {
        Self::with_collaborators(options, Collaborators::default())
    }

    pub fn with_collaborators(
        options: LayerOptions,
        collaborators: Collaborators,
    ) -> TileResult<Self> {
        let schema = options
            .color_schema
            .unwrap_or_else(ColorSchema::default_palette);
        let scale = ColorScale::new(&schema)?;

        let transform = CoordTransform::select(
            &options.projection,
            &options.data_projection,
            collaborators.reproject.clone(),
        )?;

        let tile_grid = options.tile_grid.unwrap_or_else(|| {
            if options.projection.is_geographic() {
                TileGrid::geographic()
            } else {
                TileGrid::web_mercator()
            }
        });

        let text_style = TextStyle {
            font_size: options.font_size,
            color: parse_color(&options.font_color)?,
        };

        let value_scale = options
            .value_range
            .map(|[min, max]| ValueScale::new(min, max, options.value_round_digits));
        if options.mode == Mode::Matrix && value_scale.is_none() {
            return Err(TileError::Uninitialized(
                "matrix mode requires an explicit value range",
            ));
        }

        let state = LayerState {
            field: None,
            data_bbox: options.data_bbox,
            render_bbox: options.render_bbox,
            scale,
            transform,
            tile_grid,
            mode: options.mode,
            compression: options.compression,
            value_scale,
            text_style,
            text: collaborators.text,
        };

        Ok(Self {
            state: RwLock::new(Arc::new(state)),
            on_invalidate: RwLock::new(collaborators.on_invalidate),
            reproject: collaborators.reproject,
        })
    }

    /// The current configuration snapshot.
    pub fn snapshot(&self) -> Arc<LayerState> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Register (or replace) the render-invalidation hook.
    pub fn set_invalidation_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self
            .on_invalidate
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Box::new(hook));
    }

    // === Configuration setters ===

    /// Replace the grid, anchored to the currently configured data bbox.
    pub fn set_data(&self, grid: ScalarGrid) -> TileResult<()> {
        self.swap_state(move |state| {
            info!(
                width = grid.width(),
                height = grid.height(),
                "setting grid data"
            );
            let field = GridField::new(grid, state.data_bbox)?;
            Ok(LayerState {
                field: Some(Arc::new(field)),
                ..state.clone()
            })
        })
    }

    /// Replace grid and data bbox together. The render crop resets to the
    /// new data extent.
    pub fn set_data_with_bbox(&self, grid: ScalarGrid, bbox: BoundingBox) -> TileResult<()> {
        self.swap_state(move |state| {
            let field = GridField::new(grid, bbox)?;
            Ok(LayerState {
                field: Some(Arc::new(field)),
                data_bbox: bbox,
                render_bbox: None,
                ..state.clone()
            })
        })
    }

    /// Decode an encoded raster image (PNG, JPEG, ...) into the grid.
    pub fn set_data_from_image(&self, bytes: &[u8]) -> TileResult<()> {
        self.set_data(source::grid_from_image_bytes(bytes)?)
    }

    /// Re-anchor to a new data bbox. A stored grid is re-derived against
    /// it; the render crop resets to the new extent.
    pub fn set_data_bbox(&self, bbox: BoundingBox) -> TileResult<()> {
        self.swap_state(move |state| {
            let field = match &state.field {
                Some(field) => Some(Arc::new(GridField::new(field.grid().clone(), bbox)?)),
                None => None,
            };
            Ok(LayerState {
                field,
                data_bbox: bbox,
                render_bbox: None,
                ..state.clone()
            })
        })
    }

    /// Crop rendering to a sub-extent of the data. May wrap the
    /// antimeridian.
    pub fn set_render_bbox(&self, bbox: BoundingBox) -> TileResult<()> {
        self.swap_state(move |state| {
            Ok(LayerState {
                render_bbox: Some(bbox),
                ..state.clone()
            })
        })
    }

    /// Swap the color schema. Invalid colors reject the whole update and
    /// leave the previous scale in place.
    pub fn set_color_schema(&self, schema: &ColorSchema) -> TileResult<()> {
        let scale = ColorScale::new(schema)?;
        self.swap_state(move |state| {
            Ok(LayerState {
                scale,
                ..state.clone()
            })
        })
    }

    pub fn set_mode(&self, mode: Mode) -> TileResult<()> {
        self.swap_state(move |state| {
            if mode == Mode::Matrix && state.value_scale.is_none() {
                return Err(TileError::Uninitialized(
                    "matrix mode requires an explicit value range",
                ));
            }
            Ok(LayerState {
                mode,
                ..state.clone()
            })
        })
    }

    /// Override the sampling stride; None restores the per-mode default.
    pub fn set_compression(&self, compression: Option<u32>) -> TileResult<()> {
        self.swap_state(move |state| {
            Ok(LayerState {
                compression,
                ..state.clone()
            })
        })
    }

    pub fn set_value_scale(&self, value_scale: ValueScale) -> TileResult<()> {
        self.swap_state(move |state| {
            Ok(LayerState {
                value_scale: Some(value_scale),
                ..state.clone()
            })
        })
    }

    pub fn set_text_style(&self, font_size: f32, font_color: &str) -> TileResult<()> {
        let text_style = TextStyle {
            font_size,
            color: parse_color(font_color)?,
        };
        self.swap_state(move |state| {
            Ok(LayerState {
                text_style,
                ..state.clone()
            })
        })
    }

    pub fn set_text_renderer(&self, text: Arc<dyn TextRenderer>) -> TileResult<()> {
        self.swap_state(move |state| {
            Ok(LayerState {
                text: Some(text),
                ..state.clone()
            })
        })
    }

    /// Reconfigure the projection pair; the transform is re-selected
    /// against the registered reprojection collaborator.
    pub fn set_projections(
        &self,
        projection: CrsCode,
        data_projection: CrsCode,
    ) -> TileResult<()> {
        let transform =
            CoordTransform::select(&projection, &data_projection, self.reproject.clone())?;
        self.swap_state(move |state| {
            Ok(LayerState {
                transform,
                ..state.clone()
            })
        })
    }

    pub fn set_tile_grid(&self, tile_grid: TileGrid) -> TileResult<()> {
        self.swap_state(move |state| {
            Ok(LayerState {
                tile_grid,
                ..state.clone()
            })
        })
    }

    // === Queries ===

    /// Sample at a lon/lat (data CRS) and rescale to real-world units.
    /// `None` when the point has no data.
    pub fn value_at_lon_lat(&self, lon: f64, lat: f64) -> TileResult<Option<String>> {
        let state = self.snapshot();
        Self::value_from_state(&state, lon, lat)
    }

    /// Sample addressed in tile-projection coordinates.
    pub fn value_at_coord(&self, x: f64, y: f64) -> TileResult<Option<String>> {
        let state = self.snapshot();
        let (lon, lat) = state.transform.apply(x, y);
        Self::value_from_state(&state, lon, lat)
    }

    fn value_from_state(state: &LayerState, lon: f64, lat: f64) -> TileResult<Option<String>> {
        let field = state
            .field
            .as_deref()
            .ok_or(TileError::Uninitialized("grid data has not been set"))?;
        let value_scale = state.value_scale.ok_or(TileError::Uninitialized(
            "value queries require an explicit value range",
        ))?;
        let sample = sampler::sample(field, lon, lat);
        Ok(sample.is_finite().then(|| value_scale.format(sample)))
    }

    // === Rendering ===

    /// Rasterize one tile against the current snapshot.
    pub fn render_tile(&self, coord: &TileCoord) -> TileResult<RgbaImage> {
        self.snapshot().render_tile(coord)
    }

    /// Rasterize one tile and encode it as PNG.
    pub fn render_tile_png(&self, coord: &TileCoord) -> TileResult<Vec<u8>> {
        png::encode_png(&self.render_tile(coord)?)
    }

    /// Rasterize a batch of tiles in parallel, all against the same
    /// snapshot.
    pub fn render_tiles(&self, coords: &[TileCoord]) -> Vec<(TileCoord, TileResult<RgbaImage>)> {
        let state = self.snapshot();
        coords
            .par_iter()
            .map(|coord| (*coord, state.render_tile(coord)))
            .collect()
    }

    fn swap_state(
        &self,
        build: impl FnOnce(&LayerState) -> TileResult<LayerState>,
    ) -> TileResult<()> {
        {
            let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let next = build(&guard)?;
            *guard = Arc::new(next);
        }
        self.fire_invalidate();
        Ok(())
    }

    fn fire_invalidate(&self) {
        let hook = self
            .on_invalidate
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(hook) = hook.as_ref() {
            hook();
        }
    }
}
