//! Tile coordinates and tile grid geometry.

use crate::{BoundingBox, TileError, TileResult};
use serde::{Deserialize, Serialize};

/// A tile coordinate (z/x/y), top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y), increasing southward
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Tile grid geometry: a top-left origin and one resolution per zoom level.
///
/// This is the shape a tile request resolves against. How a host produces
/// origins and resolutions is its own concern; the standard Web Mercator and
/// geographic grids are provided as constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    /// Top-left corner of the tile pyramid (x, y) in grid CRS units
    origin: (f64, f64),
    /// Resolution (units per pixel) indexed by zoom level
    resolutions: Vec<f64>,
    /// Tile edge length in pixels
    tile_size: u32,
}

/// Web Mercator extent half-width in meters.
const MERCATOR_EXTENT: f64 = 20037508.342789244;

/// Zoom levels provided by the stock grids.
const DEFAULT_MAX_ZOOM: u32 = 22;

impl TileGrid {
    /// Create a grid from an explicit origin and resolution pyramid.
    pub fn new(origin: (f64, f64), resolutions: Vec<f64>, tile_size: u32) -> Self {
        Self {
            origin,
            resolutions,
            tile_size,
        }
    }

    /// Standard Web Mercator (Google/OSM) tile grid: square 2^z x 2^z
    /// pyramid over ±20037508.34m, 256px tiles.
    pub fn web_mercator() -> Self {
        let resolutions = (0..=DEFAULT_MAX_ZOOM)
            .map(|z| 2.0 * MERCATOR_EXTENT / (256.0 * 2f64.powi(z as i32)))
            .collect();
        Self {
            origin: (-MERCATOR_EXTENT, MERCATOR_EXTENT),
            resolutions,
            tile_size: 256,
        }
    }

    /// Standard WGS84 geographic tile grid: 2^(z+1) x 2^z pyramid over the
    /// full lon/lat extent, 256px tiles. Tiles stay square because the
    /// column count doubles the row count.
    pub fn geographic() -> Self {
        let resolutions = (0..=DEFAULT_MAX_ZOOM)
            .map(|z| 180.0 / (256.0 * 2f64.powi(z as i32)))
            .collect();
        Self {
            origin: (-180.0, 90.0),
            resolutions,
            tile_size: 256,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    /// Resolution at a zoom level; zooms beyond the pyramid have no
    /// geometry.
    pub fn resolution(&self, zoom: u32) -> TileResult<f64> {
        self.resolutions
            .get(zoom as usize)
            .copied()
            .ok_or(TileError::MissingTileGeometry { zoom })
    }

    /// The extent a tile covers, in grid CRS units.
    pub fn tile_bbox(&self, coord: &TileCoord) -> TileResult<BoundingBox> {
        let span = self.tile_size as f64 * self.resolution(coord.z)?;
        let min_x = self.origin.0 + span * coord.x as f64;
        let max_y = self.origin.1 - span * coord.y as f64;
        Ok(BoundingBox::new(min_x, max_y - span, min_x + span, max_y))
    }
}
