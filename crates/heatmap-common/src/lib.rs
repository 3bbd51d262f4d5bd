//! Common types shared across the heatmap-tile crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod grid;
pub mod schema;
pub mod tile;
pub mod value;

pub use bbox::BoundingBox;
pub use crs::CrsCode;
pub use error::{TileError, TileResult};
pub use grid::{GridField, ScalarGrid};
pub use schema::ColorSchema;
pub use tile::{TileCoord, TileGrid};
pub use value::ValueScale;
