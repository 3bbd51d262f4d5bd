//! Error types for the heatmap-tile crates.

use thiserror::Error;

/// Result type alias using TileError.
pub type TileResult<T> = Result<T, TileError>;

/// Primary error type for tile rendering operations.
///
/// Per-pixel sampling anomalies are not errors: a lookup outside the stored
/// grid yields NaN ("no data") and the affected pixels stay transparent.
#[derive(Debug, Error)]
pub enum TileError {
    // === Configuration Errors ===
    #[error("Invalid color format: {0:?} (use \"#fff\", \"#ffffff\" or \"rgb(r, g, b)\")")]
    InvalidColorFormat(String),

    #[error("Invalid color schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Grid shape mismatch: {samples} samples for a {width}x{height} grid")]
    GridShape {
        samples: usize,
        width: usize,
        height: usize,
    },

    // === State Errors ===
    #[error("Uninitialized state: {0}")]
    Uninitialized(&'static str),

    // === Per-Tile Errors ===
    #[error("No tile geometry defined for zoom level {zoom}")]
    MissingTileGeometry { zoom: u32 },

    // === Collaborator Errors ===
    #[error("Failed to decode grid image: {0}")]
    Decode(String),

    #[error("Rendering failed: {0}")]
    Render(String),
}
