//! Host-facing layer adapter over the tile rasterization engine.
//!
//! The engine itself is a pure component; this crate wires it to a host
//! mapping framework: an atomically swappable configuration, a setter
//! surface, value queries and a render-invalidation hook.

pub mod layer;
pub mod source;
pub mod state;

pub use layer::{Collaborators, HeatmapLayer, InvalidateHook, LayerOptions};
pub use state::{LayerState, Mode};
