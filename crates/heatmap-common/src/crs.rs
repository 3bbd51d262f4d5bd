//! Coordinate Reference System codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A CRS identifier.
///
/// The engine only distinguishes the codes it has built-in behavior for;
/// everything else is carried opaquely and must be covered by a host-supplied
/// reprojection function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    Epsg3857,
    /// Any other code, e.g. "EPSG:32633"
    Other(String),
}

impl CrsCode {
    /// Parse a CRS string.
    ///
    /// Accepts formats like "EPSG:4326", "epsg:3857", "CRS:84" (equivalent to
    /// EPSG:4326 with lon/lat axis order). Unknown codes are kept as
    /// [`CrsCode::Other`] rather than rejected.
    pub fn parse(s: &str) -> Self {
        let normalized = s.to_uppercase();
        match normalized.as_str() {
            "EPSG:4326" | "CRS:84" => CrsCode::Epsg4326,
            "EPSG:3857" | "EPSG:900913" => CrsCode::Epsg3857,
            _ => CrsCode::Other(normalized),
        }
    }

    /// Check if this is a geographic (lon/lat) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326)
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrsCode::Epsg4326 => write!(f, "EPSG:4326"),
            CrsCode::Epsg3857 => write!(f, "EPSG:3857"),
            CrsCode::Other(code) => write!(f, "{}", code),
        }
    }
}
