//! Tile-projection to data-projection coordinate transforms.

use std::fmt;
use std::sync::Arc;

use heatmap_common::{CrsCode, TileError, TileResult};

/// Signature of an external reprojection function.
pub type TransformFn = Arc<dyn Fn(f64, f64) -> (f64, f64) + Send + Sync>;

/// Converts a point from the tile CRS into the data CRS.
///
/// Projection math is not this crate's business: beyond the identity and the
/// ubiquitous Web-Mercator-tiles-over-geographic-data case, reprojection is
/// delegated to a host-supplied function.
#[derive(Clone)]
pub enum CoordTransform {
    /// Tile and data share a CRS.
    Identity,
    /// EPSG:3857 tile coordinates over EPSG:4326 data.
    WebMercatorToGeographic,
    /// Host-supplied reprojection for any other pair.
    Custom(TransformFn),
}

impl CoordTransform {
    /// Pick the transform for a (tile CRS, data CRS) pair.
    ///
    /// `reproject` is consulted only when no built-in case applies; a pair
    /// that needs one and has none is a configuration error.
    pub fn select(
        tile_crs: &CrsCode,
        data_crs: &CrsCode,
        reproject: Option<TransformFn>,
    ) -> TileResult<Self> {
        if tile_crs == data_crs {
            return Ok(CoordTransform::Identity);
        }
        if *tile_crs == CrsCode::Epsg3857 && *data_crs == CrsCode::Epsg4326 {
            return Ok(CoordTransform::WebMercatorToGeographic);
        }
        reproject
            .map(CoordTransform::Custom)
            .ok_or(TileError::Uninitialized(
                "no reprojection function registered for the configured projection pair",
            ))
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            CoordTransform::Identity => (x, y),
            CoordTransform::WebMercatorToGeographic => web_mercator_to_lon_lat(x, y),
            CoordTransform::Custom(f) => f(x, y),
        }
    }
}

impl fmt::Debug for CoordTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordTransform::Identity => write!(f, "Identity"),
            CoordTransform::WebMercatorToGeographic => write!(f, "WebMercatorToGeographic"),
            CoordTransform::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// WGS84 spheroid radius used by the spherical Mercator projection.
const EARTH_RADIUS_M: f64 = 6378137.0;

/// Inverse spherical Mercator: meters to degrees.
pub fn web_mercator_to_lon_lat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (y / EARTH_RADIUS_M).sinh().atan().to_degrees();
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mercator_inverse_origin() {
        let (lon, lat) = web_mercator_to_lon_lat(0.0, 0.0);
        assert!(lon.abs() < 1e-9);
        assert!(lat.abs() < 1e-9);
    }

    #[test]
    fn test_mercator_inverse_extent() {
        let (lon, lat) = web_mercator_to_lon_lat(20037508.342789244, 20037508.342789244);
        assert!((lon - 180.0).abs() < 1e-6);
        // Mercator extent corner sits at the usual ~85.05° clip latitude.
        assert!((lat - 85.05112877980659).abs() < 1e-6);
    }

    #[test]
    fn test_select() {
        let t = CoordTransform::select(&CrsCode::Epsg3857, &CrsCode::Epsg3857, None).unwrap();
        assert!(matches!(t, CoordTransform::Identity));

        let t = CoordTransform::select(&CrsCode::Epsg3857, &CrsCode::Epsg4326, None).unwrap();
        assert!(matches!(t, CoordTransform::WebMercatorToGeographic));

        let missing =
            CoordTransform::select(&CrsCode::Epsg4326, &CrsCode::parse("EPSG:5070"), None);
        assert!(missing.is_err());

        let swap: TransformFn = Arc::new(|x, y| (y, x));
        let t = CoordTransform::select(
            &CrsCode::Epsg4326,
            &CrsCode::parse("EPSG:5070"),
            Some(swap),
        )
        .unwrap();
        assert_eq!(t.apply(1.0, 2.0), (2.0, 1.0));
    }
}
