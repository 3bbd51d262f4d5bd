//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic or projected bounding box.
///
/// `min_y <= max_y` always holds, but the x extremes are not ordered: when
/// `max_x < min_x` the box wraps across the antimeridian and is read as the
/// union of `[min_x, 180]` and `[-180, max_x]`. `[170, -10, -170, 10]` spans
/// 170°E to 170°W through 180°.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// The full geographic extent in EPSG:4326.
    pub const WORLD_GEOGRAPHIC: BoundingBox = BoundingBox {
        min_x: -180.0,
        min_y: -90.0,
        max_x: 180.0,
        max_y: 90.0,
    };

    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse a WMS-style BBOX string: "minx,miny,maxx,maxy"
    pub fn from_wms_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let mut coords = [0.0f64; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
        }

        Ok(Self {
            min_x: coords[0],
            min_y: coords[1],
            max_x: coords[2],
            max_y: coords[3],
        })
    }

    /// Whether this box wraps across the ±180° meridian.
    pub fn wraps_antimeridian(&self) -> bool {
        self.max_x < self.min_x
    }

    /// Extent along the x axis in coordinate units, accounting for wrap.
    pub fn x_span(&self) -> f64 {
        if self.wraps_antimeridian() {
            (180.0 - self.min_x) + (180.0 + self.max_x)
        } else {
            self.max_x - self.min_x
        }
    }

    /// Extent along the y axis in coordinate units.
    pub fn y_span(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within this bbox (boundary inclusive).
    ///
    /// A wrapping box contains the point when it falls in either arm of the
    /// `[min_x, 180] ∪ [-180, max_x]` union.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        if y < self.min_y || y > self.max_y {
            return false;
        }
        if self.wraps_antimeridian() {
            x >= self.min_x || (x >= -180.0 && x <= self.max_x)
        } else {
            x >= self.min_x && x <= self.max_x
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid BBOX format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in BBOX: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wms_bbox() {
        let bbox = BoundingBox::from_wms_string("-125.0,24.0,-66.0,50.0").unwrap();
        assert_eq!(bbox.min_x, -125.0);
        assert_eq!(bbox.min_y, 24.0);
        assert_eq!(bbox.max_x, -66.0);
        assert_eq!(bbox.max_y, 50.0);

        assert!(BoundingBox::from_wms_string("1,2,3").is_err());
        assert!(BoundingBox::from_wms_string("a,2,3,4").is_err());
    }

    #[test]
    fn test_contains_point_standard() {
        let bbox = BoundingBox::new(-10.0, -10.0, 10.0, 10.0);
        assert!(bbox.contains_point(0.0, 0.0));
        assert!(!bbox.contains_point(11.0, 0.0));
        // Boundaries are inclusive.
        assert!(bbox.contains_point(-10.0, -10.0));
        assert!(bbox.contains_point(10.0, 10.0));
        assert!(!bbox.contains_point(0.0, 10.5));
    }

    #[test]
    fn test_contains_point_antimeridian() {
        let bbox = BoundingBox::new(170.0, -10.0, -170.0, 10.0);
        assert!(bbox.wraps_antimeridian());
        assert!(bbox.contains_point(175.0, 0.0));
        assert!(bbox.contains_point(-175.0, 0.0));
        assert!(!bbox.contains_point(0.0, 0.0));
        // Latitude bounds still apply in both arms.
        assert!(!bbox.contains_point(175.0, 20.0));
        assert!(!bbox.contains_point(-175.0, -20.0));
    }

    #[test]
    fn test_spans() {
        let bbox = BoundingBox::new(-125.0, 24.0, -66.0, 50.0);
        assert_eq!(bbox.x_span(), 59.0);
        assert_eq!(bbox.y_span(), 26.0);

        let wrapped = BoundingBox::new(170.0, -10.0, -170.0, 10.0);
        assert_eq!(wrapped.x_span(), 20.0);
        assert_eq!(wrapped.y_span(), 20.0);
    }
}
