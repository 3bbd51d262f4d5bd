//! Scalar grid data model.

use crate::{BoundingBox, TileError, TileResult};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

/// An immutable grid of scalar samples in row-major order.
///
/// Row 0 is the northern edge of the covered extent. Samples are stored as
/// f32 regardless of the source width; [`ScalarGrid::from_samples`] ingests
/// any numeric type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarGrid {
    samples: Vec<f32>,
    width: usize,
    height: usize,
}

impl ScalarGrid {
    /// Create a grid, enforcing `samples.len() == width * height`.
    pub fn new(samples: Vec<f32>, width: usize, height: usize) -> TileResult<Self> {
        if width == 0 || height == 0 || samples.len() != width * height {
            return Err(TileError::GridShape {
                samples: samples.len(),
                width,
                height,
            });
        }
        Ok(Self {
            samples,
            width,
            height,
        })
    }

    /// Create a grid from samples of any numeric width (u8, i16, f64, ...).
    pub fn from_samples<T>(samples: &[T], width: usize, height: usize) -> TileResult<Self>
    where
        T: AsPrimitive<f32>,
    {
        Self::new(samples.iter().map(|v| v.as_()).collect(), width, height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample at a cell index. Indices outside `[0, width) x [0, height)`
    /// are "no data" and yield NaN; callers skip those, they are not errors.
    pub fn get(&self, col: isize, row: isize) -> f32 {
        if col < 0 || row < 0 || col >= self.width as isize || row >= self.height as isize {
            return f32::NAN;
        }
        self.samples[row as usize * self.width + col as usize]
    }
}

/// A scalar grid anchored to its geographic extent, with the derived cell
/// size.
///
/// Grid and data bbox are only settable together, so the cell size can never
/// be derived from a mismatched pair or used before both exist.
#[derive(Debug, Clone)]
pub struct GridField {
    grid: ScalarGrid,
    bbox: BoundingBox,
    cell: (f64, f64),
}

impl GridField {
    /// Anchor a grid to a bounding box and derive the cell size.
    ///
    /// The bbox may wrap the antimeridian; its x span is then the sum of the
    /// two arms. A degenerate extent cannot yield a usable cell size and is
    /// rejected.
    pub fn new(grid: ScalarGrid, bbox: BoundingBox) -> TileResult<Self> {
        let dx = bbox.x_span();
        let dy = bbox.y_span();
        if dx <= 0.0 || dy <= 0.0 || !dx.is_finite() || !dy.is_finite() {
            return Err(TileError::Uninitialized(
                "data bbox has no usable extent, cell size is undefined",
            ));
        }
        let cell = (dx / grid.width() as f64, dy / grid.height() as f64);
        Ok(Self { grid, bbox, cell })
    }

    pub fn grid(&self) -> &ScalarGrid {
        &self.grid
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Data units covered by one cell, as (x, y).
    pub fn cell_size(&self) -> (f64, f64) {
        self.cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_invariant() {
        assert!(ScalarGrid::new(vec![0.0; 12], 4, 3).is_ok());
        assert!(matches!(
            ScalarGrid::new(vec![0.0; 11], 4, 3),
            Err(TileError::GridShape { .. })
        ));
        assert!(ScalarGrid::new(vec![], 0, 3).is_err());
    }

    #[test]
    fn test_from_samples_u8() {
        let grid = ScalarGrid::from_samples(&[0u8, 128, 255, 64], 2, 2).unwrap();
        assert_eq!(grid.get(1, 0), 128.0);
        assert_eq!(grid.get(1, 1), 64.0);
    }

    #[test]
    fn test_out_of_range_is_nan() {
        let grid = ScalarGrid::from_samples(&[1u8, 2, 3, 4], 2, 2).unwrap();
        assert!(grid.get(-1, 0).is_nan());
        assert!(grid.get(2, 0).is_nan());
        assert!(grid.get(0, 2).is_nan());
    }

    #[test]
    fn test_cell_size() {
        let grid = ScalarGrid::new(vec![0.0; 9], 3, 3).unwrap();
        let field = GridField::new(grid, BoundingBox::WORLD_GEOGRAPHIC).unwrap();
        assert_eq!(field.cell_size(), (120.0, 60.0));
    }

    #[test]
    fn test_cell_size_wrapped() {
        let grid = ScalarGrid::new(vec![0.0; 8], 4, 2).unwrap();
        let field =
            GridField::new(grid, BoundingBox::new(170.0, -10.0, -170.0, 10.0)).unwrap();
        assert_eq!(field.cell_size(), (5.0, 10.0));
    }

    #[test]
    fn test_degenerate_bbox_rejected() {
        let grid = ScalarGrid::new(vec![0.0; 9], 3, 3).unwrap();
        let result = GridField::new(grid, BoundingBox::new(10.0, 0.0, 10.0, 5.0));
        assert!(matches!(result, Err(TileError::Uninitialized(_))));
    }
}
