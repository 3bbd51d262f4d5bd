//! Bilinear sampling over a geographically anchored scalar grid.

use heatmap_common::GridField;

/// Sample the field at a point in data CRS units.
///
/// Returns NaN when any of the four surrounding cells falls outside the
/// stored grid ("no data here"); callers leave those pixels transparent.
///
/// Row 0 of the grid holds the northern edge of the data bbox, so row
/// indices run opposite to latitude. For extents that wrap the
/// antimeridian, stored columns keep addressing longitudes past +180 and
/// the query longitude is shifted into that frame first.
pub fn sample(field: &GridField, lon: f64, lat: f64) -> f64 {
    if !lon.is_finite() || !lat.is_finite() {
        return f64::NAN;
    }

    let bbox = field.bbox();
    let grid = field.grid();
    let (cell_x, cell_y) = field.cell_size();

    let lon = if bbox.wraps_antimeridian() && lon <= bbox.max_x {
        lon + 360.0
    } else {
        lon
    };

    let x_cell = (lon - bbox.min_x) / cell_x;
    let y_cell = (lat - bbox.min_y) / cell_y;

    let col1 = x_cell.floor();
    let col2 = x_cell.ceil();
    let row1 = grid.height() as f64 - y_cell.floor();
    let row2 = grid.height() as f64 - y_cell.ceil();

    let q11 = grid.get(col1 as isize, row1 as isize) as f64;
    let q12 = grid.get(col1 as isize, row2 as isize) as f64;
    let q21 = grid.get(col2 as isize, row1 as isize) as f64;
    let q22 = grid.get(col2 as isize, row2 as isize) as f64;

    if q11.is_nan() || q12.is_nan() || q21.is_nan() || q22.is_nan() {
        return f64::NAN;
    }

    let exact_col = col1 == col2;
    let exact_row = row1 == row2;

    // A query landing exactly on a grid line collapses that axis to a single
    // cell; interpolating across it would divide by zero.
    if exact_col && exact_row {
        return q11;
    }

    // Corner coordinates in data units. Weights come from the real cell
    // spacing, not an assumed unit grid.
    let x1 = bbox.min_x + col1 * cell_x;
    let x2 = bbox.min_x + col2 * cell_x;
    let y1 = bbox.max_y - row1 * cell_y;
    let y2 = bbox.max_y - row2 * cell_y;

    if exact_col {
        let ty = (lat - y1) / (y2 - y1);
        return q11 + (q12 - q11) * ty;
    }
    if exact_row {
        let tx = (lon - x1) / (x2 - x1);
        return q11 + (q21 - q11) * tx;
    }

    let tx = (lon - x1) / (x2 - x1);
    let ty = (lat - y1) / (y2 - y1);
    let at_y1 = q11 + (q21 - q11) * tx;
    let at_y2 = q12 + (q22 - q12) * tx;
    at_y1 + (at_y2 - at_y1) * ty
}
