//! Mapping pointer positions to grid cells.

use crate::engine::CellCoordinates;

/// Position and displayed size of a surface in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A pointer position in viewport coordinates, together with the displayed
/// bounds of the surface it landed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub client_x: f64,
    pub client_y: f64,
    pub bounds: BoundingRect,
}

impl PointerInput {
    /// Position in the surface's logical pixels.
    ///
    /// The displayed size may differ from the logical size (CSS scaling,
    /// device pixel ratio); the offset is rescaled by their ratio per axis.
    pub fn surface_position(&self, logical_size: (f64, f64)) -> (f64, f64) {
        let scale = |logical: f64, displayed: f64| {
            if displayed > 0.0 { logical / displayed } else { 1.0 }
        };
        let x = (self.client_x - self.bounds.left) * scale(logical_size.0, self.bounds.width);
        let y = (self.client_y - self.bounds.top) * scale(logical_size.1, self.bounds.height);
        (x, y)
    }
}

/// Vertical direction of row indices on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAxis {
    /// Row 0 at the top (2D raster convention).
    Down,
    /// Row 0 at the bottom (3D scene convention, +y up).
    Up,
}

/// Index of the cell containing `offset`, clamped to `[0, count - 1]`.
fn clamped_index(offset: f64, cell_size: f64, count: u16) -> u16 {
    let index = (offset / cell_size).floor();
    // NaN from a degenerate cell size lands on 0.
    index.clamp(0.0, count.saturating_sub(1) as f64) as u16
}

/// Grid cell under a surface position. Positions off the surface are clamped
/// to the nearest edge cell.
pub fn cell_at(
    position: (f64, f64),
    cell_size: f64,
    width: u16,
    height: u16,
    axis: RowAxis,
) -> CellCoordinates {
    let column = clamped_index(position.0, cell_size, width);
    let row = clamped_index(position.1, cell_size, height);
    let row = match axis {
        RowAxis::Down => row,
        RowAxis::Up => height.saturating_sub(1) - row,
    };
    CellCoordinates(row, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer(x: f64, y: f64) -> PointerInput {
        PointerInput {
            client_x: x,
            client_y: y,
            bounds: BoundingRect {
                left: 10.0,
                top: 20.0,
                width: 250.0,
                height: 250.0,
            },
        }
    }

    #[test]
    fn test_surface_position_rescales() {
        // Displayed at half the logical size.
        let position = pointer(60.0, 45.0).surface_position((500.0, 500.0));
        assert_eq!(position, (100.0, 50.0));
    }

    #[test]
    fn test_cell_at_origin() {
        assert_eq!(cell_at((0.0, 0.0), 5.0, 8, 6, RowAxis::Down), CellCoordinates(0, 0));
    }

    #[test]
    fn test_cell_at_clamps_beyond_bottom_right() {
        let cell = cell_at((1e6, 1e6), 5.0, 8, 6, RowAxis::Down);
        assert_eq!(cell, CellCoordinates(5, 7));
    }

    #[test]
    fn test_cell_at_clamps_negative() {
        let cell = cell_at((-3.0, -40.0), 5.0, 8, 6, RowAxis::Down);
        assert_eq!(cell, CellCoordinates(0, 0));
    }

    #[test]
    fn test_row_axis_up_flips_rows() {
        assert_eq!(cell_at((0.0, 0.0), 5.0, 8, 6, RowAxis::Up), CellCoordinates(5, 0));
        assert_eq!(cell_at((12.0, 11.0), 5.0, 8, 6, RowAxis::Up), CellCoordinates(3, 2));
        assert_eq!(cell_at((0.0, 1e6), 5.0, 8, 6, RowAxis::Up), CellCoordinates(0, 0));
    }
}
