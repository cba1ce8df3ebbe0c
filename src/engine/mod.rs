//! Engine module - the simulation capability set consumed by the renderers,
//! plus a reference Game of Life universe implementing it.

mod cell;
mod pattern;
mod universe;

pub use cell::*;
pub use pattern::*;
pub use universe::*;

/// Simulation engine seen by the rendering core.
///
/// The engine is the single writer of cell state. Renderers read the state
/// buffer and read-then-clear the changed-cell list; every mutation entry
/// point appends the coordinates it affects to that list.
pub trait Engine {
    /// Grid width in cells.
    fn width(&self) -> u16;

    /// Grid height in cells.
    fn height(&self) -> u16;

    /// Advance the simulation by one discrete step.
    fn tick(&mut self);

    /// Row-major cell states, `width * height` long.
    fn cell_states(&self) -> &[Cell];

    /// Cells whose state may have changed since the list was last cleared.
    fn changed_cells(&self) -> &[CellCoordinates];

    /// Number of coordinate pairs in the changed-cell list.
    fn changed_cells_count(&self) -> usize {
        self.changed_cells().len()
    }

    /// Drain the changed-cell list.
    fn clear_changed_cells(&mut self);

    fn toggle_cell(&mut self, row: u16, column: u16);

    /// Insert a glider centered at `(row, column)`.
    fn insert_glider(&mut self, row: u16, column: u16);

    /// Insert a pulsar centered at `(row, column)`.
    fn insert_pulsar(&mut self, row: u16, column: u16);

    /// Set every cell dead.
    fn clear(&mut self);

    /// Re-randomize every cell.
    fn reset(&mut self);
}
