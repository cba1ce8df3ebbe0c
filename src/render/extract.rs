//! Validated read-only views over the engine's state buffer and changed-cell list.

use crate::engine::{Cell, CellCoordinates, Engine};

use super::RenderError;

/// Row-major cell states checked against the grid dimensions.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    cells: &'a [Cell],
    width: u16,
    height: u16,
}

impl<'a> GridView<'a> {
    /// Wrap a state buffer, rejecting empty grids and buffers whose length
    /// disagrees with `width * height`.
    pub fn new(cells: &'a [Cell], width: u16, height: u16) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyGrid);
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(RenderError::BufferMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    pub fn from_engine<E: Engine + ?Sized>(engine: &'a E) -> Result<Self, RenderError> {
        Self::new(engine.cell_states(), engine.width(), engine.height())
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn contains(&self, coords: CellCoordinates) -> bool {
        coords.row() < self.height && coords.column() < self.width
    }

    /// Row-major index of an in-range coordinate.
    #[inline]
    pub fn index(&self, coords: CellCoordinates) -> usize {
        coords.row() as usize * self.width as usize + coords.column() as usize
    }

    /// State at `coords`, or `None` outside the grid.
    pub fn get(&self, coords: CellCoordinates) -> Option<Cell> {
        if self.contains(coords) {
            Some(self.cells[self.index(coords)])
        } else {
            None
        }
    }

    /// Every cell with its state. Only used to seed a backend from a cold start.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoordinates, Cell)> + 'a {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(idx, &cell)| {
            let row = (idx / width as usize) as u16;
            let column = (idx % width as usize) as u16;
            (CellCoordinates(row, column), cell)
        })
    }
}

/// The cells to repaint this frame: the changed-cell list resolved against
/// the current state buffer.
///
/// All work is proportional to the number of changed records, never to the
/// grid area.
#[derive(Debug, Clone, Copy)]
pub struct ChangeSet<'a> {
    grid: GridView<'a>,
    changed: &'a [CellCoordinates],
}

impl<'a> ChangeSet<'a> {
    /// Pair a changed-cell list with the grid, rejecting coordinates outside it.
    pub fn new(grid: GridView<'a>, changed: &'a [CellCoordinates]) -> Result<Self, RenderError> {
        if let Some(&coords) = changed.iter().find(|&&c| !grid.contains(c)) {
            return Err(RenderError::CoordinateOutOfRange {
                row: coords.row(),
                column: coords.column(),
                width: grid.width(),
                height: grid.height(),
            });
        }
        Ok(Self { grid, changed })
    }

    pub fn from_engine<E: Engine + ?Sized>(engine: &'a E) -> Result<Self, RenderError> {
        Self::new(GridView::from_engine(engine)?, engine.changed_cells())
    }

    /// Number of changed records, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.changed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn grid(&self) -> GridView<'a> {
        self.grid
    }

    /// Each changed coordinate with its current state.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoordinates, Cell)> + 'a {
        let grid = self.grid;
        self.changed
            .iter()
            .map(move |&coords| (coords, grid.cells[grid.index(coords)]))
    }

    /// Changed coordinates whose current state is `state`.
    pub fn in_state(&self, state: Cell) -> impl Iterator<Item = CellCoordinates> + 'a {
        self.iter()
            .filter(move |&(_, cell)| cell == state)
            .map(|(coords, _)| coords)
    }
}
