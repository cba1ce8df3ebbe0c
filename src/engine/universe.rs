//! Reference Game of Life universe on a torus.

use std::fmt;
use std::mem;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Cell, CellCoordinates, Engine, EngineError, Pattern};

/// Fixed-size toroidal Game of Life grid with changed-cell reporting.
///
/// Cells are stored row-major in a pair of generation buffers that are
/// swapped on every tick.
pub struct Universe {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    /// Scratch buffer the next generation is written into.
    next: Vec<Cell>,
    changed: Vec<CellCoordinates>,
    rng: StdRng,
}

impl Universe {
    /// Create a universe with a random initial state (each cell alive with
    /// probability 1/2). A `seed` makes the state and later resets reproducible.
    pub fn new(width: u16, height: u16, seed: Option<u64>) -> Self {
        let mut universe = Self::empty(width, height);
        universe.rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        for cell in universe.cells.iter_mut() {
            *cell = random_cell(&mut universe.rng);
        }
        universe
    }

    /// Create a universe with every cell dead.
    pub fn empty(width: u16, height: u16) -> Self {
        let num_cells = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::Dead; num_cells],
            next: vec![Cell::Dead; num_cells],
            changed: Vec::with_capacity(num_cells),
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Row-major index of `(row, column)`.
    #[inline]
    pub fn index(&self, row: u16, column: u16) -> usize {
        row as usize * self.width as usize + column as usize
    }

    /// Validate externally supplied coordinates before they reach an
    /// indexing entry point.
    pub fn check_bounds(&self, row: u16, column: u16) -> Result<CellCoordinates, EngineError> {
        if row >= self.height || column >= self.width {
            return Err(EngineError::OutOfBounds {
                row,
                column,
                width: self.width,
                height: self.height,
            });
        }
        Ok(CellCoordinates(row, column))
    }

    /// State of a single cell.
    #[inline]
    pub fn get(&self, row: u16, column: u16) -> Cell {
        self.cells[self.index(row, column)]
    }

    /// Current generation, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Current generation as one byte per cell (`0` dead, `1` alive).
    pub fn cell_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// Changed-cell list as raw `u16` slots, two per record.
    pub fn changed_cells_raw(&self) -> &[u16] {
        CellCoordinates::as_raw_pairs(&self.changed)
    }

    /// Number of live cells.
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Make every listed cell alive.
    ///
    /// # Panics
    /// Panics if a coordinate lies outside the grid.
    pub fn set_cells(&mut self, cells: &[CellCoordinates]) {
        for &CellCoordinates(row, column) in cells {
            self.set_state(row, column, Cell::Alive);
        }
    }

    /// Clear the square around `(row, column)` and stamp `pattern` into it.
    /// Coordinates wrap around the grid edges.
    pub fn insert(&mut self, pattern: Pattern, row: u16, column: u16) {
        let radius = pattern.clear_radius();
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                let (r, c) = self.wrap(row, column, dr, dc);
                self.set_state(r, c, Cell::Dead);
            }
        }
        for (dr, dc) in pattern.offsets() {
            let (r, c) = self.wrap(row, column, dr, dc);
            self.set_state(r, c, Cell::Alive);
        }
    }

    /// Text rendering of the current generation.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Write `state` and record the coordinate if it actually changed.
    fn set_state(&mut self, row: u16, column: u16, state: Cell) {
        let idx = self.index(row, column);
        if self.cells[idx] != state {
            self.cells[idx] = state;
            self.changed.push(CellCoordinates(row, column));
        }
    }

    /// Offset `(row, column)` by `(dr, dc)` with toroidal wrap-around.
    #[inline]
    fn wrap(&self, row: u16, column: u16, dr: i32, dc: i32) -> (u16, u16) {
        let r = (row as i32 + dr).rem_euclid(self.height as i32);
        let c = (column as i32 + dc).rem_euclid(self.width as i32);
        (r as u16, c as u16)
    }

    fn live_neighbor_count(&self, row: u16, column: u16) -> u8 {
        let mut count = 0;
        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let (r, c) = self.wrap(row, column, dr, dc);
                count += self.get(r, c) as u8;
            }
        }
        count
    }
}

fn random_cell(rng: &mut StdRng) -> Cell {
    if rng.gen_bool(0.5) {
        Cell::Alive
    } else {
        Cell::Dead
    }
}

impl Engine for Universe {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn tick(&mut self) {
        for row in 0..self.height {
            for column in 0..self.width {
                let idx = self.index(row, column);
                let cell = self.cells[idx];
                let live_neighbors = self.live_neighbor_count(row, column);

                let next_state = match (cell, live_neighbors) {
                    // Survival.
                    (Cell::Alive, 2) | (Cell::Alive, 3) => Cell::Alive,
                    // Under- or overpopulation.
                    (Cell::Alive, _) => Cell::Dead,
                    // Reproduction.
                    (Cell::Dead, 3) => Cell::Alive,
                    (otherwise, _) => otherwise,
                };

                if next_state != cell {
                    self.changed.push(CellCoordinates(row, column));
                }
                self.next[idx] = next_state;
            }
        }
        mem::swap(&mut self.cells, &mut self.next);
    }

    fn cell_states(&self) -> &[Cell] {
        &self.cells
    }

    fn changed_cells(&self) -> &[CellCoordinates] {
        &self.changed
    }

    fn clear_changed_cells(&mut self) {
        self.changed.clear();
    }

    fn toggle_cell(&mut self, row: u16, column: u16) {
        let state = self.get(row, column).toggled();
        self.set_state(row, column, state);
    }

    fn insert_glider(&mut self, row: u16, column: u16) {
        self.insert(Pattern::Glider, row, column);
    }

    fn insert_pulsar(&mut self, row: u16, column: u16) {
        self.insert(Pattern::Pulsar, row, column);
    }

    fn clear(&mut self) {
        for row in 0..self.height {
            for column in 0..self.width {
                self.set_state(row, column, Cell::Dead);
            }
        }
    }

    fn reset(&mut self) {
        for row in 0..self.height {
            for column in 0..self.width {
                let state = random_cell(&mut self.rng);
                self.set_state(row, column, state);
            }
        }
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.cells.chunks(self.width.max(1) as usize) {
            for &cell in line {
                let symbol = if cell == Cell::Dead { '◻' } else { '◼' };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
