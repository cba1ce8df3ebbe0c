//! Immediate-mode raster backend.

use crate::engine::{Cell, CellCoordinates, Engine};
use crate::schema::Palette;

use super::{
    ChangeSet, DrawSummary, GridView, PointerInput, RasterSurface, RenderBackend, RenderError,
    RowAxis, cell_at, cell_size_for, ensure_dimensions,
};

/// Draws changed cells as filled squares on a [`RasterSurface`].
///
/// Unchanged regions are never touched, so the surface itself holds the
/// picture between frames.
pub struct RasterBackend<S: RasterSurface> {
    palette: Palette,
    state: Option<RasterState<S>>,
}

struct RasterState<S> {
    surface: S,
    cell_size: f64,
    width: u16,
    height: u16,
}

impl<S: RasterSurface> RasterBackend<S> {
    /// Create an uninitialized backend.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            state: None,
        }
    }

    /// Bind the surface, size cells to cover it, and paint the whole grid once.
    ///
    /// The engine's buffer must match its reported dimensions; a mismatch is
    /// fatal here rather than rendered partially later.
    pub fn initialize<E: Engine + ?Sized>(
        &mut self,
        mut surface: S,
        engine: &E,
    ) -> Result<(), RenderError> {
        let grid = GridView::from_engine(engine)?;
        let cell_size = cell_size_for(surface.size(), grid.width(), grid.height())?;

        // Cold start: same two passes as a frame, over every cell.
        for (state, color) in [(Cell::Alive, self.palette.alive), (Cell::Dead, self.palette.dead)] {
            surface.set_fill_color(color);
            for (coords, _) in grid.iter().filter(|&(_, cell)| cell == state) {
                fill_cell(&mut surface, cell_size, coords);
            }
        }

        log::debug!(
            "Raster backend initialized: {}x{} cells, cell size {}px",
            grid.width(),
            grid.height(),
            cell_size
        );

        self.state = Some(RasterState {
            surface,
            cell_size,
            width: grid.width(),
            height: grid.height(),
        });
        Ok(())
    }

    /// Cell side length in logical pixels, once initialized.
    pub fn cell_size(&self) -> Option<f64> {
        self.state.as_ref().map(|state| state.cell_size)
    }

    pub fn surface(&self) -> Option<&S> {
        self.state.as_ref().map(|state| &state.surface)
    }

    /// Release the surface, returning the backend to the uninitialized state.
    pub fn take_surface(&mut self) -> Option<S> {
        self.state.take().map(|state| state.surface)
    }
}

fn fill_cell<S: RasterSurface>(surface: &mut S, cell_size: f64, coords: CellCoordinates) {
    surface.fill_rect(
        coords.column() as f64 * cell_size,
        coords.row() as f64 * cell_size,
        cell_size,
        cell_size,
    );
}

impl<S: RasterSurface> RenderBackend for RasterBackend<S> {
    fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    fn draw_frame(&mut self, engine: &mut dyn Engine) -> Result<DrawSummary, RenderError> {
        let state = self.state.as_mut().ok_or(RenderError::NotInitialized)?;

        let mut summary = DrawSummary::default();
        {
            let changes = ChangeSet::from_engine(&*engine)?;
            ensure_dimensions(&changes.grid(), state.width, state.height)?;
            if !changes.is_empty() {
                // One pass per color: fill-style switches are the expensive part.
                state.surface.set_fill_color(self.palette.alive);
                for coords in changes.in_state(Cell::Alive) {
                    fill_cell(&mut state.surface, state.cell_size, coords);
                    summary.alive += 1;
                }

                state.surface.set_fill_color(self.palette.dead);
                for coords in changes.in_state(Cell::Dead) {
                    fill_cell(&mut state.surface, state.cell_size, coords);
                    summary.dead += 1;
                }
            }
        }
        engine.clear_changed_cells();

        log::trace!("Raster frame: {} alive, {} dead", summary.alive, summary.dead);
        Ok(summary)
    }

    fn map_pointer(&self, pointer: &PointerInput) -> Result<CellCoordinates, RenderError> {
        let state = self.state.as_ref().ok_or(RenderError::NotInitialized)?;
        let position = pointer.surface_position(state.surface.size());
        Ok(cell_at(
            position,
            state.cell_size,
            state.width,
            state.height,
            RowAxis::Down,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Universe;
    use crate::render::{BoundingRect, PixelSurface};
    use crate::schema::Color;

    const ALIVE: [u8; 4] = [0, 0, 0, 255];
    const DEAD: [u8; 4] = [255, 255, 255, 255];

    fn backend(universe: &Universe) -> RasterBackend<PixelSurface> {
        let mut backend = RasterBackend::new(Palette::default());
        backend
            .initialize(PixelSurface::new(40, 40), universe)
            .unwrap();
        backend
    }

    /// Color of the pixel at the center of a cell.
    fn cell_pixel(backend: &RasterBackend<PixelSurface>, row: u16, column: u16) -> [u8; 4] {
        let size = backend.cell_size().unwrap() as u32;
        let surface = backend.surface().unwrap();
        surface
            .pixel(column as u32 * size + size / 2, row as u32 * size + size / 2)
            .unwrap()
    }

    struct MismatchedEngine(Universe);

    impl Engine for MismatchedEngine {
        fn width(&self) -> u16 {
            self.0.width() + 1
        }
        fn height(&self) -> u16 {
            self.0.height()
        }
        fn tick(&mut self) {}
        fn cell_states(&self) -> &[Cell] {
            self.0.cell_states()
        }
        fn changed_cells(&self) -> &[CellCoordinates] {
            self.0.changed_cells()
        }
        fn clear_changed_cells(&mut self) {}
        fn toggle_cell(&mut self, _: u16, _: u16) {}
        fn insert_glider(&mut self, _: u16, _: u16) {}
        fn insert_pulsar(&mut self, _: u16, _: u16) {}
        fn clear(&mut self) {}
        fn reset(&mut self) {}
    }

    #[test]
    fn test_draw_before_initialize_fails() {
        let mut backend = RasterBackend::<PixelSurface>::new(Palette::default());
        let mut universe = Universe::empty(4, 4);
        assert!(matches!(
            backend.draw_frame(&mut universe),
            Err(RenderError::NotInitialized)
        ));
    }

    #[test]
    fn test_draw_rejects_engine_of_other_size() {
        let mut backend = backend(&Universe::empty(4, 4));
        let fills = backend.surface().unwrap().fill_changes();
        let mut larger = Universe::empty(8, 8);
        larger.toggle_cell(7, 7);

        assert!(matches!(
            backend.draw_frame(&mut larger),
            Err(RenderError::DimensionMismatch {
                width: 4,
                height: 4,
                actual_width: 8,
                actual_height: 8,
            })
        ));
        assert_eq!(larger.changed_cells_count(), 1);
        assert_eq!(backend.surface().unwrap().fill_changes(), fills);
    }

    #[test]
    fn test_initialize_rejects_mismatched_buffer() {
        let engine = MismatchedEngine(Universe::empty(4, 4));
        let mut backend = RasterBackend::new(Palette::default());
        assert!(matches!(
            backend.initialize(PixelSurface::new(40, 40), &engine),
            Err(RenderError::BufferMismatch {
                expected: 20,
                actual: 16
            })
        ));
        assert!(!backend.is_initialized());
    }

    #[test]
    fn test_initialize_paints_whole_grid() {
        let universe = Universe::new(4, 4, Some(5));
        let backend = backend(&universe);
        assert_eq!(backend.cell_size(), Some(10.0));

        for row in 0..4 {
            for column in 0..4 {
                let expected = if universe.get(row, column).is_alive() {
                    ALIVE
                } else {
                    DEAD
                };
                assert_eq!(cell_pixel(&backend, row, column), expected);
            }
        }
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut universe = Universe::empty(4, 4);
        let mut backend = backend(&universe);
        let before = backend.surface().unwrap().as_rgba().to_vec();

        universe.toggle_cell(1, 1);
        backend.draw_frame(&mut universe).unwrap();
        assert_eq!(cell_pixel(&backend, 1, 1), ALIVE);
        for (row, column) in [(0, 0), (1, 2), (2, 1), (3, 3)] {
            assert_eq!(cell_pixel(&backend, row, column), DEAD);
        }

        universe.toggle_cell(1, 1);
        backend.draw_frame(&mut universe).unwrap();
        assert_eq!(backend.surface().unwrap().as_rgba(), before.as_slice());
    }

    #[test]
    fn test_draw_drains_and_uses_two_fill_passes() {
        let mut universe = Universe::new(16, 16, Some(11));
        let mut backend = backend(&universe);
        let fills_before = backend.surface().unwrap().fill_changes();

        universe.tick();
        let reported = universe.changed_cells_count();
        let summary = backend.draw_frame(&mut universe).unwrap();

        assert_eq!(summary.total(), reported);
        assert_eq!(universe.changed_cells_count(), 0);
        assert_eq!(backend.surface().unwrap().fill_changes() - fills_before, 2);
    }

    #[test]
    fn test_empty_frame_is_noop() {
        let mut universe = Universe::new(8, 8, Some(2));
        let mut backend = backend(&universe);
        let before = backend.surface().unwrap().clone();

        let summary = backend.draw_frame(&mut universe).unwrap();
        assert_eq!(summary, DrawSummary::default());
        assert_eq!(backend.surface().unwrap().as_rgba(), before.as_rgba());
        assert_eq!(backend.surface().unwrap().fill_changes(), before.fill_changes());
    }

    #[test]
    fn test_custom_palette() {
        let palette = Palette {
            alive: Color::rgb(200, 0, 0),
            dead: Color::rgb(0, 0, 50),
        };
        let mut universe = Universe::empty(2, 2);
        let mut backend = RasterBackend::new(palette);
        backend
            .initialize(PixelSurface::new(20, 20), &universe)
            .unwrap();

        universe.toggle_cell(0, 1);
        backend.draw_frame(&mut universe).unwrap();
        let surface = backend.surface().unwrap();
        assert_eq!(surface.pixel(15, 5), Some([200, 0, 0, 255]));
        assert_eq!(surface.pixel(5, 15), Some([0, 0, 50, 255]));
    }

    #[test]
    fn test_map_pointer_clamps() {
        let universe = Universe::empty(4, 4);
        let backend = backend(&universe);
        let bounds = BoundingRect {
            left: 0.0,
            top: 0.0,
            width: 40.0,
            height: 40.0,
        };

        let origin = PointerInput {
            client_x: 0.0,
            client_y: 0.0,
            bounds,
        };
        assert_eq!(backend.map_pointer(&origin).unwrap(), CellCoordinates(0, 0));

        let beyond = PointerInput {
            client_x: 400.0,
            client_y: 90.0,
            bounds,
        };
        assert_eq!(backend.map_pointer(&beyond).unwrap(), CellCoordinates(3, 3));

        let inside = PointerInput {
            client_x: 25.0,
            client_y: 12.0,
            bounds,
        };
        assert_eq!(backend.map_pointer(&inside).unwrap(), CellCoordinates(1, 2));
    }
}
