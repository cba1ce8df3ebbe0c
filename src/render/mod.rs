//! Render module - incremental drawing of changed cells.
//!
//! Two interchangeable backends share one contract ([`RenderBackend`]):
//!
//! - [`RasterBackend`]: immediate-mode fills into a [`RasterSurface`]
//! - [`SceneBackend`]: one persistent primitive per cell in a retained
//!   [`Scene`], toggled in and out of the visible group
//!
//! Both read the engine's changed-cell list through a [`ChangeSet`], repaint
//! only those cells, and drain the list before returning.

mod extract;
mod pointer;
mod raster;
mod scene;
mod surface;

pub use extract::*;
pub use pointer::*;
pub use raster::*;
pub use scene::*;
pub use surface::*;

use crate::engine::{CellCoordinates, Engine};

/// Drawing strategy selected once when a view is composed.
pub trait RenderBackend {
    /// Whether `initialize` has completed.
    fn is_initialized(&self) -> bool;

    /// Repaint the cells in the engine's changed-cell list, then clear it.
    ///
    /// Fails with [`RenderError::NotInitialized`] before initialization.
    fn draw_frame(&mut self, engine: &mut dyn Engine) -> Result<DrawSummary, RenderError>;

    /// Grid cell under a pointer, using this backend's cell size and row axis.
    fn map_pointer(&self, pointer: &PointerInput) -> Result<CellCoordinates, RenderError>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn is_initialized(&self) -> bool {
        (**self).is_initialized()
    }

    fn draw_frame(&mut self, engine: &mut dyn Engine) -> Result<DrawSummary, RenderError> {
        (**self).draw_frame(engine)
    }

    fn map_pointer(&self, pointer: &PointerInput) -> Result<CellCoordinates, RenderError> {
        (**self).map_pointer(pointer)
    }
}

/// Cells repainted by one `draw_frame` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawSummary {
    /// Changed records painted alive.
    pub alive: usize,
    /// Changed records painted dead.
    pub dead: usize,
}

impl DrawSummary {
    pub fn total(&self) -> usize {
        self.alive + self.dead
    }
}

/// Side length of a square cell that covers the whole surface: the smaller
/// of the per-axis ratios, rounded up to whole pixels.
pub fn cell_size_for(surface: (f64, f64), width: u16, height: u16) -> Result<f64, RenderError> {
    let (surface_width, surface_height) = surface;
    if !(surface_width > 0.0 && surface_height > 0.0) {
        return Err(RenderError::InvalidSurface {
            width: surface_width,
            height: surface_height,
        });
    }
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyGrid);
    }
    let size = (surface_width / width as f64).min(surface_height / height as f64);
    Ok(size.ceil())
}

/// Fail unless `grid` has the dimensions a backend was initialized with.
pub(crate) fn ensure_dimensions(
    grid: &GridView<'_>,
    width: u16,
    height: u16,
) -> Result<(), RenderError> {
    if grid.width() != width || grid.height() != height {
        return Err(RenderError::DimensionMismatch {
            width,
            height,
            actual_width: grid.width(),
            actual_height: grid.height(),
        });
    }
    Ok(())
}

/// Rendering errors. These indicate lifecycle bugs or an engine that breaks
/// its buffer contract, never user input.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Backend used before initialize()")]
    NotInitialized,
    #[error("Grid dimensions must be non-zero")]
    EmptyGrid,
    #[error("Cell buffer holds {actual} cells, expected width * height = {expected}")]
    BufferMismatch { expected: usize, actual: usize },
    #[error("Engine grid is {actual_width}x{actual_height}, backend was initialized for {width}x{height}")]
    DimensionMismatch {
        width: u16,
        height: u16,
        actual_width: u16,
        actual_height: u16,
    },
    #[error("Changed cell ({row}, {column}) lies outside the {width}x{height} grid")]
    CoordinateOutOfRange {
        row: u16,
        column: u16,
        width: u16,
        height: u16,
    },
    #[error("Surface size {width}x{height} cannot hold a grid")]
    InvalidSurface { width: f64, height: f64 },
}
