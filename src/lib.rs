//! Life View - incremental rendering and scheduling for Conway's Game of Life.
//!
//! The engine keeps a list of cells whose state changed since the last draw.
//! Renderers repaint only those cells, so a frame costs proportionally to
//! activity rather than to grid size.
//!
//! # Architecture
//!
//! - `engine`: the universe, its change list and insertable patterns
//! - `render`: change-set extraction plus raster and scene-graph backends
//! - `animation`: frame scheduler, frame hosts and frame rate statistics
//! - `interaction`: pointer clicks to cell toggles and pattern inserts
//! - `view`: one mounted view owning all of the above
//! - `schema`: JSON configuration
//!
//! # Example
//!
//! ```rust
//! use life_view::{
//!     animation::HeadlessHost,
//!     engine::Universe,
//!     render::{PixelSurface, RasterBackend},
//!     schema::ViewConfig,
//!     view::AnimationView,
//! };
//!
//! let config = ViewConfig::default();
//! let universe = Universe::new(64, 64, Some(7));
//!
//! let mut backend = RasterBackend::new(config.palette);
//! backend.initialize(PixelSurface::new(256, 256), &universe)?;
//!
//! let mut view = AnimationView::mount(universe, backend, HeadlessHost::default(), &config)?;
//! view.start();
//! view.run_frames(30)?;
//!
//! println!("{} live cells at {} fps", view.engine().live_count(), view.frame_rate().mean);
//! # Ok::<(), life_view::render::RenderError>(())
//! ```

pub mod animation;
pub mod engine;
pub mod interaction;
pub mod render;
pub mod schema;
pub mod view;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use animation::{FrameRateStats, FrameRateTracker, HeadlessHost, Scheduler};
pub use engine::{Cell, CellCoordinates, Engine, Universe};
pub use render::{RasterBackend, RenderBackend, RenderError, SceneBackend};
pub use schema::{BackendKind, ViewConfig};
pub use view::AnimationView;
