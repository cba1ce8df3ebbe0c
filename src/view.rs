//! A mounted view: one engine, one backend, one frame loop.
//!
//! [`AnimationView`] is created when a view mounts and consumed when it
//! unmounts. It owns every piece of per-view state, so nothing about the
//! universe, the active backend or the pending frame lives in globals.

use crate::animation::{FrameHost, FrameRateStats, FrameRateTracker, HeadlessHost, Scheduler};
use crate::engine::Engine;
use crate::interaction::{ClickEvent, ClickOutcome, handle_click};
use crate::render::{DrawSummary, RenderBackend, RenderError};
use crate::schema::ViewConfig;

/// Engine, backend, scheduler and frame rate tracker for one mounted view.
pub struct AnimationView<E: Engine, B: RenderBackend, H: FrameHost> {
    engine: E,
    backend: B,
    scheduler: Scheduler<H>,
    frame_rate: FrameRateTracker,
}

/// Parts handed back by [`AnimationView::unmount`].
pub struct Unmounted<E, B, H> {
    pub engine: E,
    pub backend: B,
    pub host: H,
}

impl<E: Engine, B: RenderBackend, H: FrameHost> AnimationView<E, B, H> {
    /// Compose a view around an initialized backend. The view starts paused.
    pub fn mount(engine: E, backend: B, host: H, config: &ViewConfig) -> Result<Self, RenderError> {
        if !backend.is_initialized() {
            return Err(RenderError::NotInitialized);
        }
        let frame_rate = FrameRateTracker::new(config.frame_rate_window, host.now());
        log::info!(
            "Mounted {}x{} universe, {} steps per frame",
            engine.width(),
            engine.height(),
            config.steps_per_frame
        );
        Ok(Self {
            engine,
            backend,
            scheduler: Scheduler::new(host, config.steps_per_frame),
            frame_rate,
        })
    }

    pub fn start(&mut self) -> bool {
        self.scheduler.start()
    }

    pub fn pause(&mut self) -> bool {
        self.scheduler.pause()
    }

    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    /// Play/pause button: flip between running and paused.
    /// Returns `true` if the view is now running.
    pub fn toggle_playback(&mut self) -> bool {
        if self.is_paused() {
            self.start()
        } else {
            self.pause();
            false
        }
    }

    /// Host callback for a delivered frame.
    pub fn on_animation_frame(&mut self) -> Result<Option<DrawSummary>, RenderError> {
        self.scheduler
            .run_frame(&mut self.engine, &mut self.backend, &mut self.frame_rate)
    }

    /// Draw pending changes now, regardless of the loop state.
    pub fn draw(&mut self) -> Result<DrawSummary, RenderError> {
        self.backend.draw_frame(&mut self.engine)
    }

    /// Toggle or stamp a pattern at the clicked cell and redraw.
    pub fn click(&mut self, event: &ClickEvent) -> Result<ClickOutcome, RenderError> {
        handle_click(&mut self.engine, &mut self.backend, event)
    }

    /// Clear button: kill every cell and redraw.
    pub fn clear(&mut self) -> Result<DrawSummary, RenderError> {
        self.engine.clear();
        self.draw()
    }

    /// Reset button: re-randomize the universe and redraw.
    pub fn reset(&mut self) -> Result<DrawSummary, RenderError> {
        self.engine.reset();
        self.draw()
    }

    pub fn frame_rate(&self) -> FrameRateStats {
        self.frame_rate.stats()
    }

    pub fn frames(&self) -> u64 {
        self.scheduler.frames()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn host(&self) -> &H {
        self.scheduler.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.scheduler.host_mut()
    }

    /// Tear the view down. The loop is paused before the backend is released,
    /// so no scheduled frame can reach it afterwards.
    pub fn unmount(mut self) -> Unmounted<E, B, H> {
        self.pause();
        log::info!("Unmounted after {} frames", self.scheduler.frames());
        let Self {
            engine,
            backend,
            scheduler,
            ..
        } = self;
        Unmounted {
            engine,
            backend,
            host: scheduler.into_host(),
        }
    }
}

impl<E: Engine, B: RenderBackend> AnimationView<E, B, HeadlessHost> {
    /// Deliver the pending frame, if any. Returns `false` once paused.
    pub fn pump(&mut self) -> Result<bool, RenderError> {
        if self.host_mut().deliver().is_none() {
            return Ok(false);
        }
        Ok(self.on_animation_frame()?.is_some())
    }

    /// Deliver up to `frames` frames, stopping early if the loop pauses.
    pub fn run_frames(&mut self, frames: u64) -> Result<u64, RenderError> {
        let mut delivered = 0;
        while delivered < frames && self.pump()? {
            delivered += 1;
        }
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CellCoordinates, Universe};
    use crate::interaction::Modifiers;
    use crate::render::{
        BoundingRect, PixelSurface, PointerInput, RasterBackend, SceneBackend, SoftwareRenderer,
    };
    use crate::schema::Palette;
    use proptest::prelude::*;

    type RasterView = AnimationView<Universe, RasterBackend<PixelSurface>, HeadlessHost>;

    const ALIVE: [u8; 4] = [0, 0, 0, 255];
    const DEAD: [u8; 4] = [255, 255, 255, 255];

    fn config(width: u16, height: u16) -> ViewConfig {
        let mut config = ViewConfig::default();
        config.universe.width = width;
        config.universe.height = height;
        config
    }

    fn raster_view(universe: Universe) -> RasterView {
        let config = config(universe.width(), universe.height());
        let mut backend = RasterBackend::new(config.palette);
        backend
            .initialize(PixelSurface::new(40, 40), &universe)
            .unwrap();
        AnimationView::mount(universe, backend, HeadlessHost::default(), &config).unwrap()
    }

    /// Each cell's color on the surface, sampled at the cell center.
    fn painted(view: &RasterView) -> Vec<bool> {
        let backend = view.backend();
        let size = backend.cell_size().unwrap() as u32;
        let surface = backend.surface().unwrap();
        let (width, height) = (view.engine().width(), view.engine().height());
        let mut cells = Vec::new();
        for row in 0..height as u32 {
            for column in 0..width as u32 {
                let px = surface
                    .pixel(column * size + size / 2, row * size + size / 2)
                    .unwrap();
                assert!(px == ALIVE || px == DEAD);
                cells.push(px == ALIVE);
            }
        }
        cells
    }

    fn alive(universe: &Universe) -> Vec<bool> {
        universe.cells().iter().map(|c| c.is_alive()).collect()
    }

    fn click_at(x: f64, y: f64) -> ClickEvent {
        ClickEvent {
            pointer: PointerInput {
                client_x: x,
                client_y: y,
                bounds: BoundingRect {
                    left: 0.0,
                    top: 0.0,
                    width: 40.0,
                    height: 40.0,
                },
            },
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn test_mount_requires_initialized_backend() {
        let universe = Universe::empty(4, 4);
        let backend = RasterBackend::<PixelSurface>::new(Palette::default());
        let result = AnimationView::mount(universe, backend, HeadlessHost::default(), &config(4, 4));
        assert!(matches!(result, Err(RenderError::NotInitialized)));
    }

    #[test]
    fn test_view_starts_paused_and_toggles() {
        let mut view = raster_view(Universe::empty(4, 4));
        assert!(view.is_paused());
        assert!(view.toggle_playback());
        assert!(!view.is_paused());
        assert!(!view.toggle_playback());
        assert!(view.is_paused());
    }

    #[test]
    fn test_running_view_matches_engine() {
        let mut view = raster_view(Universe::new(8, 8, Some(12)));
        view.start();
        assert_eq!(view.run_frames(20).unwrap(), 20);
        assert_eq!(painted(&view), alive(view.engine()));
        assert_eq!(view.engine().changed_cells_count(), 0);

        // 60 Hz headless host.
        let stats = view.frame_rate();
        assert_eq!(stats.latest, 60);
        assert_eq!(stats.mean, 60);
    }

    #[test]
    fn test_paused_view_delivers_nothing() {
        let mut view = raster_view(Universe::new(8, 8, Some(12)));
        let before = view.engine().cells().to_vec();
        assert_eq!(view.run_frames(5).unwrap(), 0);
        assert_eq!(view.engine().cells(), before.as_slice());
        assert_eq!(view.frames(), 0);
    }

    #[test]
    fn test_paused_click_still_redraws() {
        let mut view = raster_view(Universe::empty(4, 4));
        assert!(view.is_paused());

        let outcome = view.click(&click_at(15.0, 15.0)).unwrap();
        assert_eq!(outcome.cell, CellCoordinates(1, 1));
        let cells = painted(&view);
        assert!(cells[5]);
        assert_eq!(cells.iter().filter(|&&c| c).count(), 1);

        view.click(&click_at(15.0, 15.0)).unwrap();
        assert!(painted(&view).iter().all(|&c| !c));
        assert!(view.is_paused());
    }

    #[test]
    fn test_clear_and_reset_buttons() {
        let mut view = raster_view(Universe::new(8, 8, Some(30)));
        view.clear().unwrap();
        assert!(painted(&view).iter().all(|&c| !c));

        view.reset().unwrap();
        assert!(view.engine().live_count() > 0);
        assert_eq!(painted(&view), alive(view.engine()));
    }

    #[test]
    fn test_unmount_pauses_first() {
        let mut view = raster_view(Universe::new(8, 8, Some(1)));
        view.start();
        view.run_frames(3).unwrap();
        assert!(view.host().pending().is_some());

        let parts = view.unmount();
        assert_eq!(parts.host.pending(), None);
        assert_eq!(parts.host.cancelled(), 1);
        assert!(parts.backend.is_initialized());
    }

    #[test]
    fn test_boxed_scene_backend_view() {
        let universe = Universe::new(6, 6, Some(17));
        let config = config(6, 6);
        let mut scene = SceneBackend::new(config.palette, config.field_of_view);
        scene
            .initialize(SoftwareRenderer::new(PixelSurface::new(60, 60)), &universe)
            .unwrap();
        let backend: Box<dyn RenderBackend> = Box::new(scene);

        let mut view =
            AnimationView::mount(universe, backend, HeadlessHost::default(), &config).unwrap();
        view.start();
        assert_eq!(view.run_frames(4).unwrap(), 4);
        assert_eq!(view.engine().changed_cells_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_surface_tracks_engine(
            seed in any::<u64>(),
            ops in prop::collection::vec((0u8..4, 0u16..6, 0u16..6), 1..12),
        ) {
            let mut view = raster_view(Universe::new(6, 6, Some(seed)));
            for (op, row, column) in ops {
                let engine = &mut view.engine;
                match op {
                    0 => engine.tick(),
                    1 => engine.toggle_cell(row, column),
                    2 => engine.insert_glider(row, column),
                    _ => engine.insert_pulsar(row, column),
                }
                if column % 2 == 0 {
                    view.draw().unwrap();
                    prop_assert_eq!(painted(&view), alive(view.engine()));
                    prop_assert_eq!(view.engine().changed_cells_count(), 0);
                }
            }
            view.draw().unwrap();
            prop_assert_eq!(painted(&view), alive(view.engine()));
        }
    }
}
