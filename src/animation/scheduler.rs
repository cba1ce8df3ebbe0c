//! Animation scheduler: the `Running` / `Paused` frame loop.

use crate::engine::Engine;
use crate::render::{DrawSummary, RenderBackend, RenderError};

use super::{FrameHost, FrameObserver};

/// Drives the frame loop through a [`FrameHost`].
///
/// The pending request handle is the whole run state: it is `Some` exactly
/// while the animation is running, and at most one request is outstanding.
pub struct Scheduler<H: FrameHost> {
    host: H,
    handle: Option<H::Handle>,
    steps_per_frame: u32,
    frames: u64,
}

impl<H: FrameHost> Scheduler<H> {
    /// Create a paused scheduler advancing `steps_per_frame` ticks per frame.
    pub fn new(host: H, steps_per_frame: u32) -> Self {
        Self {
            host,
            handle: None,
            steps_per_frame,
            frames: 0,
        }
    }

    /// `true` iff no frame request is pending.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.handle.is_none()
    }

    /// Enter `Running` by requesting the first frame. No-op when running.
    /// Stays `Paused` if the host refuses the request.
    ///
    /// Returns whether the state changed.
    pub fn start(&mut self) -> bool {
        if !self.is_paused() {
            return false;
        }
        self.handle = self.host.request_frame();
        match self.handle {
            Some(_) => {
                log::debug!("Animation started");
                true
            }
            None => {
                log::error!("Host refused the first frame request, animation stays paused");
                false
            }
        }
    }

    /// Cancel the pending request and enter `Paused`. No-op when paused.
    ///
    /// Returns whether the state changed.
    pub fn pause(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                self.host.cancel_frame(handle);
                log::debug!("Animation paused after {} frames", self.frames);
                true
            }
            None => false,
        }
    }

    /// Body of one scheduled frame: report the timestamp, advance the engine,
    /// draw, and request the next frame.
    ///
    /// A delivery that arrives while paused is stale and is ignored, so a
    /// cancelled loop never touches the backend again. If drawing fails the
    /// loop stops in `Paused` and the error is returned.
    pub fn run_frame(
        &mut self,
        engine: &mut dyn Engine,
        backend: &mut dyn RenderBackend,
        observer: &mut dyn FrameObserver,
    ) -> Result<Option<DrawSummary>, RenderError> {
        if self.handle.take().is_none() {
            log::warn!("Ignoring frame delivered while paused");
            return Ok(None);
        }

        observer.on_frame(self.host.now());

        for _ in 0..self.steps_per_frame {
            engine.tick();
        }

        let summary = backend.draw_frame(engine)?;
        self.frames += 1;

        self.handle = self.host.request_frame();
        if self.handle.is_none() {
            log::error!("Host refused the next frame request, animation paused");
        }
        Ok(Some(summary))
    }

    /// Frames drawn by the loop so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn steps_per_frame(&self) -> u32 {
        self.steps_per_frame
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give the host back. Pause first if a request may still be pending.
    pub fn into_host(self) -> H {
        self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::HeadlessHost;
    use crate::engine::Universe;
    use crate::render::{PixelSurface, RasterBackend};
    use crate::schema::Palette;

    fn fixture() -> (Universe, RasterBackend<PixelSurface>) {
        let universe = Universe::new(8, 8, Some(21));
        let mut backend = RasterBackend::new(Palette::default());
        backend
            .initialize(PixelSurface::new(80, 80), &universe)
            .unwrap();
        (universe, backend)
    }

    #[test]
    fn test_starts_paused() {
        let scheduler = Scheduler::new(HeadlessHost::default(), 3);
        assert!(scheduler.is_paused());
        assert_eq!(scheduler.host().pending(), None);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut scheduler = Scheduler::new(HeadlessHost::default(), 3);
        assert!(scheduler.start());
        let pending = scheduler.host().pending();
        assert!(!scheduler.start());
        assert_eq!(scheduler.host().pending(), pending);
        assert!(!scheduler.is_paused());
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut scheduler = Scheduler::new(HeadlessHost::default(), 3);
        scheduler.start();
        assert!(scheduler.pause());
        assert!(!scheduler.pause());
        assert!(scheduler.is_paused());
        assert_eq!(scheduler.host().pending(), None);
        assert_eq!(scheduler.host().cancelled(), 1);
    }

    #[test]
    fn test_frame_ticks_draws_and_reschedules() {
        let (mut universe, mut backend) = fixture();
        let mut expected = Universe::new(8, 8, Some(21));
        let mut timestamps = Vec::new();
        let mut observer = |t: f64| timestamps.push(t);

        let mut scheduler = Scheduler::new(HeadlessHost::new(16.0), 3);
        scheduler.start();
        for _ in 0..4 {
            scheduler.host_mut().deliver().unwrap();
            let summary = scheduler
                .run_frame(&mut universe, &mut backend, &mut observer)
                .unwrap();
            assert!(summary.is_some());
            assert_eq!(universe.changed_cells_count(), 0);
            assert!(!scheduler.is_paused());
        }

        for _ in 0..12 {
            expected.tick();
        }
        assert_eq!(universe.cells(), expected.cells());
        assert_eq!(scheduler.frames(), 4);
        assert_eq!(timestamps, vec![16.0, 32.0, 48.0, 64.0]);
    }

    #[test]
    fn test_stale_delivery_is_ignored() {
        let (mut universe, mut backend) = fixture();
        let before = universe.cells().to_vec();
        let mut calls = 0;
        let mut observer = |_: f64| calls += 1;

        let mut scheduler = Scheduler::new(HeadlessHost::default(), 3);
        scheduler.start();
        scheduler.pause();

        let result = scheduler
            .run_frame(&mut universe, &mut backend, &mut observer)
            .unwrap();
        assert!(result.is_none());
        assert_eq!(calls, 0);
        assert_eq!(universe.cells(), before.as_slice());
        assert!(scheduler.is_paused());
    }

    /// Grants a fixed number of frame requests, then refuses.
    struct LimitedHost {
        remaining: usize,
        next: u64,
    }

    impl FrameHost for LimitedHost {
        type Handle = u64;

        fn request_frame(&mut self) -> Option<u64> {
            if self.remaining == 0 {
                return None;
            }
            self.remaining -= 1;
            self.next += 1;
            Some(self.next)
        }

        fn cancel_frame(&mut self, _handle: u64) {}

        fn now(&self) -> f64 {
            self.next as f64 * 16.0
        }
    }

    #[test]
    fn test_refused_start_stays_paused() {
        let host = LimitedHost {
            remaining: 0,
            next: 0,
        };
        let mut scheduler = Scheduler::new(host, 3);
        assert!(!scheduler.start());
        assert!(scheduler.is_paused());
    }

    #[test]
    fn test_refused_rerequest_pauses_loop() {
        let (mut universe, mut backend) = fixture();
        let mut observer = |_: f64| {};
        let host = LimitedHost {
            remaining: 1,
            next: 0,
        };

        let mut scheduler = Scheduler::new(host, 1);
        assert!(scheduler.start());

        let first = scheduler
            .run_frame(&mut universe, &mut backend, &mut observer)
            .unwrap();
        assert!(first.is_some());
        assert!(scheduler.is_paused());
        assert_eq!(scheduler.frames(), 1);

        // Nothing further is scheduled, so a later delivery is stale.
        let second = scheduler
            .run_frame(&mut universe, &mut backend, &mut observer)
            .unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn test_draw_failure_stops_loop() {
        let mut universe = Universe::new(4, 4, Some(3));
        let mut backend = RasterBackend::<PixelSurface>::new(Palette::default());
        let mut observer = |_: f64| {};

        let mut scheduler = Scheduler::new(HeadlessHost::default(), 1);
        scheduler.start();
        scheduler.host_mut().deliver();
        let result = scheduler.run_frame(&mut universe, &mut backend, &mut observer);

        assert!(matches!(result, Err(RenderError::NotInitialized)));
        assert!(scheduler.is_paused());
        assert_eq!(scheduler.host().pending(), None);
    }
}
