//! Host scheduling primitives: cancellable frame requests and a clock.

/// The display host that delivers animation frames.
///
/// A request returns a handle that stays valid until the frame is delivered
/// or cancelled. Delivery itself is the host's business: it calls back into
/// the view on its own refresh cadence.
pub trait FrameHost {
    type Handle;

    /// Ask for one callback at the next display refresh.
    ///
    /// Returns `None` when the host cannot schedule a frame; no callback
    /// will arrive in that case.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    /// Withdraw a pending request.
    fn cancel_frame(&mut self, handle: Self::Handle);

    /// Monotonic timestamp in milliseconds.
    fn now(&self) -> f64;
}

/// Handle issued by [`HeadlessHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Deterministic host driven by the caller, for native runs and tests.
///
/// The clock only moves when a frame is delivered.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    clock_ms: f64,
    frame_interval_ms: f64,
    next_id: u64,
    pending: Option<FrameHandle>,
    cancelled: usize,
}

impl HeadlessHost {
    /// Host refreshing every `frame_interval_ms`, starting at time 0.
    pub fn new(frame_interval_ms: f64) -> Self {
        Self {
            clock_ms: 0.0,
            frame_interval_ms,
            next_id: 1,
            pending: None,
            cancelled: 0,
        }
    }

    /// Host refreshing at `hz` frames per second.
    pub fn with_refresh_rate(hz: f64) -> Self {
        Self::new(1000.0 / hz)
    }

    /// The outstanding request, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Number of requests withdrawn before delivery.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Advance the clock by one refresh interval and hand out the pending
    /// request for delivery.
    pub fn deliver(&mut self) -> Option<FrameHandle> {
        let handle = self.pending.take()?;
        self.clock_ms += self.frame_interval_ms;
        Some(handle)
    }

    /// Move the clock without delivering anything.
    pub fn advance(&mut self, ms: f64) {
        self.clock_ms += ms;
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::with_refresh_rate(60.0)
    }
}

impl FrameHost for HeadlessHost {
    type Handle = FrameHandle;

    fn request_frame(&mut self) -> Option<FrameHandle> {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        if let Some(stale) = self.pending.replace(handle) {
            log::warn!("Frame request {:?} superseded before delivery", stale);
        }
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }

    fn now(&self) -> f64 {
        self.clock_ms
    }
}
