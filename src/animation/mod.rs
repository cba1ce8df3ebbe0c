//! Animation module - the frame loop and frame rate statistics.
//!
//! The [`Scheduler`] owns the loop. Each delivered frame runs, in order:
//!
//! ```text
//! observer.on_frame(now)        frame rate sample
//! engine.tick() x steps         fixed steps per displayed frame
//! backend.draw_frame(engine)    repaint changed cells, drain the list
//! host.request_frame()          store the handle for the next frame
//! ```
//!
//! Scheduling is delegated to a [`FrameHost`] (`requestAnimationFrame` in
//! the browser, [`HeadlessHost`] natively), so the loop itself never blocks
//! and never owns a timer.

mod frame_rate;
mod host;
mod scheduler;

pub use frame_rate::{FrameObserver, FrameRateStats, FrameRateTracker};
pub use host::{FrameHandle, FrameHost, HeadlessHost};
pub use scheduler::Scheduler;
