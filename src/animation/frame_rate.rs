//! Sliding-window frame rate statistics.

use std::collections::VecDeque;

use serde::Serialize;

/// Receives the timestamp of every animation frame.
pub trait FrameObserver {
    fn on_frame(&mut self, timestamp_ms: f64);
}

impl<F: FnMut(f64)> FrameObserver for F {
    fn on_frame(&mut self, timestamp_ms: f64) {
        self(timestamp_ms)
    }
}

/// Frame rates for display, each rounded to the nearest integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameRateStats {
    pub latest: i64,
    pub mean: i64,
    pub min: i64,
    pub max: i64,
}

/// Keeps the most recent instantaneous frame rates and their statistics.
#[derive(Debug, Clone)]
pub struct FrameRateTracker {
    samples: VecDeque<f64>,
    capacity: usize,
    last_timestamp_ms: f64,
    stats: FrameRateStats,
}

/// Round for display, substituting 0 for infinities and NaN.
fn display(value: f64) -> i64 {
    if value.is_finite() {
        value.round() as i64
    } else {
        0
    }
}

impl FrameRateTracker {
    /// Tracker holding up to `capacity` samples, measuring the first frame
    /// from `origin_ms`.
    pub fn new(capacity: usize, origin_ms: f64) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
            last_timestamp_ms: origin_ms,
            stats: FrameRateStats::default(),
        }
    }

    /// Record a frame at `timestamp_ms` and recompute the statistics.
    ///
    /// A zero-length interval has no finite rate: it reports a latest rate
    /// of 0 and is kept out of the window.
    pub fn record(&mut self, timestamp_ms: f64) -> FrameRateStats {
        let delta = timestamp_ms - self.last_timestamp_ms;
        self.last_timestamp_ms = timestamp_ms;
        let fps = 1000.0 / delta;

        if fps.is_finite() {
            self.samples.push_back(fps);
            if self.samples.len() > self.capacity {
                self.samples.pop_front();
            }
        }

        let (sum, min, max) = self.samples.iter().fold(
            (0.0, f64::INFINITY, f64::NEG_INFINITY),
            |(sum, min, max), &sample| (sum + sample, min.min(sample), max.max(sample)),
        );
        let mean = sum / self.samples.len() as f64;

        self.stats = FrameRateStats {
            latest: display(fps),
            mean: display(mean),
            min: display(min),
            max: display(max),
        };
        self.stats
    }

    pub fn stats(&self) -> FrameRateStats {
        self.stats
    }

    /// Samples in the window, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl FrameObserver for FrameRateTracker {
    fn on_frame(&mut self, timestamp_ms: f64) {
        self.record(timestamp_ms);
    }
}
