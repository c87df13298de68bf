//! High-resolution timer for frame timing, plus a once-per-interval frame-rate sampler.

use std::time::{Duration, Instant};

/// High-resolution timer for measuring elapsed time.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    last_tick: Instant,
}

impl Timer {
    /// Create a new timer, starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
        }
    }

    /// Get the total elapsed time since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get the time elapsed since the last call to `tick()`.
    /// This is the delta time fed to `update` and `render` each frame.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last_tick;
        self.last_tick = now;
        delta
    }

    /// Reset the timer to the current time.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_tick = now;
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Samples the instantaneous frame rate at a fixed interval.
///
/// The window title shows `1 / dt` of the most recent frame once per
/// interval; between samples the counter stays quiet so the title is not
/// rewritten every frame.
#[derive(Debug)]
pub struct FpsCounter {
    interval: Duration,
    since_sample: Duration,
}

impl FpsCounter {
    /// Create a counter that reports once per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            since_sample: Duration::ZERO,
        }
    }

    /// Record a frame that took `dt`.
    ///
    /// Returns the frame rate derived from `dt` when the interval has elapsed,
    /// `None` otherwise. A zero `dt` never produces a sample.
    pub fn record(&mut self, dt: Duration) -> Option<f32> {
        self.since_sample += dt;
        if self.since_sample < self.interval || dt.is_zero() {
            return None;
        }
        self.since_sample = Duration::ZERO;
        Some(1.0 / dt.as_secs_f32())
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
