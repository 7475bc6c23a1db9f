//! Frame clocks that feed `tick(dt)`.

use std::time::{Duration, Instant};

/// Source of per-frame time deltas.
pub trait FrameClock {
    /// Time elapsed since the previous call.
    fn delta(&mut self) -> Duration;
}

/// Fixed virtual steps. Deterministic; used by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    step: Duration,
}

impl ManualClock {
    pub fn new(step: Duration) -> Self {
        Self { step }
    }

    pub fn step(&self) -> Duration {
        self.step
    }
}

impl FrameClock for ManualClock {
    fn delta(&mut self) -> Duration {
        self.step
    }
}

/// Real elapsed time between calls.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    last: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for WallClock {
    fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        dt
    }
}
