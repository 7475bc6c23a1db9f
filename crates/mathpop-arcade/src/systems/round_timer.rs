//! Round countdown in fixed steps.

use std::time::Duration;

use mathpop_core::constants::TIMER_STEP;
use mathpop_core::events::GameEvent;

/// Counts a round down in `TIMER_STEP` decrements. Expiry is reported once.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundTimer {
    remaining: Duration,
    accumulator: Duration,
    running: bool,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart from `total`.
    pub fn reset(&mut self, total: Duration) {
        self.remaining = total;
        self.accumulator = Duration::ZERO;
        self.running = !total.is_zero();
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn remaining_secs(&self) -> f32 {
        self.remaining.as_secs_f32()
    }

    /// Advance by `dt`, pushing a `TimerUpdated` per elapsed step.
    ///
    /// Returns `true` on the call where the timer reaches zero; the timer is
    /// stopped afterwards so later calls return `false`.
    pub fn advance(&mut self, dt: Duration, events: &mut Vec<GameEvent>) -> bool {
        if !self.running {
            return false;
        }
        self.accumulator += dt;
        while self.accumulator >= TIMER_STEP {
            self.accumulator -= TIMER_STEP;
            self.remaining = self.remaining.saturating_sub(TIMER_STEP);
            events.push(GameEvent::TimerUpdated {
                remaining_secs: self.remaining_secs(),
            });
            if self.remaining.is_zero() {
                self.stop();
                return true;
            }
        }
        false
    }
}
