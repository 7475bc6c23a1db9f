//! Per-tick systems driven by the arcade session.
//!
//! Systems own no session state. They advance an accumulator or operate on
//! the target world they are handed.

pub mod movement;
pub mod round_timer;
pub mod snapshot;
pub mod spawn_scheduler;
