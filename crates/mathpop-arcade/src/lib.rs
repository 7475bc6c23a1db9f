//! Arcade mode for MATHPOP.
//!
//! Owns the timed "pop the correct balloon" loop: the spawn scheduler, the
//! round controller (answer targets as hecs entities), the round timer and
//! the session orchestrator with lives, score and game over. Driven by
//! `tick(dt)` and produces `SessionSnapshot`s for the presentation layer.

pub mod clock;
pub mod records;
pub mod round;
pub mod session;
pub mod settings;
pub mod systems;

pub use mathpop_core as core;
pub use clock::{FrameClock, ManualClock, WallClock};
pub use records::{InMemoryRecordStore, RecordError, RecordStore};
pub use round::{ArcadeRoundController, RoundOutcome};
pub use session::{ArcadeGameSession, SessionConfig, SessionError};
pub use settings::{InMemorySettings, SettingsError, SettingsRepository};
pub use systems::spawn_scheduler::ArcadeSpawnScheduler;

#[cfg(test)]
mod tests;
