//! Game constants and tuning parameters.

use std::time::Duration;

/// Game loop tick rate (Hz) used by real-time drivers.
pub const TICK_RATE: u32 = 30;

/// Nominal duration of one game loop tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

// --- Question generation ---

/// Attempts the generator makes before giving up and returning the fallback question.
pub const MAX_GENERATION_ATTEMPTS: u32 = 1000;

/// Full operand interval for the Easy tier (inclusive).
pub const EASY_RANGE: (i32, i32) = (1, 10);

/// Full operand interval for the Medium tier (inclusive).
pub const MEDIUM_RANGE: (i32, i32) = (1, 100);

/// Full operand interval for the Hard tier (inclusive).
pub const HARD_RANGE: (i32, i32) = (0, 1000);

// --- Distractors ---

/// Largest absolute offset applied to the correct answer when making a distractor.
pub const DISTRACTOR_MAX_OFFSET: i32 = 10;

/// Perturbation attempts per distractor before the fallback value is taken.
pub const DISTRACTOR_MAX_ATTEMPTS: u32 = 20;

/// Number of options shown in multiple-choice mode.
pub const MULTIPLE_CHOICE_OPTIONS: usize = 4;

// --- Arcade timing ---

/// Granularity of the round timer. `TimerUpdated` fires once per step.
pub const TIMER_STEP: Duration = Duration::from_millis(100);

/// Pause between a round outcome and the next round.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

// --- Playfield ---

/// Playfield width in abstract units. Targets spawn across this width.
pub const PLAYFIELD_WIDTH: f32 = 9.0;

/// Height at which a rising target leaves the visible area.
pub const PLAYFIELD_TOP: f32 = 16.0;

/// Height at which targets appear.
pub const TARGET_SPAWN_Y: f32 = 0.0;

/// Random horizontal jitter applied inside a spawn lane (fraction of lane width).
pub const TARGET_LANE_JITTER: f32 = 0.3;

/// Default rise speed (units per second) when a difficulty entry omits it.
pub const DEFAULT_TARGET_RISE_SPEED: f32 = 2.0;

// --- Default difficulty tiers ---

pub const EASY_ROUND_TIME_SECS: f32 = 15.0;
pub const EASY_LIVES: u32 = 5;
pub const EASY_SPAWN_INTERVAL_MS: u64 = 1200;
pub const EASY_TARGET_COUNT: u32 = 4;
pub const EASY_RISE_SPEED: f32 = 1.5;

pub const MEDIUM_ROUND_TIME_SECS: f32 = 12.0;
pub const MEDIUM_LIVES: u32 = 3;
pub const MEDIUM_SPAWN_INTERVAL_MS: u64 = 1000;
pub const MEDIUM_TARGET_COUNT: u32 = 5;
pub const MEDIUM_RISE_SPEED: f32 = 2.0;

pub const HARD_ROUND_TIME_SECS: f32 = 10.0;
pub const HARD_LIVES: u32 = 3;
pub const HARD_SPAWN_INTERVAL_MS: u64 = 800;
pub const HARD_TARGET_COUNT: u32 = 6;
pub const HARD_RISE_SPEED: f32 = 2.6;
