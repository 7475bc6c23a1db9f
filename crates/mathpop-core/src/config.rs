//! Difficulty tables, player settings and their validation.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::{Difficulty, Operation};
use crate::types::NumberRange;

/// Rejected configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one operation must be enabled")]
    NoOperations,
    #[error("at least one number range must be configured")]
    NoRanges,
    #[error("invalid number range: min {min} is greater than max {max}")]
    InvalidRange { min: i32, max: i32 },
    #[error("lives must be at least 1")]
    ZeroLives,
    #[error("target count must be at least 1")]
    ZeroTargetCount,
    #[error("round time must be at least one timer step (0.1s), got {0}")]
    InvalidRoundTime(f32),
    #[error("spawn interval must be positive")]
    ZeroSpawnInterval,
    #[error("target rise speed must be positive, got {0}")]
    InvalidRiseSpeed(f32),
    #[error("no entry for difficulty {0}")]
    MissingTier(Difficulty),
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_rise_speed() -> f32 {
    DEFAULT_TARGET_RISE_SPEED
}

/// Per-tier arcade tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    pub round_time_secs: f32,
    pub lives: u32,
    pub spawn_interval_ms: u64,
    pub target_count: u32,
    #[serde(default = "default_rise_speed")]
    pub target_rise_speed: f32,
}

impl DifficultySettings {
    /// Built-in values for a tier.
    pub fn for_tier(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                round_time_secs: EASY_ROUND_TIME_SECS,
                lives: EASY_LIVES,
                spawn_interval_ms: EASY_SPAWN_INTERVAL_MS,
                target_count: EASY_TARGET_COUNT,
                target_rise_speed: EASY_RISE_SPEED,
            },
            Difficulty::Medium => Self {
                round_time_secs: MEDIUM_ROUND_TIME_SECS,
                lives: MEDIUM_LIVES,
                spawn_interval_ms: MEDIUM_SPAWN_INTERVAL_MS,
                target_count: MEDIUM_TARGET_COUNT,
                target_rise_speed: MEDIUM_RISE_SPEED,
            },
            Difficulty::Hard => Self {
                round_time_secs: HARD_ROUND_TIME_SECS,
                lives: HARD_LIVES,
                spawn_interval_ms: HARD_SPAWN_INTERVAL_MS,
                target_count: HARD_TARGET_COUNT,
                target_rise_speed: HARD_RISE_SPEED,
            },
        }
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    /// Round duration, rounded to whole milliseconds.
    pub fn round_time(&self) -> Duration {
        Duration::from_millis((self.round_time_secs.max(0.0) * 1000.0).round() as u64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        if self.target_count == 0 {
            return Err(ConfigError::ZeroTargetCount);
        }
        if !(self.round_time_secs.is_finite() && self.round_time() >= TIMER_STEP) {
            return Err(ConfigError::InvalidRoundTime(self.round_time_secs));
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        if !(self.target_rise_speed.is_finite() && self.target_rise_speed > 0.0) {
            return Err(ConfigError::InvalidRiseSpeed(self.target_rise_speed));
        }
        Ok(())
    }
}

/// Difficulty → arcade tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifficultyTable {
    tiers: BTreeMap<Difficulty, DifficultySettings>,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            tiers: Difficulty::ALL
                .iter()
                .map(|&d| (d, DifficultySettings::for_tier(d)))
                .collect(),
        }
    }
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> Result<&DifficultySettings, ConfigError> {
        self.tiers
            .get(&difficulty)
            .ok_or(ConfigError::MissingTier(difficulty))
    }

    pub fn insert(&mut self, difficulty: Difficulty, settings: DifficultySettings) {
        self.tiers.insert(difficulty, settings);
    }

    /// Every tier present and every entry valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for difficulty in Difficulty::ALL {
            self.get(difficulty)?.validate()?;
        }
        Ok(())
    }

    /// Parse and validate a JSON table.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }
}

/// Difficulty → default operand ranges, used when the player chose none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumberRangeTable {
    tiers: BTreeMap<Difficulty, Vec<NumberRange>>,
}

impl Default for NumberRangeTable {
    fn default() -> Self {
        Self {
            tiers: Difficulty::ALL
                .iter()
                .map(|&d| (d, vec![d.full_range()]))
                .collect(),
        }
    }
}

impl NumberRangeTable {
    pub fn ranges_for(&self, difficulty: Difficulty) -> Result<&[NumberRange], ConfigError> {
        let ranges = self
            .tiers
            .get(&difficulty)
            .ok_or(ConfigError::MissingTier(difficulty))?;
        if ranges.is_empty() {
            return Err(ConfigError::NoRanges);
        }
        Ok(ranges)
    }

    pub fn insert(&mut self, difficulty: Difficulty, ranges: Vec<NumberRange>) {
        self.tiers.insert(difficulty, ranges);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for difficulty in Difficulty::ALL {
            self.ranges_for(difficulty)?;
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }
}

/// What the player picked on the settings screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub difficulty: Difficulty,
    pub operations: Vec<Operation>,
    /// Explicit operand ranges. `None` means the tier defaults.
    #[serde(default)]
    pub number_ranges: Option<Vec<NumberRange>>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            operations: vec![Operation::Add, Operation::Sub],
            number_ranges: None,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operations.is_empty() {
            return Err(ConfigError::NoOperations);
        }
        if matches!(&self.number_ranges, Some(ranges) if ranges.is_empty()) {
            return Err(ConfigError::NoRanges);
        }
        Ok(())
    }

    /// The ranges questions draw their first operand from.
    pub fn resolve_ranges(&self, table: &NumberRangeTable) -> Result<Vec<NumberRange>, ConfigError> {
        match &self.number_ranges {
            Some(ranges) if ranges.is_empty() => Err(ConfigError::NoRanges),
            Some(ranges) => Ok(ranges.clone()),
            None => Ok(table.ranges_for(self.difficulty)?.to_vec()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }
}
