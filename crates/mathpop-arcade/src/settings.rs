//! Settings repository collaborator.

use thiserror::Error;

use mathpop_core::config::{ConfigError, DifficultyTable, GameSettings, NumberRangeTable};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the player's settings and the tuning tables.
pub trait SettingsRepository {
    fn load_settings(&self) -> Result<GameSettings, SettingsError>;

    fn difficulty_table(&self) -> Result<DifficultyTable, SettingsError> {
        Ok(DifficultyTable::default())
    }

    fn number_range_table(&self) -> Result<NumberRangeTable, SettingsError> {
        Ok(NumberRangeTable::default())
    }
}

/// Fixed settings held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettings {
    pub settings: GameSettings,
    pub difficulty_table: DifficultyTable,
    pub number_range_table: NumberRangeTable,
}

impl InMemorySettings {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }
}

impl SettingsRepository for InMemorySettings {
    fn load_settings(&self) -> Result<GameSettings, SettingsError> {
        Ok(self.settings.clone())
    }

    fn difficulty_table(&self) -> Result<DifficultyTable, SettingsError> {
        Ok(self.difficulty_table.clone())
    }

    fn number_range_table(&self) -> Result<NumberRangeTable, SettingsError> {
        Ok(self.number_range_table.clone())
    }
}
