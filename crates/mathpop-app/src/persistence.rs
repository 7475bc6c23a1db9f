//! JSON-file collaborators: settings on disk and a best-score record file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use mathpop_arcade::{RecordError, RecordStore, SettingsError, SettingsRepository};
use mathpop_core::config::{DifficultyTable, GameSettings, NumberRangeTable};
use mathpop_core::enums::Difficulty;
use mathpop_core::types::SessionSummary;

/// Contents of the record file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFile {
    #[serde(default)]
    pub best: BTreeMap<Difficulty, u32>,
    #[serde(default)]
    pub history: Vec<SessionSummary>,
}

/// Record store backed by a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record file. A missing file is an empty record.
    pub fn load(&self) -> Result<RecordFile, RecordError> {
        if !self.path.exists() {
            return Ok(RecordFile::default());
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&self, file: &RecordFile) -> Result<(), RecordError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl RecordStore for JsonRecordStore {
    fn best_score(&self, difficulty: Difficulty) -> u32 {
        match self.load() {
            Ok(file) => file.best.get(&difficulty).copied().unwrap_or(0),
            Err(e) => {
                warn!("could not read records from {}: {e}", self.path.display());
                0
            }
        }
    }

    fn record(&mut self, summary: &SessionSummary) -> Result<(), RecordError> {
        let mut file = self.load()?;
        let best = file.best.entry(summary.difficulty).or_insert(0);
        *best = (*best).max(summary.final_score);
        file.history.push(summary.clone());
        self.save(&file)
    }
}

/// Settings read from JSON files, with built-in values for anything not given.
#[derive(Debug, Clone, Default)]
pub struct JsonSettingsRepository {
    /// Used when no settings file is configured.
    pub fallback: GameSettings,
    pub settings_path: Option<PathBuf>,
    pub difficulty_path: Option<PathBuf>,
    pub ranges_path: Option<PathBuf>,
}

impl JsonSettingsRepository {
    pub fn new(fallback: GameSettings) -> Self {
        Self {
            fallback,
            ..Self::default()
        }
    }

    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn with_difficulty_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.difficulty_path = Some(path.into());
        self
    }

    pub fn with_ranges_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ranges_path = Some(path.into());
        self
    }
}

impl SettingsRepository for JsonSettingsRepository {
    fn load_settings(&self) -> Result<GameSettings, SettingsError> {
        match &self.settings_path {
            Some(path) => Ok(GameSettings::from_json(&fs::read_to_string(path)?)?),
            None => {
                self.fallback.validate()?;
                Ok(self.fallback.clone())
            }
        }
    }

    fn difficulty_table(&self) -> Result<DifficultyTable, SettingsError> {
        match &self.difficulty_path {
            Some(path) => Ok(DifficultyTable::from_json(&fs::read_to_string(path)?)?),
            None => Ok(DifficultyTable::default()),
        }
    }

    fn number_range_table(&self) -> Result<NumberRangeTable, SettingsError> {
        match &self.ranges_path {
            Some(path) => Ok(NumberRangeTable::from_json(&fs::read_to_string(path)?)?),
            None => Ok(NumberRangeTable::default()),
        }
    }
}
