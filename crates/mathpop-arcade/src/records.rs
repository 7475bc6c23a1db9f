//! Record store collaborator: best scores and finished-session history.

use std::collections::BTreeMap;

use thiserror::Error;

use mathpop_core::enums::Difficulty;
use mathpop_core::types::SessionSummary;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("record store data is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Persists the outcome of finished sessions.
pub trait RecordStore {
    /// Highest final score recorded for `difficulty`, 0 when none.
    fn best_score(&self, difficulty: Difficulty) -> u32;

    /// Store a finished session.
    fn record(&mut self, summary: &SessionSummary) -> Result<(), RecordError>;
}

/// Keeps everything in memory. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    best: BTreeMap<Difficulty, u32>,
    history: Vec<SessionSummary>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[SessionSummary] {
        &self.history
    }
}

impl RecordStore for InMemoryRecordStore {
    fn best_score(&self, difficulty: Difficulty) -> u32 {
        self.best.get(&difficulty).copied().unwrap_or(0)
    }

    fn record(&mut self, summary: &SessionSummary) -> Result<(), RecordError> {
        let best = self.best.entry(summary.difficulty).or_insert(0);
        *best = (*best).max(summary.final_score);
        self.history.push(summary.clone());
        Ok(())
    }
}
