//! Events emitted by the arcade session for UI and audio feedback.

use serde::{Deserialize, Serialize};

use crate::enums::{GameState, LossReason};
use crate::types::{Question, SessionSummary, TargetId};

/// Everything the presentation layer may react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A new round asks this question.
    QuestionGenerated { question: Question },
    ScoreChanged { score: u32 },
    LivesChanged { lives: u32 },
    /// Round timer stepped; `remaining_secs` is never negative.
    TimerUpdated { remaining_secs: f32 },
    GameStateChanged { state: GameState },
    /// A target entered the playfield.
    TargetSpawned {
        id: TargetId,
        value: i32,
        x: f32,
        y: f32,
    },
    CorrectAnswerSelected { value: i32 },
    WrongAnswerSelected { value: i32 },
    RoundLost { reason: LossReason },
    /// The correct target is highlighted after a wrong pick.
    TargetRevealed { id: TargetId },
    /// Every target of the round was removed.
    TargetsCleared,
    /// Final result, emitted once at game over.
    SessionFinished { summary: SessionSummary },
}
