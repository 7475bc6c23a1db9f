//! Session snapshot: the complete visible state sent to the presentation layer each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Question, SessionState, SimTime, TargetId};

/// Complete session state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub round_state: RoundState,
    pub difficulty: Difficulty,
    pub question: Option<Question>,
    pub state: SessionState,
    pub targets: Vec<TargetView>,
    /// Events raised during this tick, in order.
    pub events: Vec<GameEvent>,
    pub score: ScoreView,
}

/// A visible answer target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub id: TargetId,
    pub value: i32,
    pub position: Vec2,
    pub state: TargetState,
    pub frozen: bool,
    pub revealed: bool,
}

/// Running totals for the score panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreView {
    pub rounds_played: u32,
    pub correct_answers: u32,
    pub best_score: u32,
}
