//! Player commands sent from the presentation layer to the arcade session.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::TargetId;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Begin a new session from the first round.
    StartGame,
    /// The player tapped a target.
    TapTarget { id: TargetId },
    /// The view reports a target left the visible area.
    TargetEscaped { id: TargetId },
    /// Typed or keypad answer.
    SubmitAnswer { value: i32 },
    /// Leave the session early.
    StopGame,
}
