//! Enumeration types used throughout the game.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{EASY_RANGE, HARD_RANGE, MEDIUM_RANGE};
use crate::types::NumberRange;

/// Arithmetic operation a question asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operation {
    /// Every operation, in display order.
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Sub,
        Operation::Mul,
        Operation::Div,
    ];

    /// Symbol shown between the operands.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Sub => "-",
            Operation::Mul => "×",
            Operation::Div => "÷",
        }
    }

    /// Exact integer result of `a op b`.
    ///
    /// Returns `None` on overflow, on division by zero and when the division
    /// would leave a remainder.
    pub fn apply(&self, a: i32, b: i32) -> Option<i32> {
        match self {
            Operation::Add => a.checked_add(b),
            Operation::Sub => a.checked_sub(b),
            Operation::Mul => a.checked_mul(b),
            Operation::Div => {
                if b == 0 || a.checked_rem(b)? != 0 {
                    None
                } else {
                    a.checked_div(b)
                }
            }
        }
    }

    /// Index into per-operation counter arrays.
    pub fn index(&self) -> usize {
        match self {
            Operation::Add => 0,
            Operation::Sub => 1,
            Operation::Mul => 2,
            Operation::Div => 3,
        }
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" | "addition" | "+" => Ok(Operation::Add),
            "sub" | "subtraction" | "-" => Ok(Operation::Sub),
            "mul" | "multiplication" | "*" | "x" => Ok(Operation::Mul),
            "div" | "division" | "/" => Ok(Operation::Div),
            other => Err(format!("unknown operation: {other}")),
        }
    }
}

/// Difficulty tier. Controls operand ranges, round duration and lives.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// The complete operand interval for this tier.
    ///
    /// Second operands are always drawn from here, regardless of the
    /// sub-range the player selected.
    pub fn full_range(&self) -> NumberRange {
        let (min, max) = match self {
            Difficulty::Easy => EASY_RANGE,
            Difficulty::Medium => MEDIUM_RANGE,
            Difficulty::Hard => HARD_RANGE,
        };
        NumberRange::from_bounds(min, max)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Lifecycle of a single answer target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetState {
    #[default]
    Active,
    /// Tapped by the player.
    Popped,
    /// Left the top of the playfield without being tapped.
    Escaped,
}

/// Round state machine value owned by the round controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    #[default]
    Idle,
    Playing,
    CorrectSelected,
    WrongSelected,
    Lost,
    /// Transient: targets are being released before returning to Idle.
    Ending,
}

impl RoundState {
    /// Whether the round has produced its outcome and awaits `end_round`.
    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            RoundState::CorrectSelected | RoundState::WrongSelected | RoundState::Lost
        )
    }
}

/// Top-level game state reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    GameOver,
    /// The player left the session before it ended.
    Interrupted,
}

/// Session-level phase. Exactly one holds at any instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    /// A round is being played.
    RoundActive,
    /// Outcome shown; the next round starts when the delay elapses.
    Feedback,
    GameOver,
    Interrupted,
}

/// Why a round was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// The correct target floated off the top of the playfield.
    Escaped,
    /// The round timer reached zero.
    Timeout,
}

/// Non-arcade interaction modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PracticeMode {
    #[default]
    MultipleChoice,
    TypedInput,
    FlashCard,
}
