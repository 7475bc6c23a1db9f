//! ECS components for answer-target entities.
//!
//! Components are plain data structs.
//! Round logic lives in the arcade crate, not here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::TargetState;
use crate::types::TargetId;

/// A candidate answer floating on the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerTarget {
    pub id: TargetId,
    pub value: i32,
    pub is_correct: bool,
    pub state: TargetState,
}

/// Position and velocity in playfield units. `y` grows upward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Kinematics {
    /// A target at `position` rising straight up at `speed` units per second.
    pub fn rising(position: Vec2, speed: f32) -> Self {
        Self {
            position,
            velocity: Vec2::new(0.0, speed),
        }
    }
}

/// Presentation flags the view layer reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPresentation {
    /// Stopped in place; no longer moves or accepts input.
    pub frozen: bool,
    /// Highlighted as the correct answer after a wrong pick.
    pub revealed: bool,
}
