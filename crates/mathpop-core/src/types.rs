//! Fundamental question and session value types.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::enums::{Difficulty, Operation};

/// Inclusive operand interval. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawNumberRange")]
pub struct NumberRange {
    min: i32,
    max: i32,
}

#[derive(Deserialize)]
struct RawNumberRange {
    min: i32,
    max: i32,
}

impl TryFrom<RawNumberRange> for NumberRange {
    type Error = ConfigError;

    fn try_from(raw: RawNumberRange) -> Result<Self, Self::Error> {
        NumberRange::new(raw.min, raw.max)
    }
}

impl NumberRange {
    pub fn new(min: i32, max: i32) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Build from bounds given in either order.
    pub fn from_bounds(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// The overlap with `other`, if any.
    pub fn intersect(&self, other: &NumberRange) -> Option<NumberRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(NumberRange { min, max })
    }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Identity of a question for duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionSignature {
    pub first_operand: i32,
    pub operation: Operation,
    pub second_operand: i32,
}

/// An arithmetic question with its exact answer.
///
/// The answer is always the exact result of the operation; for division the
/// divisor is non-zero and divides the dividend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    first_operand: i32,
    second_operand: i32,
    operation: Operation,
    correct_answer: i32,
}

#[derive(Deserialize)]
struct RawQuestion {
    first_operand: i32,
    second_operand: i32,
    operation: Operation,
    correct_answer: i32,
}

impl TryFrom<RawQuestion> for Question {
    type Error = String;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        let question = Question::new(raw.first_operand, raw.operation, raw.second_operand)
            .ok_or_else(|| {
                format!(
                    "no exact answer for {} {} {}",
                    raw.first_operand,
                    raw.operation.symbol(),
                    raw.second_operand
                )
            })?;
        if question.correct_answer != raw.correct_answer {
            return Err(format!(
                "answer {} does not match {}",
                raw.correct_answer, question.correct_answer
            ));
        }
        Ok(question)
    }
}

impl Question {
    /// Build a question, computing the answer. `None` if no exact answer exists.
    pub fn new(first_operand: i32, operation: Operation, second_operand: i32) -> Option<Self> {
        let correct_answer = operation.apply(first_operand, second_operand)?;
        Some(Self {
            first_operand,
            second_operand,
            operation,
            correct_answer,
        })
    }

    /// `1 + 1 = 2`, served when generation cannot produce anything valid.
    pub const fn fallback() -> Self {
        Self {
            first_operand: 1,
            second_operand: 1,
            operation: Operation::Add,
            correct_answer: 2,
        }
    }

    pub fn first_operand(&self) -> i32 {
        self.first_operand
    }

    pub fn second_operand(&self) -> i32 {
        self.second_operand
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn correct_answer(&self) -> i32 {
        self.correct_answer
    }

    pub fn signature(&self) -> QuestionSignature {
        QuestionSignature {
            first_operand: self.first_operand,
            operation: self.operation,
            second_operand: self.second_operand,
        }
    }

    /// Prompt text, e.g. `"3 + 4 = ?"`.
    pub fn prompt(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = ?",
            self.first_operand,
            self.operation.symbol(),
            self.second_operand
        )
    }
}

/// Identifier of an answer target within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// A candidate answer produced by the spawn scheduler, not yet placed on the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub value: i32,
    pub is_correct: bool,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks processed.
    pub tick: u64,
    /// Elapsed virtual time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of length `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.tick += 1;
        self.elapsed_secs += dt.as_secs_f64();
    }
}

/// Lives, score and round time of an arcade session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub lives_remaining: u32,
    pub score: u32,
    /// Seconds left in the current round. Never negative.
    pub time_remaining_secs: f32,
}

/// Result of a finished session, handed to the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub difficulty: Difficulty,
    pub final_score: u32,
    pub is_new_high_score: bool,
    pub rounds_played: u32,
    pub correct_answers: u32,
}
