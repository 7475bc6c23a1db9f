//! Procedural question generator.
//!
//! Each attempt picks an operation and a user range, synthesizes operands and
//! checks them against the session constraints. After
//! `MAX_GENERATION_ATTEMPTS` rejections the fallback question is served.

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use mathpop_core::config::ConfigError;
use mathpop_core::constants::MAX_GENERATION_ATTEMPTS;
use mathpop_core::enums::{Difficulty, Operation};
use mathpop_core::types::{NumberRange, Question};

use crate::constraints::GenerationConstraints;

/// Seedable source of arithmetic questions.
pub struct QuestionGenerator {
    rng: ChaCha8Rng,
    operations: Vec<Operation>,
    ranges: Vec<NumberRange>,
    difficulty: Difficulty,
    constraints: GenerationConstraints,
    initialized: bool,
}

impl QuestionGenerator {
    /// Create an uninitialized generator. Same seed = same question stream.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            operations: Vec::new(),
            ranges: Vec::new(),
            difficulty: Difficulty::default(),
            constraints: GenerationConstraints::new(),
            initialized: false,
        }
    }

    /// Configure operations, first-operand ranges and tier. Resets the session.
    pub fn initialize(
        &mut self,
        operations: &[Operation],
        ranges: &[NumberRange],
        difficulty: Difficulty,
    ) -> Result<(), ConfigError> {
        if operations.is_empty() {
            return Err(ConfigError::NoOperations);
        }
        if ranges.is_empty() {
            return Err(ConfigError::NoRanges);
        }
        let mut operations = operations.to_vec();
        operations.sort();
        operations.dedup();
        self.operations = operations;
        self.ranges = ranges.to_vec();
        self.difficulty = difficulty;
        self.initialized = true;
        self.reset_session();
        debug!(
            "question generator configured: {:?} over {} range(s) at {}",
            self.operations,
            self.ranges.len(),
            difficulty
        );
        Ok(())
    }

    /// Clear duplicate and degenerate-operand tracking.
    pub fn reset_session(&mut self) {
        self.constraints.reset();
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn constraints(&self) -> &GenerationConstraints {
        &self.constraints
    }

    /// Produce the next question. Never fails.
    pub fn generate_question(&mut self) -> Question {
        if !self.initialized {
            warn!("question requested before the generator was initialized; serving fallback");
            return Question::fallback();
        }

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let (Some(&operation), Some(&range)) = (
                self.operations.choose(&mut self.rng),
                self.ranges.choose(&mut self.rng),
            ) else {
                break;
            };
            let Some(question) = self.synthesize(operation, range) else {
                continue;
            };
            if self.constraints.accepts(&question) {
                self.constraints.register(&question);
                debug!("generated {question} (answer {})", question.correct_answer());
                return question;
            }
        }

        warn!(
            "no valid question after {MAX_GENERATION_ATTEMPTS} attempts; serving fallback"
        );
        Question::fallback()
    }

    fn synthesize(&mut self, operation: Operation, range: NumberRange) -> Option<Question> {
        let tier = self.difficulty.full_range();
        let first = self.rng.gen_range(range.min()..=range.max());
        let second = match operation {
            Operation::Add | Operation::Mul => self.rng.gen_range(tier.min()..=tier.max()),
            Operation::Sub => {
                let upper = tier.max().min(first);
                if tier.min() > upper {
                    first
                } else {
                    self.rng.gen_range(tier.min()..=upper)
                }
            }
            Operation::Div => self.pick_divisor(first, tier),
        };
        Question::new(first, operation, second)
    }

    /// Uniform choice among the non-zero divisors of `dividend` inside `tier`, else 1.
    fn pick_divisor(&mut self, dividend: i32, tier: NumberRange) -> i32 {
        // A non-zero dividend has no divisor larger than itself.
        let (lo, hi) = if dividend == 0 {
            (tier.min(), tier.max())
        } else {
            let bound = dividend.saturating_abs();
            (tier.min().max(-bound), tier.max().min(bound))
        };
        let divisors: Vec<i32> = (lo..=hi)
            .filter(|&d| d != 0 && dividend % d == 0)
            .collect();
        divisors.choose(&mut self.rng).copied().unwrap_or(1)
    }
}
