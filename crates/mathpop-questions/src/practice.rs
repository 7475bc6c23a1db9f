//! Untimed practice modes: multiple choice, typed input and flash cards.

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use mathpop_core::constants::MULTIPLE_CHOICE_OPTIONS;
use mathpop_core::enums::PracticeMode;
use mathpop_core::types::Question;

use crate::choices::multiple_choice_options;
use crate::generator::QuestionGenerator;

/// Result of checking free-form input against a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerCheck {
    Correct,
    Incorrect(i32),
    /// Not an integer after trimming whitespace.
    Unparseable,
}

/// Parse `input` and compare it with the question's answer.
pub fn check_typed_answer(question: &Question, input: &str) -> AnswerCheck {
    match input.trim().parse::<i32>() {
        Ok(value) if value == question.correct_answer() => AnswerCheck::Correct,
        Ok(value) => AnswerCheck::Incorrect(value),
        Err(_) => AnswerCheck::Unparseable,
    }
}

/// Running tally of a practice session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeStats {
    pub answered: u32,
    pub correct: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl PracticeStats {
    pub fn record(&mut self, correct: bool) {
        self.answered += 1;
        if correct {
            self.correct += 1;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
    }

    /// Fraction answered correctly, 0.0 before any answer.
    pub fn accuracy(&self) -> f32 {
        if self.answered == 0 {
            0.0
        } else {
            self.correct as f32 / self.answered as f32
        }
    }
}

/// A question awaiting an answer. `options` is empty outside multiple choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticePrompt {
    pub question: Question,
    pub options: Vec<i32>,
}

/// Drives one non-arcade practice run.
pub struct PracticeSession {
    mode: PracticeMode,
    generator: QuestionGenerator,
    rng: ChaCha8Rng,
    pending: Option<PracticePrompt>,
    stats: PracticeStats,
}

impl PracticeSession {
    /// `generator` must already be initialized; otherwise every prompt is the fallback.
    pub fn new(mode: PracticeMode, generator: QuestionGenerator, seed: u64) -> Self {
        Self {
            mode,
            generator,
            rng: ChaCha8Rng::seed_from_u64(seed),
            pending: None,
            stats: PracticeStats::default(),
        }
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn stats(&self) -> PracticeStats {
        self.stats
    }

    pub fn pending(&self) -> Option<&PracticePrompt> {
        self.pending.as_ref()
    }

    /// Pose the next question. An unanswered prompt is discarded without scoring.
    pub fn next_prompt(&mut self) -> &PracticePrompt {
        let question = self.generator.generate_question();
        let options = match self.mode {
            PracticeMode::MultipleChoice => {
                multiple_choice_options(&question, MULTIPLE_CHOICE_OPTIONS, &mut self.rng)
            }
            PracticeMode::TypedInput | PracticeMode::FlashCard => Vec::new(),
        };
        self.pending.insert(PracticePrompt { question, options })
    }

    /// Pick option `index`. `None` when ignored (wrong mode, no prompt, bad index).
    pub fn answer_choice(&mut self, index: usize) -> Option<bool> {
        if self.mode != PracticeMode::MultipleChoice {
            debug!("choice answer ignored in {:?} mode", self.mode);
            return None;
        }
        let prompt = self.pending.as_ref()?;
        let value = *prompt.options.get(index)?;
        let correct = value == prompt.question.correct_answer();
        self.pending = None;
        self.stats.record(correct);
        Some(correct)
    }

    /// Check typed input. Unparseable input leaves the prompt open.
    pub fn answer_typed(&mut self, input: &str) -> Option<AnswerCheck> {
        if self.mode != PracticeMode::TypedInput {
            debug!("typed answer ignored in {:?} mode", self.mode);
            return None;
        }
        let prompt = self.pending.as_ref()?;
        let check = check_typed_answer(&prompt.question, input);
        if check != AnswerCheck::Unparseable {
            self.pending = None;
            self.stats.record(check == AnswerCheck::Correct);
        }
        Some(check)
    }

    /// Self-graded flash card.
    pub fn grade_flash_card(&mut self, recalled: bool) -> Option<bool> {
        if self.mode != PracticeMode::FlashCard {
            debug!("flash-card grade ignored in {:?} mode", self.mode);
            return None;
        }
        self.pending.take()?;
        self.stats.record(recalled);
        Some(recalled)
    }
}
