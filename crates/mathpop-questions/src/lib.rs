//! Question generation for MATHPOP.
//!
//! Produces a stream of arithmetic questions that respect operand ranges,
//! never repeat within a session and ration degenerate operands. Also holds
//! the helpers the non-arcade practice modes need.

pub mod choices;
pub mod constraints;
pub mod generator;
pub mod practice;

pub use mathpop_core as core;
pub use choices::{distractors, multiple_choice_options};
pub use constraints::GenerationConstraints;
pub use generator::QuestionGenerator;
pub use practice::{check_typed_answer, AnswerCheck, PracticePrompt, PracticeSession, PracticeStats};
