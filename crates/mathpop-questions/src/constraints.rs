//! Session-scoped anti-repetition and degenerate-operand rationing.

use std::collections::HashSet;

use mathpop_core::enums::Operation;
use mathpop_core::types::{Question, QuestionSignature};

/// Accepted questions per operation allowed to use a degenerate operand.
const DEGENERATE_CAP: u32 = 1;

/// What has been handed out so far in the current session.
#[derive(Debug, Clone, Default)]
pub struct GenerationConstraints {
    seen: HashSet<QuestionSignature>,
    /// Indexed by `Operation::index`.
    zero_operand: [u32; 4],
    /// Operand 1 for `Mul`, divisor 1 for `Div`.
    one_operand: [u32; 4],
}

impl GenerationConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything. Called at session start.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.zero_operand = [0; 4];
        self.one_operand = [0; 4];
    }

    /// Whether `question` may be served given what was already accepted.
    pub fn accepts(&self, question: &Question) -> bool {
        if self.seen.contains(&question.signature()) {
            return false;
        }
        let op = question.operation();
        let idx = op.index();
        let (a, b) = (question.first_operand(), question.second_operand());
        match op {
            Operation::Add => !(has_zero(a, b) && self.zero_operand[idx] >= DEGENERATE_CAP),
            Operation::Sub => true,
            Operation::Mul => {
                !(has_zero(a, b) && self.zero_operand[idx] >= DEGENERATE_CAP)
                    && !(has_one(a, b) && self.one_operand[idx] >= DEGENERATE_CAP)
            }
            Operation::Div => b != 0 && !(b == 1 && self.one_operand[idx] >= DEGENERATE_CAP),
        }
    }

    /// Record an accepted question.
    pub fn register(&mut self, question: &Question) {
        self.seen.insert(question.signature());
        let op = question.operation();
        let idx = op.index();
        let (a, b) = (question.first_operand(), question.second_operand());
        match op {
            Operation::Add => {
                if has_zero(a, b) {
                    self.zero_operand[idx] += 1;
                }
            }
            Operation::Sub => {}
            Operation::Mul => {
                if has_zero(a, b) {
                    self.zero_operand[idx] += 1;
                }
                if has_one(a, b) {
                    self.one_operand[idx] += 1;
                }
            }
            Operation::Div => {
                if b == 1 {
                    self.one_operand[idx] += 1;
                }
            }
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.seen.len()
    }

    pub fn zero_operand_count(&self, op: Operation) -> u32 {
        self.zero_operand[op.index()]
    }

    pub fn one_operand_count(&self, op: Operation) -> u32 {
        self.one_operand[op.index()]
    }
}

fn has_zero(a: i32, b: i32) -> bool {
    a == 0 || b == 0
}

fn has_one(a: i32, b: i32) -> bool {
    a == 1 || b == 1
}
