//! Distractor values and multiple-choice option sets.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use mathpop_core::constants::{DISTRACTOR_MAX_ATTEMPTS, DISTRACTOR_MAX_OFFSET};
use mathpop_core::types::Question;

/// `count` wrong answers near `correct`.
///
/// Each is the correct answer moved by a non-zero offset within
/// `DISTRACTOR_MAX_OFFSET`, non-negative and distinct from every value already
/// picked. When perturbation keeps colliding, the next free value above the
/// largest one in use is taken instead, or the nearest free value below it
/// when nothing above is left.
pub fn distractors<R: Rng + ?Sized>(correct: i32, count: usize, rng: &mut R) -> Vec<i32> {
    let mut used: HashSet<i32> = HashSet::from([correct]);
    let mut out = Vec::with_capacity(count);

    for _ in 0..count {
        let value = perturb(correct, &used, rng).unwrap_or_else(|| next_free(&used));
        used.insert(value);
        out.push(value);
    }
    out
}

fn perturb<R: Rng + ?Sized>(correct: i32, used: &HashSet<i32>, rng: &mut R) -> Option<i32> {
    for _ in 0..DISTRACTOR_MAX_ATTEMPTS {
        let offset = rng.gen_range(-DISTRACTOR_MAX_OFFSET..=DISTRACTOR_MAX_OFFSET);
        if offset == 0 {
            continue;
        }
        let candidate = correct.saturating_add(offset);
        if candidate >= 0 && !used.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn next_free(used: &HashSet<i32>) -> i32 {
    let max = used.iter().copied().max().unwrap_or(0);
    let start = max.saturating_add(1).max(0);
    // Walk down below the largest value once the upward walk hits i32::MAX.
    (start..=i32::MAX)
        .find(|v| !used.contains(v))
        .or_else(|| (0..max).rev().find(|v| !used.contains(v)))
        .unwrap_or(max)
}

/// The correct answer plus `option_count - 1` distractors, shuffled.
///
/// The correct answer appears exactly once. At least one option is returned.
pub fn multiple_choice_options<R: Rng + ?Sized>(
    question: &Question,
    option_count: usize,
    rng: &mut R,
) -> Vec<i32> {
    let correct = question.correct_answer();
    let mut options = vec![correct];
    options.extend(distractors(correct, option_count.saturating_sub(1), rng));
    options.shuffle(rng);
    options
}
