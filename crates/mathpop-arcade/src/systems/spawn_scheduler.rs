//! Spawn scheduler: releases one round's answer targets at a fixed cadence.

use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use mathpop_core::types::{Question, TargetDescriptor};
use mathpop_questions::choices::distractors;

/// Emits one correct descriptor and `N-1` distractors, one per interval.
#[derive(Debug, Clone, Default)]
pub struct ArcadeSpawnScheduler {
    pending: VecDeque<TargetDescriptor>,
    interval: Duration,
    accumulator: Duration,
    emitted: u32,
    spawning: bool,
}

impl ArcadeSpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare a shuffled sequence for `question`, replacing any sequence in progress.
    ///
    /// The first descriptor is due on the next `advance`.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        question: &Question,
        target_count: u32,
        interval: Duration,
        rng: &mut R,
    ) {
        let correct = question.correct_answer();
        let mut descriptors: Vec<TargetDescriptor> = std::iter::once(TargetDescriptor {
            value: correct,
            is_correct: true,
        })
        .chain(
            distractors(correct, target_count.saturating_sub(1) as usize, rng)
                .into_iter()
                .map(|value| TargetDescriptor {
                    value,
                    is_correct: false,
                }),
        )
        .take(target_count as usize)
        .collect();
        descriptors.shuffle(rng);

        self.pending = descriptors.into();
        self.interval = interval;
        self.accumulator = interval;
        self.emitted = 0;
        self.spawning = !self.pending.is_empty();
        debug!(
            "spawn sequence for {question}: {} target(s) every {:?}",
            self.pending.len(),
            interval
        );
    }

    /// Push every descriptor that became due during `dt` into `out`.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<TargetDescriptor>) {
        if !self.spawning {
            return;
        }
        self.accumulator += dt;
        while self.accumulator >= self.interval {
            let Some(descriptor) = self.pending.pop_front() else {
                break;
            };
            self.accumulator -= self.interval;
            self.emitted += 1;
            trace!("spawn #{}: {:?}", self.emitted, descriptor);
            out.push(descriptor);
        }
        if self.pending.is_empty() {
            self.spawning = false;
        }
    }

    /// Cancel the remaining sequence. Safe at any time.
    pub fn stop_spawning(&mut self) {
        if self.spawning {
            debug!("spawning stopped with {} target(s) unreleased", self.pending.len());
        }
        self.spawning = false;
        self.pending.clear();
        self.accumulator = Duration::ZERO;
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning
    }

    /// Descriptors released since the last `start`.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}
