//! Scripted player for headless runs and soak testing.

use std::time::Duration;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use mathpop_core::commands::PlayerCommand;
use mathpop_core::enums::{RoundState, SessionPhase, TargetState};
use mathpop_core::state::SessionSnapshot;

/// Taps targets after a reaction delay, picking the right one with probability `accuracy`.
pub struct BotPlayer {
    rng: ChaCha8Rng,
    accuracy: f64,
    reaction: Duration,
    round: u32,
    waited: Duration,
    aim_correct: bool,
    acted: bool,
}

impl BotPlayer {
    pub fn new(seed: u64, accuracy: f64, reaction: Duration) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            accuracy: accuracy.clamp(0.0, 1.0),
            reaction,
            round: 0,
            waited: Duration::ZERO,
            aim_correct: true,
            acted: false,
        }
    }

    /// Look at the latest snapshot; `dt` is the time it covered.
    pub fn observe(&mut self, snapshot: &SessionSnapshot, dt: Duration) -> Option<PlayerCommand> {
        if snapshot.phase != SessionPhase::RoundActive || snapshot.round_state != RoundState::Playing
        {
            return None;
        }
        if snapshot.score.rounds_played != self.round {
            self.round = snapshot.score.rounds_played;
            self.waited = Duration::ZERO;
            self.aim_correct = self.rng.gen_bool(self.accuracy);
            self.acted = false;
        }
        if self.acted {
            return None;
        }
        self.waited += dt;
        if self.waited < self.reaction {
            return None;
        }

        let answer = snapshot.question?.correct_answer();
        let mut live = snapshot
            .targets
            .iter()
            .filter(|t| t.state == TargetState::Active && !t.frozen);
        let pick = if self.aim_correct {
            live.find(|t| t.value == answer)
        } else {
            live.find(|t| t.value != answer)
        }?;

        self.acted = true;
        debug!(
            "bot taps {} ({}) in round {}",
            pick.id, pick.value, self.round
        );
        Some(PlayerCommand::TapTarget { id: pick.id })
    }
}
