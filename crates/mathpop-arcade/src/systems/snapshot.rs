//! Snapshot system: queries the target world and builds a `SessionSnapshot`.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use mathpop_core::components::{AnswerTarget, Kinematics, TargetPresentation};
use mathpop_core::enums::{Difficulty, RoundState, SessionPhase};
use mathpop_core::events::GameEvent;
use mathpop_core::state::{ScoreView, SessionSnapshot, TargetView};
use mathpop_core::types::{Question, SessionState, SimTime};

/// Everything a snapshot needs besides the world itself.
pub struct SnapshotContext {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub round_state: RoundState,
    pub difficulty: Difficulty,
    pub question: Option<Question>,
    pub state: SessionState,
    pub score: ScoreView,
}

/// Build a complete snapshot from the current world state.
pub fn build_snapshot(world: &World, ctx: SnapshotContext, events: Vec<GameEvent>) -> SessionSnapshot {
    SessionSnapshot {
        time: ctx.time,
        phase: ctx.phase,
        round_state: ctx.round_state,
        difficulty: ctx.difficulty,
        question: ctx.question,
        state: ctx.state,
        targets: build_targets(world),
        events,
        score: ctx.score,
    }
}

/// Build the target list, ordered by id.
pub fn build_targets(world: &World) -> Vec<TargetView> {
    let mut targets: Vec<TargetView> = world
        .query::<(&AnswerTarget, &Kinematics, &TargetPresentation)>()
        .iter()
        .map(|(_, (target, kinematics, presentation))| TargetView {
            id: target.id,
            value: target.value,
            position: kinematics.position,
            state: target.state,
            frozen: presentation.frozen,
            revealed: presentation.revealed,
        })
        .collect();
    targets.sort_by_key(|t| t.id);
    targets
}
