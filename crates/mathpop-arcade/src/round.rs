//! Round controller: owns one round's answer targets and decides its outcome.
//!
//! Targets live as hecs entities in a world private to the controller. The
//! round moves Idle -> Playing -> {CorrectSelected, WrongSelected, Lost} ->
//! Ending -> Idle. Once it leaves Playing every remaining target is frozen and
//! further input is ignored.

use std::time::Duration;

use hecs::{Entity, World};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use mathpop_core::components::{AnswerTarget, Kinematics, TargetPresentation};
use mathpop_core::constants::PLAYFIELD_TOP;
use mathpop_core::enums::{LossReason, RoundState, TargetState};
use mathpop_core::events::GameEvent;
use mathpop_core::types::{Question, TargetDescriptor, TargetId};

use crate::systems::movement;

/// How a round was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Correct { value: i32 },
    Wrong { value: i32 },
    Lost { reason: LossReason },
}

/// State machine for a single arcade round.
pub struct ArcadeRoundController {
    world: World,
    state: RoundState,
    question: Option<Question>,
    next_target_id: u32,
    has_correct: bool,
    events: Vec<GameEvent>,
    despawn_buffer: Vec<Entity>,
    escaped_buffer: Vec<TargetId>,
}

impl Default for ArcadeRoundController {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeRoundController {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            state: RoundState::Idle,
            question: None,
            next_target_id: 0,
            has_correct: false,
            events: Vec::new(),
            despawn_buffer: Vec::new(),
            escaped_buffer: Vec::new(),
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Question of the current round, if one is in progress.
    pub fn question(&self) -> Option<Question> {
        self.question
    }

    /// Read-only view of the target world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// All targets still owned by the round, ordered by id.
    pub fn targets(&self) -> Vec<AnswerTarget> {
        let mut targets: Vec<AnswerTarget> = self
            .world
            .query::<&AnswerTarget>()
            .iter()
            .map(|(_, target)| *target)
            .collect();
        targets.sort_by_key(|t| t.id);
        targets
    }

    pub fn presentation(&self, id: TargetId) -> Option<TargetPresentation> {
        let entity = self.find(id)?;
        self.world
            .get::<&TargetPresentation>(entity)
            .ok()
            .map(|p| *p)
    }

    pub fn kinematics(&self, id: TargetId) -> Option<Kinematics> {
        let entity = self.find(id)?;
        self.world.get::<&Kinematics>(entity).ok().map(|k| *k)
    }

    /// Events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a round. Any previous round is discarded silently.
    pub fn start_round(&mut self, question: Question) {
        if self.state != RoundState::Idle {
            self.abort();
        }
        self.question = Some(question);
        self.has_correct = false;
        self.state = RoundState::Playing;
        debug!("round started: {question}");
    }

    /// Place a target on the playfield. Only while Playing.
    ///
    /// A second correct target in the same round is rejected.
    pub fn register_target(
        &mut self,
        descriptor: TargetDescriptor,
        kinematics: Kinematics,
    ) -> Option<TargetId> {
        if self.state != RoundState::Playing {
            debug!("target {} not registered in {:?}", descriptor.value, self.state);
            return None;
        }
        if descriptor.is_correct {
            if self.has_correct {
                warn!("rejected second correct target {}", descriptor.value);
                return None;
            }
            self.has_correct = true;
        }
        let id = TargetId(self.next_target_id);
        self.next_target_id += 1;
        self.world.spawn((
            AnswerTarget {
                id,
                value: descriptor.value,
                is_correct: descriptor.is_correct,
                state: TargetState::Active,
            },
            kinematics,
            TargetPresentation::default(),
        ));
        Some(id)
    }

    /// The player tapped target `id`.
    pub fn tap_target(&mut self, id: TargetId) -> Option<RoundOutcome> {
        let (entity, target) = self.active_target(id)?;
        if target.is_correct {
            Some(self.resolve_correct(Some(entity), target.value))
        } else {
            Some(self.resolve_wrong(Some(entity), target.value))
        }
    }

    /// Target `id` left the top of the playfield.
    ///
    /// A distractor is released without an outcome; the correct target loses the round.
    pub fn target_escaped(&mut self, id: TargetId) -> Option<RoundOutcome> {
        let (entity, target) = self.active_target(id)?;
        self.set_state(entity, TargetState::Escaped);
        if !target.is_correct {
            debug!("distractor {} escaped", target.value);
            let _ = self.world.despawn(entity);
            return None;
        }
        Some(self.resolve_lost(LossReason::Escaped))
    }

    /// Typed or keypad answer.
    pub fn submit_answer(&mut self, value: i32) -> Option<RoundOutcome> {
        if self.state != RoundState::Playing {
            debug!("answer {value} ignored in {:?}", self.state);
            return None;
        }
        let correct = self.question?.correct_answer();
        let correct_entity = self.correct_entity();
        if value == correct {
            Some(self.resolve_correct(correct_entity, value))
        } else {
            Some(self.resolve_wrong(None, value))
        }
    }

    /// The round timer ran out.
    pub fn timeout(&mut self) -> Option<RoundOutcome> {
        if self.state != RoundState::Playing {
            debug!("timeout ignored in {:?}", self.state);
            return None;
        }
        Some(self.resolve_lost(LossReason::Timeout))
    }

    /// Move targets and process any that reached the top.
    pub fn advance_targets(&mut self, dt: Duration) -> Option<RoundOutcome> {
        if self.state != RoundState::Playing {
            return None;
        }
        movement::run(&mut self.world, dt);

        let mut escaped = std::mem::take(&mut self.escaped_buffer);
        movement::collect_escaped(&mut self.world, PLAYFIELD_TOP, &mut escaped);
        let mut outcome = None;
        for &id in &escaped {
            if let Some(o) = self.target_escaped(id) {
                outcome = Some(o);
                break;
            }
        }
        self.escaped_buffer = escaped;
        outcome
    }

    /// Release every target and return to Idle.
    pub fn end_round(&mut self) {
        if self.state == RoundState::Idle {
            return;
        }
        self.state = RoundState::Ending;
        self.world.clear();
        self.question = None;
        self.has_correct = false;
        self.events.push(GameEvent::TargetsCleared);
        self.state = RoundState::Idle;
        debug!("round ended");
    }

    /// Drop the round from any state without raising events.
    pub fn abort(&mut self) {
        self.world.clear();
        self.question = None;
        self.has_correct = false;
        self.state = RoundState::Idle;
    }

    // --- Resolution ---

    fn resolve_correct(&mut self, popped: Option<Entity>, value: i32) -> RoundOutcome {
        if let Some(entity) = popped {
            self.set_state(entity, TargetState::Popped);
        }
        self.despawn_except(&[popped]);
        self.freeze_all();
        self.state = RoundState::CorrectSelected;
        self.events.push(GameEvent::CorrectAnswerSelected { value });
        debug!("correct answer {value}");
        RoundOutcome::Correct { value }
    }

    fn resolve_wrong(&mut self, popped: Option<Entity>, value: i32) -> RoundOutcome {
        if let Some(entity) = popped {
            self.set_state(entity, TargetState::Popped);
        }
        let correct = self.correct_entity();
        self.despawn_except(&[popped, correct]);
        self.freeze_all();
        self.state = RoundState::WrongSelected;
        self.events.push(GameEvent::WrongAnswerSelected { value });
        if let Some(entity) = correct {
            if let Ok(mut presentation) = self.world.get::<&mut TargetPresentation>(entity) {
                presentation.revealed = true;
            }
            if let Ok(target) = self.world.get::<&AnswerTarget>(entity) {
                self.events.push(GameEvent::TargetRevealed { id: target.id });
            }
        }
        debug!("wrong answer {value}");
        RoundOutcome::Wrong { value }
    }

    fn resolve_lost(&mut self, reason: LossReason) -> RoundOutcome {
        self.freeze_all();
        self.state = RoundState::Lost;
        self.events.push(GameEvent::RoundLost { reason });
        debug!("round lost: {reason:?}");
        RoundOutcome::Lost { reason }
    }

    // --- World helpers ---

    fn find(&self, id: TargetId) -> Option<Entity> {
        self.world
            .query::<&AnswerTarget>()
            .iter()
            .find(|(_, target)| target.id == id)
            .map(|(entity, _)| entity)
    }

    /// The target `id` if the round is Playing and the target can still be hit.
    fn active_target(&self, id: TargetId) -> Option<(Entity, AnswerTarget)> {
        if self.state != RoundState::Playing {
            debug!("input for {id} ignored in {:?}", self.state);
            return None;
        }
        let entity = self.find(id)?;
        let target = *self.world.get::<&AnswerTarget>(entity).ok()?;
        let frozen = self
            .world
            .get::<&TargetPresentation>(entity)
            .map(|p| p.frozen)
            .unwrap_or(false);
        if target.state != TargetState::Active || frozen {
            debug!("input for {id} ignored: target is {:?}", target.state);
            return None;
        }
        Some((entity, target))
    }

    fn correct_entity(&self) -> Option<Entity> {
        self.world
            .query::<&AnswerTarget>()
            .iter()
            .find(|(_, target)| target.is_correct && target.state == TargetState::Active)
            .map(|(entity, _)| entity)
    }

    fn set_state(&mut self, entity: Entity, state: TargetState) {
        if let Ok(mut target) = self.world.get::<&mut AnswerTarget>(entity) {
            target.state = state;
        }
    }

    fn freeze_all(&mut self) {
        for (_entity, presentation) in self.world.query_mut::<&mut TargetPresentation>() {
            presentation.frozen = true;
        }
    }

    fn despawn_except(&mut self, keep: &[Option<Entity>]) {
        self.despawn_buffer.clear();
        for (entity, _target) in self.world.query_mut::<&AnswerTarget>() {
            if !keep.contains(&Some(entity)) {
                self.despawn_buffer.push(entity);
            }
        }
        for entity in self.despawn_buffer.drain(..) {
            let _ = self.world.despawn(entity);
        }
    }
}
