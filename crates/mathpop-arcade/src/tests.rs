//! Tests for the spawn scheduler, round timer, round controller and session.

use std::time::Duration;

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use mathpop_core::components::Kinematics;
use mathpop_core::config::{ConfigError, DifficultySettings, GameSettings};
use mathpop_core::constants::PLAYFIELD_TOP;
use mathpop_core::enums::*;
use mathpop_core::events::GameEvent;
use mathpop_core::types::{Question, SessionSummary, TargetDescriptor, TargetId};

use crate::records::{InMemoryRecordStore, RecordError, RecordStore};
use crate::round::{ArcadeRoundController, RoundOutcome};
use crate::session::{ArcadeGameSession, SessionConfig, SessionError};
use crate::settings::InMemorySettings;
use crate::systems::round_timer::RoundTimer;
use crate::systems::spawn_scheduler::ArcadeSpawnScheduler;

const MS_100: Duration = Duration::from_millis(100);

fn question(a: i32, op: Operation, b: i32) -> Question {
    Question::new(a, op, b).unwrap()
}

fn fast_tier(lives: u32, round_time_secs: f32) -> DifficultySettings {
    DifficultySettings {
        round_time_secs,
        lives,
        spawn_interval_ms: 100,
        target_count: 4,
        target_rise_speed: 2.0,
    }
}

fn session(seed: u64, tier: DifficultySettings) -> ArcadeGameSession {
    let mut s = ArcadeGameSession::new(
        SessionConfig {
            seed,
            ..Default::default()
        },
        InMemorySettings::default(),
        InMemoryRecordStore::new(),
    );
    s.initialize(GameSettings::default(), tier).unwrap();
    s
}

fn descriptor(value: i32, is_correct: bool) -> TargetDescriptor {
    TargetDescriptor { value, is_correct }
}

fn at(x: f32, y: f32) -> Kinematics {
    Kinematics::rising(Vec2::new(x, y), 1.0)
}

// ---- Spawn scheduler ----

#[test]
fn test_scheduler_emits_exactly_n_with_one_correct() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut scheduler = ArcadeSpawnScheduler::new();
    scheduler.start(&question(3, Operation::Add, 4), 5, MS_100, &mut rng);

    let mut out = Vec::new();
    for _ in 0..10 {
        scheduler.advance(MS_100, &mut out);
    }
    assert_eq!(out.len(), 5);
    assert_eq!(out.iter().filter(|d| d.is_correct).count(), 1);
    assert!(out.iter().any(|d| d.is_correct && d.value == 7));
    assert!(out.iter().all(|d| d.value >= 0));
    let mut values: Vec<i32> = out.iter().map(|d| d.value).collect();
    values.sort();
    values.dedup();
    assert_eq!(values.len(), 5);
    assert!(!scheduler.is_spawning());
    assert_eq!(scheduler.emitted(), 5);
    assert_eq!(scheduler.remaining(), 0);
}

#[test]
fn test_scheduler_first_descriptor_is_due_immediately() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut scheduler = ArcadeSpawnScheduler::new();
    scheduler.start(&question(2, Operation::Mul, 3), 3, Duration::from_secs(1), &mut rng);

    let mut out = Vec::new();
    scheduler.advance(Duration::ZERO, &mut out);
    assert_eq!(out.len(), 1);
    scheduler.advance(Duration::from_millis(999), &mut out);
    assert_eq!(out.len(), 1);
    scheduler.advance(Duration::from_millis(1), &mut out);
    assert_eq!(out.len(), 2);
}

#[test]
fn test_scheduler_catches_up_on_long_frames() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut scheduler = ArcadeSpawnScheduler::new();
    scheduler.start(&question(5, Operation::Sub, 1), 6, MS_100, &mut rng);

    let mut out = Vec::new();
    scheduler.advance(Duration::from_millis(250), &mut out);
    assert_eq!(out.len(), 3);
}

#[test]
fn test_scheduler_stop_is_idempotent_and_safe_before_start() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut scheduler = ArcadeSpawnScheduler::new();
    scheduler.stop_spawning();
    scheduler.stop_spawning();
    assert!(!scheduler.is_spawning());

    scheduler.start(&question(1, Operation::Add, 2), 4, MS_100, &mut rng);
    let mut out = Vec::new();
    scheduler.advance(Duration::ZERO, &mut out);
    scheduler.stop_spawning();
    scheduler.stop_spawning();
    for _ in 0..10 {
        scheduler.advance(MS_100, &mut out);
    }
    assert_eq!(out.len(), 1);
    assert_eq!(scheduler.remaining(), 0);
}

#[test]
fn test_scheduler_restart_replaces_sequence() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut scheduler = ArcadeSpawnScheduler::new();
    scheduler.start(&question(1, Operation::Add, 2), 4, MS_100, &mut rng);
    let mut out = Vec::new();
    scheduler.advance(MS_100, &mut out);

    scheduler.start(&question(6, Operation::Mul, 6), 2, MS_100, &mut rng);
    assert_eq!(scheduler.emitted(), 0);
    let mut second = Vec::new();
    for _ in 0..5 {
        scheduler.advance(MS_100, &mut second);
    }
    assert_eq!(second.len(), 2);
    assert!(second.iter().any(|d| d.is_correct && d.value == 36));
}

#[test]
fn test_scheduler_zero_targets_never_spawns() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let mut scheduler = ArcadeSpawnScheduler::new();
    scheduler.start(&question(1, Operation::Add, 2), 0, MS_100, &mut rng);
    assert!(!scheduler.is_spawning());
    let mut out = Vec::new();
    scheduler.advance(MS_100, &mut out);
    assert!(out.is_empty());
}

#[test]
fn test_scheduler_answer_near_i32_max() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut scheduler = ArcadeSpawnScheduler::new();
    scheduler.start(&question(i32::MAX - 1, Operation::Add, 1), 12, MS_100, &mut rng);
    assert_eq!(scheduler.remaining(), 12);

    let mut out = Vec::new();
    scheduler.advance(Duration::from_secs(2), &mut out);
    assert_eq!(out.len(), 12);
    assert_eq!(out.iter().filter(|d| d.is_correct).count(), 1);
    let mut values: Vec<i32> = out.iter().map(|d| d.value).collect();
    values.sort();
    values.dedup();
    assert_eq!(values.len(), 12);
}

// ---- Round timer ----

#[test]
fn test_timer_steps_and_expires_once() {
    let mut timer = RoundTimer::new();
    let mut events = Vec::new();
    timer.reset(Duration::from_millis(300));

    assert!(!timer.advance(MS_100, &mut events));
    assert!(!timer.advance(MS_100, &mut events));
    assert!(timer.advance(MS_100, &mut events));
    assert!(!timer.advance(MS_100, &mut events));
    assert!(!timer.is_running());

    let remaining: Vec<f32> = events
        .iter()
        .map(|e| match e {
            GameEvent::TimerUpdated { remaining_secs } => *remaining_secs,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(remaining.len(), 3);
    assert!((remaining[0] - 0.2).abs() < 1e-4);
    assert_eq!(remaining[2], 0.0);
}

#[test]
fn test_timer_clamps_at_zero_on_long_frame() {
    let mut timer = RoundTimer::new();
    let mut events = Vec::new();
    timer.reset(Duration::from_millis(250));
    assert!(timer.advance(Duration::from_secs(5), &mut events));
    assert_eq!(timer.remaining(), Duration::ZERO);
    assert_eq!(events.len(), 3);
    assert!(!timer.advance(Duration::from_secs(5), &mut events));
    assert_eq!(events.len(), 3);
}

#[test]
fn test_timer_holds_partial_steps() {
    let mut timer = RoundTimer::new();
    let mut events = Vec::new();
    timer.reset(Duration::from_secs(1));
    timer.advance(Duration::from_millis(60), &mut events);
    assert!(events.is_empty());
    timer.advance(Duration::from_millis(60), &mut events);
    assert_eq!(events.len(), 1);
}

// ---- Round controller ----

fn playing_round() -> (ArcadeRoundController, TargetId, TargetId, TargetId) {
    let mut c = ArcadeRoundController::new();
    c.start_round(question(3, Operation::Add, 4));
    let correct = c.register_target(descriptor(7, true), at(1.0, 0.0)).unwrap();
    let d1 = c.register_target(descriptor(5, false), at(3.0, 0.0)).unwrap();
    let d2 = c.register_target(descriptor(9, false), at(5.0, 0.0)).unwrap();
    (c, correct, d1, d2)
}

#[test]
fn test_register_only_while_playing() {
    let mut c = ArcadeRoundController::new();
    assert_eq!(c.state(), RoundState::Idle);
    assert!(c.register_target(descriptor(1, false), at(0.0, 0.0)).is_none());
    assert!(c.targets().is_empty());

    c.start_round(question(1, Operation::Add, 1));
    assert_eq!(c.state(), RoundState::Playing);
    assert!(c.register_target(descriptor(2, true), at(0.0, 0.0)).is_some());
    c.timeout();
    assert!(c.register_target(descriptor(3, false), at(0.0, 0.0)).is_none());
    assert_eq!(c.targets().len(), 1);
}

#[test]
fn test_second_correct_target_rejected() {
    let mut c = ArcadeRoundController::new();
    c.start_round(question(1, Operation::Add, 1));
    assert!(c.register_target(descriptor(2, true), at(0.0, 0.0)).is_some());
    assert!(c.register_target(descriptor(2, true), at(1.0, 0.0)).is_none());
    assert_eq!(c.targets().iter().filter(|t| t.is_correct).count(), 1);
}

#[test]
fn test_correct_tap_pops_and_clears_others() {
    let (mut c, correct, _, _) = playing_round();
    let outcome = c.tap_target(correct);
    assert_eq!(outcome, Some(RoundOutcome::Correct { value: 7 }));
    assert_eq!(c.state(), RoundState::CorrectSelected);

    let targets = c.targets();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].id, correct);
    assert_eq!(targets[0].state, TargetState::Popped);
    assert_eq!(
        c.drain_events(),
        vec![GameEvent::CorrectAnswerSelected { value: 7 }]
    );
}

#[test]
fn test_wrong_tap_reveals_correct_target() {
    let (mut c, correct, d1, _) = playing_round();
    let outcome = c.tap_target(d1);
    assert_eq!(outcome, Some(RoundOutcome::Wrong { value: 5 }));
    assert_eq!(c.state(), RoundState::WrongSelected);

    let targets = c.targets();
    assert_eq!(targets.len(), 2);
    let popped = targets.iter().find(|t| t.id == d1).unwrap();
    assert_eq!(popped.state, TargetState::Popped);
    let shown = c.presentation(correct).unwrap();
    assert!(shown.frozen && shown.revealed);

    assert_eq!(
        c.drain_events(),
        vec![
            GameEvent::WrongAnswerSelected { value: 5 },
            GameEvent::TargetRevealed { id: correct },
        ]
    );
}

#[test]
fn test_input_after_outcome_is_ignored() {
    let (mut c, correct, d1, d2) = playing_round();
    assert!(c.tap_target(d1).is_some());
    c.drain_events();
    assert!(c.tap_target(correct).is_none());
    assert!(c.tap_target(d2).is_none());
    assert!(c.target_escaped(correct).is_none());
    assert!(c.submit_answer(7).is_none());
    assert!(c.timeout().is_none());
    assert_eq!(c.state(), RoundState::WrongSelected);
    assert!(c.drain_events().is_empty());
}

#[test]
fn test_distractor_escape_has_no_outcome() {
    let (mut c, _, d1, _) = playing_round();
    assert!(c.target_escaped(d1).is_none());
    assert_eq!(c.state(), RoundState::Playing);
    assert!(c.targets().iter().all(|t| t.id != d1));
    // A late tap on the released target is ignored.
    assert!(c.tap_target(d1).is_none());
    assert!(c.drain_events().is_empty());
}

#[test]
fn test_correct_escape_loses_round_and_freezes() {
    let (mut c, correct, d1, _) = playing_round();
    let outcome = c.target_escaped(correct);
    assert_eq!(
        outcome,
        Some(RoundOutcome::Lost {
            reason: LossReason::Escaped
        })
    );
    assert_eq!(c.state(), RoundState::Lost);
    assert!(c.presentation(d1).unwrap().frozen);
    assert_eq!(
        c.drain_events(),
        vec![GameEvent::RoundLost {
            reason: LossReason::Escaped
        }]
    );
}

#[test]
fn test_timeout_loses_round_once() {
    let (mut c, _, _, _) = playing_round();
    assert_eq!(
        c.timeout(),
        Some(RoundOutcome::Lost {
            reason: LossReason::Timeout
        })
    );
    assert!(c.timeout().is_none());
    assert_eq!(c.drain_events().len(), 1);
}

#[test]
fn test_submit_answer_correct_and_wrong() {
    let (mut c, correct, _, _) = playing_round();
    assert_eq!(c.submit_answer(7), Some(RoundOutcome::Correct { value: 7 }));
    let targets = c.targets();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].id, correct);

    let (mut c, correct, _, _) = playing_round();
    assert_eq!(c.submit_answer(8), Some(RoundOutcome::Wrong { value: 8 }));
    let targets = c.targets();
    assert_eq!(targets.len(), 1);
    assert!(c.presentation(correct).unwrap().revealed);
}

#[test]
fn test_submit_answer_before_correct_target_spawns() {
    let mut c = ArcadeRoundController::new();
    c.start_round(question(2, Operation::Mul, 5));
    c.register_target(descriptor(12, false), at(0.0, 0.0));
    assert_eq!(c.submit_answer(10), Some(RoundOutcome::Correct { value: 10 }));
    assert!(c.targets().is_empty());
}

#[test]
fn test_advance_targets_moves_and_detects_escape() {
    let mut c = ArcadeRoundController::new();
    c.start_round(question(3, Operation::Add, 4));
    let d = c
        .register_target(descriptor(5, false), at(1.0, PLAYFIELD_TOP - 0.5))
        .unwrap();
    let correct = c.register_target(descriptor(7, true), at(3.0, 0.0)).unwrap();

    assert!(c.advance_targets(Duration::from_millis(250)).is_none());
    let k = c.kinematics(correct).unwrap();
    assert!((k.position.y - 0.25).abs() < 1e-5);

    // The distractor crosses the top and is released.
    assert!(c.advance_targets(Duration::from_millis(500)).is_none());
    assert!(c.kinematics(d).is_none());
    assert_eq!(c.state(), RoundState::Playing);

    let outcome = c.advance_targets(Duration::from_secs(20));
    assert_eq!(
        outcome,
        Some(RoundOutcome::Lost {
            reason: LossReason::Escaped
        })
    );
}

#[test]
fn test_frozen_targets_do_not_move() {
    let (mut c, correct, _, _) = playing_round();
    c.timeout();
    let before = c.kinematics(correct).unwrap().position;
    c.advance_targets(Duration::from_secs(1));
    assert_eq!(c.kinematics(correct).unwrap().position, before);
}

#[test]
fn test_end_round_clears_and_returns_to_idle() {
    let (mut c, correct, _, _) = playing_round();
    c.tap_target(correct);
    c.drain_events();
    c.end_round();
    assert_eq!(c.state(), RoundState::Idle);
    assert!(c.targets().is_empty());
    assert!(c.question().is_none());
    assert_eq!(c.drain_events(), vec![GameEvent::TargetsCleared]);
    // Idle end_round is a no-op.
    c.end_round();
    assert!(c.drain_events().is_empty());
}

#[test]
fn test_abort_is_silent() {
    let (mut c, _, _, _) = playing_round();
    c.abort();
    assert_eq!(c.state(), RoundState::Idle);
    assert!(c.targets().is_empty());
    assert!(c.drain_events().is_empty());
}

#[test]
fn test_target_ids_are_unique_across_rounds() {
    let (mut c, a, _, _) = playing_round();
    c.end_round();
    c.start_round(question(1, Operation::Add, 1));
    let b = c.register_target(descriptor(2, true), at(0.0, 0.0)).unwrap();
    assert_ne!(a, b);
}

// ---- Session ----

#[test]
fn test_start_game_requires_initialize() {
    let mut s: ArcadeGameSession = ArcadeGameSession::new(
        SessionConfig::default(),
        InMemorySettings::default(),
        InMemoryRecordStore::new(),
    );
    assert!(matches!(s.start_game(), Err(SessionError::NotInitialized)));
    assert_eq!(s.phase(), SessionPhase::NotStarted);
}

#[test]
fn test_initialize_rejects_invalid_config() {
    let mut s: ArcadeGameSession = ArcadeGameSession::new(
        SessionConfig::default(),
        InMemorySettings::default(),
        InMemoryRecordStore::new(),
    );
    let settings = GameSettings {
        operations: vec![],
        ..GameSettings::default()
    };
    assert!(matches!(
        s.initialize(settings, fast_tier(3, 5.0)),
        Err(ConfigError::NoOperations)
    ));
    assert!(matches!(
        s.initialize(GameSettings::default(), fast_tier(0, 5.0)),
        Err(ConfigError::ZeroLives)
    ));
}

#[test]
fn test_initialize_sets_lives_and_time() {
    let s = session(1, fast_tier(4, 7.5));
    let state = s.state();
    assert_eq!(state.lives_remaining, 4);
    assert_eq!(state.score, 0);
    assert_eq!(state.time_remaining_secs, 7.5);
}

#[test]
fn test_initialize_from_repository() {
    let repo = InMemorySettings::new(GameSettings {
        difficulty: Difficulty::Medium,
        ..GameSettings::default()
    });
    let mut s = ArcadeGameSession::new(SessionConfig::default(), repo, InMemoryRecordStore::new());
    s.initialize_from_repository().unwrap();
    assert_eq!(s.state().lives_remaining, 3);
    assert_eq!(s.difficulty_settings().target_count, 5);
}

#[test]
fn test_start_game_event_order() {
    let mut s = session(1, fast_tier(3, 5.0));
    s.start_game().unwrap();
    let events = s.drain_events();
    assert_eq!(
        events[0],
        GameEvent::GameStateChanged {
            state: GameState::Playing
        }
    );
    assert_eq!(events[1], GameEvent::ScoreChanged { score: 0 });
    assert_eq!(events[2], GameEvent::LivesChanged { lives: 3 });
    assert!(matches!(events[3], GameEvent::QuestionGenerated { .. }));
    assert_eq!(events[4], GameEvent::TimerUpdated { remaining_secs: 5.0 });
    assert_eq!(s.phase(), SessionPhase::RoundActive);
    assert_eq!(s.round_state(), RoundState::Playing);
    assert!(s.current_question().is_some());
}

#[test]
fn test_first_tick_spawns_a_target() {
    let mut s = session(2, fast_tier(3, 5.0));
    s.start_game().unwrap();
    let snap = s.tick(Duration::from_millis(10));
    assert_eq!(snap.targets.len(), 1);
    assert_eq!(
        snap.events
            .iter()
            .filter(|e| matches!(e, GameEvent::TargetSpawned { .. }))
            .count(),
        1
    );
}

#[test]
fn test_correct_answer_scores_and_next_round_follows_feedback() {
    let mut s = session(3, fast_tier(3, 5.0));
    s.start_game().unwrap();
    s.tick(MS_100);
    let answer = s.current_question().unwrap().correct_answer();
    s.drain_events();

    s.on_answer_submitted(answer);
    assert_eq!(s.state().score, 1);
    assert_eq!(s.phase(), SessionPhase::Feedback);
    assert_eq!(s.round_state(), RoundState::CorrectSelected);
    let events = s.drain_events();
    assert_eq!(events[0], GameEvent::CorrectAnswerSelected { value: answer });
    assert_eq!(events[1], GameEvent::ScoreChanged { score: 1 });

    // Spawning stops once the round is decided.
    let snap = s.tick(Duration::from_millis(1000));
    assert!(snap.events.is_empty());
    assert_eq!(s.phase(), SessionPhase::Feedback);

    let snap = s.tick(Duration::from_millis(500));
    assert_eq!(s.phase(), SessionPhase::RoundActive);
    assert_eq!(snap.events[0], GameEvent::TargetsCleared);
    assert!(matches!(snap.events[1], GameEvent::QuestionGenerated { .. }));
    assert_eq!(s.rounds_played(), 2);
    assert_eq!(s.state().time_remaining_secs, 5.0);
}

#[test]
fn test_wrong_answer_costs_a_life() {
    let mut s = session(4, fast_tier(3, 5.0));
    s.start_game().unwrap();
    let answer = s.current_question().unwrap().correct_answer();
    s.on_answer_submitted(answer + 1);
    assert_eq!(s.state().lives_remaining, 2);
    assert_eq!(s.state().score, 0);
    assert_eq!(s.phase(), SessionPhase::Feedback);
    assert!(s
        .drain_events()
        .contains(&GameEvent::LivesChanged { lives: 2 }));
}

#[test]
fn test_input_during_feedback_is_ignored() {
    let mut s = session(5, fast_tier(3, 5.0));
    s.start_game().unwrap();
    let answer = s.current_question().unwrap().correct_answer();
    s.on_answer_submitted(answer);
    s.drain_events();
    s.on_answer_submitted(answer);
    s.on_target_tapped(TargetId(0));
    s.on_target_escaped(TargetId(0));
    assert!(s.drain_events().is_empty());
    assert_eq!(s.state().score, 1);
}

#[test]
fn test_tap_through_commands() {
    let mut s = session(6, fast_tier(3, 5.0));
    s.queue_command(mathpop_core::commands::PlayerCommand::StartGame);
    let snap = s.tick(MS_100);
    let target = snap.targets[0].clone();
    let correct = target.value == s.current_question().unwrap().correct_answer();

    s.queue_command(mathpop_core::commands::PlayerCommand::TapTarget { id: target.id });
    let snap = s.tick(Duration::ZERO);
    if correct {
        assert_eq!(snap.state.score, 1);
    } else {
        assert_eq!(snap.state.lives_remaining, 2);
    }
    assert_eq!(snap.phase, SessionPhase::Feedback);
}

#[test]
fn test_stop_game_interrupts_without_outcome() {
    let mut s = session(7, fast_tier(3, 5.0));
    s.start_game().unwrap();
    s.tick(MS_100);
    s.drain_events();

    s.stop_game();
    assert_eq!(s.phase(), SessionPhase::Interrupted);
    assert_eq!(s.round_state(), RoundState::Idle);
    assert_eq!(
        s.drain_events(),
        vec![GameEvent::GameStateChanged {
            state: GameState::Interrupted
        }]
    );
    assert!(s.record_store().history().is_empty());

    let snap = s.tick(Duration::from_secs(10));
    assert!(snap.events.is_empty());
    assert!(snap.targets.is_empty());
}

#[test]
fn test_timeout_path_fires_once_per_round() {
    let mut s = session(8, fast_tier(3, 0.5));
    s.start_game().unwrap();
    let mut lost = 0;
    for _ in 0..5 {
        let snap = s.tick(MS_100);
        lost += snap
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundLost { .. }))
            .count();
    }
    assert_eq!(lost, 1);
    assert_eq!(s.state().lives_remaining, 2);
    assert_eq!(s.state().time_remaining_secs, 0.0);
    assert_eq!(s.phase(), SessionPhase::Feedback);
}

#[test]
fn test_sub_step_round_time_is_rejected() {
    let mut s: ArcadeGameSession = ArcadeGameSession::new(
        SessionConfig::default(),
        InMemorySettings::default(),
        InMemoryRecordStore::new(),
    );
    assert!(matches!(
        s.initialize(GameSettings::default(), fast_tier(3, 0.0004)),
        Err(ConfigError::InvalidRoundTime(_))
    ));
    assert!(matches!(s.start_game(), Err(SessionError::NotInitialized)));
}

#[test]
fn test_shortest_round_times_out_on_first_step() {
    let mut s = session(11, fast_tier(3, 0.1));
    s.start_game().unwrap();
    let mut lost = 0;
    for _ in 0..10 {
        lost += s
            .tick(MS_100)
            .events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::RoundLost {
                        reason: LossReason::Timeout
                    }
                )
            })
            .count();
    }
    // One round per 0.1s of play plus 1.5s of feedback.
    assert_eq!(lost, 1);
    assert_eq!(s.state().lives_remaining, 2);
}

struct FailingRecordStore;

impl RecordStore for FailingRecordStore {
    fn best_score(&self, _difficulty: Difficulty) -> u32 {
        0
    }

    fn record(&mut self, _summary: &SessionSummary) -> Result<(), RecordError> {
        Err(RecordError::Unavailable("disk full".into()))
    }
}

#[test]
fn test_record_store_failure_does_not_block_game_over() {
    let mut s = ArcadeGameSession::new(
        SessionConfig::default(),
        InMemorySettings::default(),
        FailingRecordStore,
    );
    s.initialize(GameSettings::default(), fast_tier(1, 5.0)).unwrap();
    s.start_game().unwrap();
    let answer = s.current_question().unwrap().correct_answer();
    s.on_answer_submitted(answer + 1);
    assert_eq!(s.phase(), SessionPhase::GameOver);
    assert!(s
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::SessionFinished { .. })));
}

#[test]
fn test_high_score_is_flagged_once_beaten() {
    let mut s = session(9, fast_tier(1, 5.0));
    for expected_high in [true, false] {
        s.start_game().unwrap();
        let answer = s.current_question().unwrap().correct_answer();
        s.on_answer_submitted(answer);
        s.tick(Duration::from_secs(2));
        let answer = s.current_question().unwrap().correct_answer();
        s.on_answer_submitted(answer + 1);
        assert_eq!(s.phase(), SessionPhase::GameOver);
        let summary = s.record_store().history().last().unwrap().clone();
        assert_eq!(summary.final_score, 1);
        assert_eq!(summary.is_new_high_score, expected_high);
    }
    assert_eq!(s.record_store().best_score(Difficulty::Easy), 1);
}

#[test]
fn test_snapshot_reflects_session() {
    let mut s = session(10, fast_tier(3, 5.0));
    s.start_game().unwrap();
    let snap = s.tick(Duration::from_millis(250));
    assert_eq!(snap.phase, SessionPhase::RoundActive);
    assert_eq!(snap.round_state, RoundState::Playing);
    assert_eq!(snap.question, s.current_question());
    assert_eq!(snap.targets.len(), 3);
    assert_eq!(snap.score.rounds_played, 1);
    assert!(snap.targets.iter().all(|t| t.position.y > 0.0));
    assert_eq!(snap.time.tick, 1);
}

// ---- Properties ----

proptest! {
    #[test]
    fn prop_scheduler_emits_count_with_single_correct(
        seed in any::<u64>(),
        a in 0i32..500,
        b in 0i32..500,
        count in 1u32..12,
        interval_ms in 1u64..500,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut scheduler = ArcadeSpawnScheduler::new();
        scheduler.start(&question(a, Operation::Add, b), count, Duration::from_millis(interval_ms), &mut rng);
        let mut out = Vec::new();
        for _ in 0..count {
            scheduler.advance(Duration::from_millis(interval_ms), &mut out);
        }
        prop_assert_eq!(out.len(), count as usize);
        prop_assert_eq!(out.iter().filter(|d| d.is_correct).count(), 1);
        prop_assert!(out.iter().all(|d| d.value >= 0));
        prop_assert!(!scheduler.is_spawning());
    }

    #[test]
    fn prop_round_has_at_most_one_outcome(
        inputs in proptest::collection::vec((0u8..4, 0u32..4), 1..20),
    ) {
        let (mut c, _, _, _) = playing_round();
        let mut outcomes = 0;
        for (kind, target) in inputs {
            let id = TargetId(target);
            let outcome = match kind {
                0 => c.tap_target(id),
                1 => c.target_escaped(id),
                2 => c.submit_answer(target as i32 + 5),
                _ => c.timeout(),
            };
            if outcome.is_some() {
                outcomes += 1;
            }
        }
        prop_assert!(outcomes <= 1);
        let decided = c.drain_events().iter().filter(|e| matches!(
            e,
            GameEvent::CorrectAnswerSelected { .. }
                | GameEvent::WrongAnswerSelected { .. }
                | GameEvent::RoundLost { .. }
        )).count();
        prop_assert_eq!(decided, outcomes);
    }
}
