//! Arcade game session: the orchestrator.
//!
//! `ArcadeGameSession` owns the question generator, the round controller, the
//! spawn scheduler and the round timer. It processes player commands, runs the
//! per-tick systems and produces a `SessionSnapshot` per tick. Completely
//! headless, so sessions are deterministic under a fixed seed and fixed `dt`.

use std::collections::VecDeque;
use std::time::Duration;

use glam::Vec2;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use mathpop_core::commands::PlayerCommand;
use mathpop_core::components::Kinematics;
use mathpop_core::config::{ConfigError, DifficultySettings, GameSettings, NumberRangeTable};
use mathpop_core::constants::*;
use mathpop_core::enums::{GameState, RoundState, SessionPhase};
use mathpop_core::events::GameEvent;
use mathpop_core::state::{ScoreView, SessionSnapshot};
use mathpop_core::types::{Question, SessionState, SessionSummary, SimTime, TargetDescriptor, TargetId};
use mathpop_questions::QuestionGenerator;

use crate::records::{InMemoryRecordStore, RecordStore};
use crate::round::{ArcadeRoundController, RoundOutcome};
use crate::settings::{InMemorySettings, SettingsError, SettingsRepository};
use crate::systems::round_timer::RoundTimer;
use crate::systems::snapshot::{self, SnapshotContext};
use crate::systems::spawn_scheduler::ArcadeSpawnScheduler;

/// Setup failures. Play itself never fails.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("session has not been initialized")]
    NotInitialized,
}

/// Configuration for a new session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// RNG seed. Same seed = same session.
    pub seed: u64,
    /// Pause between a round outcome and the next round.
    pub feedback_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            feedback_delay: FEEDBACK_DELAY,
        }
    }
}

/// One play-through of arcade mode.
pub struct ArcadeGameSession<S = InMemorySettings, R = InMemoryRecordStore> {
    config: SessionConfig,
    settings_repository: S,
    record_store: R,

    generator: QuestionGenerator,
    controller: ArcadeRoundController,
    scheduler: ArcadeSpawnScheduler,
    timer: RoundTimer,
    rng: ChaCha8Rng,

    settings: GameSettings,
    difficulty_settings: DifficultySettings,
    range_table: NumberRangeTable,
    initialized: bool,

    phase: SessionPhase,
    state: SessionState,
    time: SimTime,
    feedback_remaining: Duration,
    rounds_played: u32,
    correct_answers: u32,
    best_score: u32,

    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
    spawn_buffer: Vec<TargetDescriptor>,
    next_lane: u32,
}

impl<S: SettingsRepository, R: RecordStore> ArcadeGameSession<S, R> {
    /// Create a session with explicit collaborators. Call `initialize` before playing.
    pub fn new(config: SessionConfig, settings_repository: S, record_store: R) -> Self {
        let settings = GameSettings::default();
        Self {
            config,
            settings_repository,
            record_store,
            generator: QuestionGenerator::with_seed(config.seed),
            controller: ArcadeRoundController::new(),
            scheduler: ArcadeSpawnScheduler::new(),
            timer: RoundTimer::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed.rotate_left(32) ^ 0x5eed),
            difficulty_settings: DifficultySettings::for_tier(settings.difficulty),
            settings,
            range_table: NumberRangeTable::default(),
            initialized: false,
            phase: SessionPhase::NotStarted,
            state: SessionState::default(),
            time: SimTime::default(),
            feedback_remaining: Duration::ZERO,
            rounds_played: 0,
            correct_answers: 0,
            best_score: 0,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            spawn_buffer: Vec::new(),
            next_lane: 0,
        }
    }

    /// Validate and apply settings. Lives and round time come from
    /// `difficulty_settings`; the score is reset.
    pub fn initialize(
        &mut self,
        settings: GameSettings,
        difficulty_settings: DifficultySettings,
    ) -> Result<(), ConfigError> {
        settings.validate()?;
        difficulty_settings.validate()?;
        let ranges = settings.resolve_ranges(&self.range_table)?;
        self.generator
            .initialize(&settings.operations, &ranges, settings.difficulty)?;

        self.halt_round();
        self.controller.abort();
        self.best_score = self.record_store.best_score(settings.difficulty);
        self.state = SessionState {
            lives_remaining: difficulty_settings.lives,
            score: 0,
            time_remaining_secs: difficulty_settings.round_time_secs,
        };
        self.settings = settings;
        self.difficulty_settings = difficulty_settings;
        self.phase = SessionPhase::NotStarted;
        self.initialized = true;
        info!(
            "session initialized: {} with {:?}, {} lives, {}s rounds",
            self.settings.difficulty,
            self.settings.operations,
            difficulty_settings.lives,
            difficulty_settings.round_time_secs
        );
        Ok(())
    }

    /// Load settings and tables through the settings repository, then initialize.
    pub fn initialize_from_repository(&mut self) -> Result<(), SessionError> {
        let settings = self.settings_repository.load_settings()?;
        let table = self.settings_repository.difficulty_table()?;
        self.range_table = self.settings_repository.number_range_table()?;
        let difficulty_settings = *table.get(settings.difficulty)?;
        self.initialize(settings, difficulty_settings)?;
        Ok(())
    }

    /// Reset lives and score and begin the first round.
    pub fn start_game(&mut self) -> Result<(), SessionError> {
        if !self.initialized {
            return Err(SessionError::NotInitialized);
        }
        self.halt_round();
        self.controller.abort();
        self.generator.reset_session();
        self.state = SessionState {
            lives_remaining: self.difficulty_settings.lives,
            score: 0,
            time_remaining_secs: self.difficulty_settings.round_time_secs,
        };
        self.rounds_played = 0;
        self.correct_answers = 0;
        self.time = SimTime::default();
        self.phase = SessionPhase::RoundActive;
        info!("game started at {}", self.settings.difficulty);

        self.events.push(GameEvent::GameStateChanged {
            state: GameState::Playing,
        });
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.events.push(GameEvent::LivesChanged {
            lives: self.state.lives_remaining,
        });
        self.start_round();
        Ok(())
    }

    /// Clear the previous round and pose a fresh question with full time.
    ///
    /// Ignored unless a game is in progress.
    pub fn start_round(&mut self) {
        if !matches!(self.phase, SessionPhase::RoundActive | SessionPhase::Feedback) {
            debug!("start_round ignored in {:?}", self.phase);
            return;
        }
        self.halt_round();
        self.controller.end_round();
        self.pump_controller_events();

        let question = self.generator.generate_question();
        self.events.push(GameEvent::QuestionGenerated { question });
        self.controller.start_round(question);
        self.scheduler.start(
            &question,
            self.difficulty_settings.target_count,
            self.difficulty_settings.spawn_interval(),
            &mut self.rng,
        );
        self.timer.reset(self.difficulty_settings.round_time());
        self.state.time_remaining_secs = self.timer.remaining_secs();
        self.events.push(GameEvent::TimerUpdated {
            remaining_secs: self.state.time_remaining_secs,
        });
        self.feedback_remaining = Duration::ZERO;
        self.next_lane = 0;
        self.rounds_played += 1;
        self.phase = SessionPhase::RoundActive;
        debug!("round {} started: {question}", self.rounds_played);
    }

    /// Leave the session early. No outcome events and no record.
    pub fn stop_game(&mut self) {
        if !matches!(self.phase, SessionPhase::RoundActive | SessionPhase::Feedback) {
            debug!("stop_game ignored in {:?}", self.phase);
            return;
        }
        self.halt_round();
        self.controller.abort();
        self.phase = SessionPhase::Interrupted;
        self.events.push(GameEvent::GameStateChanged {
            state: GameState::Interrupted,
        });
        info!("game interrupted after {} round(s)", self.rounds_played);
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the session by `dt` and return the resulting snapshot.
    pub fn tick(&mut self, dt: Duration) -> SessionSnapshot {
        self.process_commands();

        match self.phase {
            SessionPhase::RoundActive => {
                self.run_round(dt);
                self.time.advance(dt);
            }
            SessionPhase::Feedback => {
                self.run_feedback(dt);
                self.time.advance(dt);
            }
            SessionPhase::NotStarted | SessionPhase::GameOver | SessionPhase::Interrupted => {}
        }

        let events = std::mem::take(&mut self.events);
        snapshot::build_snapshot(self.controller.world(), self.snapshot_context(), events)
    }

    // --- Presentation input ---

    pub fn on_target_tapped(&mut self, id: TargetId) {
        if !self.accepts_input() {
            return;
        }
        let outcome = self.controller.tap_target(id);
        self.settle(outcome);
    }

    pub fn on_target_escaped(&mut self, id: TargetId) {
        if !self.accepts_input() {
            return;
        }
        let outcome = self.controller.target_escaped(id);
        self.settle(outcome);
    }

    pub fn on_answer_submitted(&mut self, value: i32) {
        if !self.accepts_input() {
            return;
        }
        let outcome = self.controller.submit_answer(value);
        self.settle(outcome);
    }

    // --- Accessors ---

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn round_state(&self) -> RoundState {
        self.controller.state()
    }

    pub fn current_question(&self) -> Option<Question> {
        self.controller.question()
    }

    pub fn controller(&self) -> &ArcadeRoundController {
        &self.controller
    }

    pub fn scheduler(&self) -> &ArcadeSpawnScheduler {
        &self.scheduler
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn difficulty_settings(&self) -> &DifficultySettings {
        &self.difficulty_settings
    }

    pub fn record_store(&self) -> &R {
        &self.record_store
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Events not yet delivered through a snapshot.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Internals ---

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame => {
                if let Err(err) = self.start_game() {
                    warn!("cannot start game: {err}");
                }
            }
            PlayerCommand::TapTarget { id } => self.on_target_tapped(id),
            PlayerCommand::TargetEscaped { id } => self.on_target_escaped(id),
            PlayerCommand::SubmitAnswer { value } => self.on_answer_submitted(value),
            PlayerCommand::StopGame => self.stop_game(),
        }
    }

    fn accepts_input(&self) -> bool {
        if self.phase != SessionPhase::RoundActive {
            debug!("input ignored in {:?}", self.phase);
            return false;
        }
        true
    }

    /// Timer, then spawns, then movement. Stops at the first outcome.
    fn run_round(&mut self, dt: Duration) {
        let expired = self.timer.advance(dt, &mut self.events);
        self.state.time_remaining_secs = self.timer.remaining_secs();
        if expired {
            let outcome = self.controller.timeout();
            self.settle(outcome);
            return;
        }

        let mut due = std::mem::take(&mut self.spawn_buffer);
        due.clear();
        self.scheduler.advance(dt, &mut due);
        for descriptor in due.drain(..) {
            self.place_target(descriptor);
        }
        self.spawn_buffer = due;

        let outcome = self.controller.advance_targets(dt);
        self.settle(outcome);
    }

    fn run_feedback(&mut self, dt: Duration) {
        self.feedback_remaining = self.feedback_remaining.saturating_sub(dt);
        if self.feedback_remaining.is_zero() {
            self.start_round();
        }
    }

    /// Spread targets over lanes across the playfield width.
    fn place_target(&mut self, descriptor: TargetDescriptor) {
        let lanes = self.difficulty_settings.target_count.max(1);
        let lane = self.next_lane % lanes;
        self.next_lane += 1;
        let lane_width = PLAYFIELD_WIDTH / lanes as f32;
        let jitter = self.rng.gen_range(-0.5f32..=0.5) * TARGET_LANE_JITTER * lane_width;
        let x = (lane as f32 + 0.5) * lane_width + jitter;
        let position = Vec2::new(x, TARGET_SPAWN_Y);
        let kinematics = Kinematics::rising(position, self.difficulty_settings.target_rise_speed);

        if let Some(id) = self.controller.register_target(descriptor, kinematics) {
            self.events.push(GameEvent::TargetSpawned {
                id,
                value: descriptor.value,
                x: position.x,
                y: position.y,
            });
        }
    }

    fn pump_controller_events(&mut self) {
        self.events.extend(self.controller.drain_events());
    }

    /// Apply a round outcome, if any, to lives and score.
    fn settle(&mut self, outcome: Option<RoundOutcome>) {
        self.pump_controller_events();
        let Some(outcome) = outcome else {
            return;
        };
        self.halt_round();

        match outcome {
            RoundOutcome::Correct { .. } => {
                self.state.score += 1;
                self.correct_answers += 1;
                self.events.push(GameEvent::ScoreChanged {
                    score: self.state.score,
                });
                self.enter_feedback();
            }
            RoundOutcome::Wrong { .. } | RoundOutcome::Lost { .. } => {
                self.state.lives_remaining = self.state.lives_remaining.saturating_sub(1);
                self.events.push(GameEvent::LivesChanged {
                    lives: self.state.lives_remaining,
                });
                if self.state.lives_remaining == 0 {
                    self.game_over();
                } else {
                    self.enter_feedback();
                }
            }
        }
    }

    fn enter_feedback(&mut self) {
        self.phase = SessionPhase::Feedback;
        self.feedback_remaining = self.config.feedback_delay;
    }

    fn game_over(&mut self) {
        self.phase = SessionPhase::GameOver;
        self.events.push(GameEvent::GameStateChanged {
            state: GameState::GameOver,
        });

        let summary = SessionSummary {
            difficulty: self.settings.difficulty,
            final_score: self.state.score,
            is_new_high_score: self.state.score > self.best_score,
            rounds_played: self.rounds_played,
            correct_answers: self.correct_answers,
        };
        if let Err(err) = self.record_store.record(&summary) {
            warn!("failed to record session: {err}");
        }
        if summary.is_new_high_score {
            self.best_score = summary.final_score;
        }
        info!(
            "game over: score {} after {} round(s){}",
            summary.final_score,
            summary.rounds_played,
            if summary.is_new_high_score { " (new high score)" } else { "" }
        );
        self.events.push(GameEvent::SessionFinished { summary });
    }

    /// Stop spawning and the round timer.
    fn halt_round(&mut self) {
        self.scheduler.stop_spawning();
        self.timer.stop();
    }

    fn snapshot_context(&self) -> SnapshotContext {
        SnapshotContext {
            time: self.time,
            phase: self.phase,
            round_state: self.controller.state(),
            difficulty: self.settings.difficulty,
            question: self.controller.question(),
            state: self.state,
            score: ScoreView {
                rounds_played: self.rounds_played,
                correct_answers: self.correct_answers,
                best_score: self.best_score,
            },
        }
    }
}
