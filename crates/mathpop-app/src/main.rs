//! `mathpop` command line: headless arcade runs and practice question dumps.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use mathpop_app::bot::BotPlayer;
use mathpop_app::game_loop::spawn_game_loop;
use mathpop_app::persistence::{JsonRecordStore, JsonSettingsRepository};
use mathpop_app::state::GameLoopCommand;
use mathpop_arcade::{
    ArcadeGameSession, FrameClock, ManualClock, RecordStore, SessionConfig, SettingsRepository,
};
use mathpop_core::commands::PlayerCommand;
use mathpop_core::config::{GameSettings, NumberRangeTable};
use mathpop_core::constants::TICK_DURATION;
use mathpop_core::enums::{Difficulty, Operation, PracticeMode, SessionPhase};
use mathpop_core::events::GameEvent;
use mathpop_core::state::SessionSnapshot;
use mathpop_core::types::NumberRange;
use mathpop_questions::{PracticeSession, QuestionGenerator};

#[derive(Debug, Parser)]
#[command(name = "mathpop", version, about = "Arithmetic arcade game core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play an arcade session with a scripted player.
    Play(PlayArgs),
    /// Print practice questions.
    Questions(QuestionArgs),
}

#[derive(Debug, Args)]
struct QuestionFilter {
    #[arg(long, default_value = "easy")]
    difficulty: Difficulty,
    /// Comma-separated, e.g. `add,mul`.
    #[arg(long, value_delimiter = ',', default_value = "add,sub")]
    ops: Vec<Operation>,
    /// Explicit operand range as `MIN..MAX`; tier default when omitted.
    #[arg(long, value_parser = parse_range)]
    range: Option<NumberRange>,
    /// Random seed; a fresh one when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

impl QuestionFilter {
    fn settings(&self) -> GameSettings {
        GameSettings {
            difficulty: self.difficulty,
            operations: self.ops.clone(),
            number_ranges: self.range.map(|r| vec![r]),
        }
    }

    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[derive(Debug, Args)]
struct PlayArgs {
    #[command(flatten)]
    filter: QuestionFilter,
    /// Settings JSON; overrides difficulty, ops and range.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Difficulty table JSON.
    #[arg(long)]
    difficulty_table: Option<PathBuf>,
    /// Number range table JSON.
    #[arg(long)]
    range_table: Option<PathBuf>,
    /// Best scores and history are kept here.
    #[arg(long, default_value = "mathpop-records.json")]
    records: PathBuf,
    /// Chance the bot taps the right answer.
    #[arg(long, default_value_t = 0.8)]
    accuracy: f64,
    /// Bot reaction time in milliseconds.
    #[arg(long, default_value_t = 1500)]
    reaction_ms: u64,
    /// Give up after this much game time.
    #[arg(long, default_value_t = 600)]
    max_secs: u64,
    /// Run on the wall clock instead of as fast as possible.
    #[arg(long)]
    realtime: bool,
    /// Print events as JSON lines.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Choice,
    Typed,
    Flash,
}

impl From<ModeArg> for PracticeMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Choice => PracticeMode::MultipleChoice,
            ModeArg::Typed => PracticeMode::TypedInput,
            ModeArg::Flash => PracticeMode::FlashCard,
        }
    }
}

#[derive(Debug, Args)]
struct QuestionArgs {
    #[command(flatten)]
    filter: QuestionFilter,
    #[arg(long, default_value_t = 10)]
    count: usize,
    #[arg(long, value_enum, default_value = "choice")]
    mode: ModeArg,
}

fn parse_range(s: &str) -> std::result::Result<NumberRange, String> {
    let (min, max) = s
        .split_once("..")
        .ok_or_else(|| format!("expected MIN..MAX, got `{s}`"))?;
    let min = min.trim().parse::<i32>().map_err(|e| e.to_string())?;
    let max = max.trim().parse::<i32>().map_err(|e| e.to_string())?;
    NumberRange::new(min, max).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Play(args) => play(args),
        Command::Questions(args) => questions(args),
    }
}

fn play(args: PlayArgs) -> Result<()> {
    if !(0.0..=1.0).contains(&args.accuracy) {
        bail!("--accuracy must be between 0 and 1, got {}", args.accuracy);
    }
    let seed = args.filter.seed();
    info!("seed {seed}");

    let mut repository = JsonSettingsRepository::new(args.filter.settings());
    if let Some(path) = &args.settings {
        repository = repository.with_settings_file(path);
    }
    if let Some(path) = &args.difficulty_table {
        repository = repository.with_difficulty_file(path);
    }
    if let Some(path) = &args.range_table {
        repository = repository.with_ranges_file(path);
    }
    let records = JsonRecordStore::new(&args.records);

    let mut session = ArcadeGameSession::new(
        SessionConfig {
            seed,
            ..Default::default()
        },
        repository,
        records,
    );
    session
        .initialize_from_repository()
        .context("failed to load game settings")?;

    let bot = BotPlayer::new(
        seed ^ 0xb07,
        args.accuracy,
        Duration::from_millis(args.reaction_ms),
    );
    let limit = Duration::from_secs(args.max_secs);
    if args.realtime {
        play_realtime(session, bot, limit, args.json)
    } else {
        play_headless(session, bot, limit, args.json)
    }
}

fn play_headless<S: SettingsRepository, R: RecordStore>(
    mut session: ArcadeGameSession<S, R>,
    mut bot: BotPlayer,
    limit: Duration,
    json: bool,
) -> Result<()> {
    let mut clock = ManualClock::new(TICK_DURATION);
    session.start_game().context("failed to start game")?;
    loop {
        let dt = clock.delta();
        let snapshot = session.tick(dt);
        report(&snapshot, json)?;
        if is_finished(&snapshot) {
            return Ok(());
        }
        if Duration::from_secs_f64(snapshot.time.elapsed_secs) >= limit {
            info!("time limit reached");
            session.stop_game();
        } else if let Some(command) = bot.observe(&snapshot, dt) {
            session.queue_command(command);
        }
    }
}

fn play_realtime<S, R>(
    session: ArcadeGameSession<S, R>,
    mut bot: BotPlayer,
    limit: Duration,
    json: bool,
) -> Result<()>
where
    S: SettingsRepository + Send + 'static,
    R: RecordStore + Send + 'static,
{
    let handle = spawn_game_loop(session).context("failed to spawn game loop")?;
    handle
        .commands
        .send(GameLoopCommand::PlayerCommand(PlayerCommand::StartGame))
        .context("game loop stopped early")?;

    let mut last_elapsed = 0.0;
    while let Ok(snapshot) = handle.snapshots.recv() {
        report(&snapshot, json)?;
        if is_finished(&snapshot) {
            break;
        }
        let dt = Duration::from_secs_f64((snapshot.time.elapsed_secs - last_elapsed).max(0.0));
        last_elapsed = snapshot.time.elapsed_secs;
        let command = if Duration::from_secs_f64(snapshot.time.elapsed_secs) >= limit {
            Some(PlayerCommand::StopGame)
        } else {
            bot.observe(&snapshot, dt)
        };
        if let Some(command) = command {
            handle
                .commands
                .send(GameLoopCommand::PlayerCommand(command))
                .context("game loop stopped early")?;
        }
    }
    handle
        .shutdown()
        .map_err(|_| anyhow!("game loop thread panicked"))
}

fn is_finished(snapshot: &SessionSnapshot) -> bool {
    matches!(
        snapshot.phase,
        SessionPhase::GameOver | SessionPhase::Interrupted
    )
}

fn report(snapshot: &SessionSnapshot, json: bool) -> Result<()> {
    for event in &snapshot.events {
        if json {
            println!("{}", serde_json::to_string(event)?);
            continue;
        }
        let t = snapshot.time.elapsed_secs;
        match event {
            GameEvent::QuestionGenerated { question } => println!("[{t:6.2}] {question}"),
            GameEvent::CorrectAnswerSelected { value } => println!("[{t:6.2}] {value} correct"),
            GameEvent::WrongAnswerSelected { value } => println!("[{t:6.2}] {value} wrong"),
            GameEvent::RoundLost { reason } => println!("[{t:6.2}] round lost: {reason:?}"),
            GameEvent::LivesChanged { lives } => println!("[{t:6.2}] lives {lives}"),
            GameEvent::ScoreChanged { score } => println!("[{t:6.2}] score {score}"),
            GameEvent::SessionFinished { summary } => println!(
                "game over: {} point(s) in {} round(s) at {}{}",
                summary.final_score,
                summary.rounds_played,
                summary.difficulty,
                if summary.is_new_high_score {
                    ", new high score!"
                } else {
                    ""
                }
            ),
            GameEvent::GameStateChanged { state } => println!("[{t:6.2}] {state:?}"),
            _ => {}
        }
    }
    Ok(())
}

fn questions(args: QuestionArgs) -> Result<()> {
    let settings = args.filter.settings();
    settings.validate().context("invalid question settings")?;
    let ranges = settings.resolve_ranges(&NumberRangeTable::default())?;

    let seed = args.filter.seed();
    let mut generator = QuestionGenerator::with_seed(seed);
    generator
        .initialize(&settings.operations, &ranges, settings.difficulty)
        .context("failed to initialize question generator")?;

    let mode = PracticeMode::from(args.mode);
    let mut practice = PracticeSession::new(mode, generator, seed.wrapping_add(1));
    for i in 1..=args.count {
        let prompt = practice.next_prompt();
        if prompt.options.is_empty() {
            println!("{i:3}. {}", prompt.question);
        } else {
            let options: Vec<String> = prompt.options.iter().map(i32::to_string).collect();
            println!("{i:3}. {}   [{}]", prompt.question, options.join(" | "));
        }
    }
    Ok(())
}
