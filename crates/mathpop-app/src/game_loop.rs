//! Game loop thread: ticks an arcade session in real time at 30Hz.
//!
//! The session moves into the thread. Commands arrive via `mpsc` and every
//! tick's snapshot is sent back on a second channel.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Instant;

use log::debug;

use mathpop_arcade::{ArcadeGameSession, FrameClock, RecordStore, SettingsRepository, WallClock};
use mathpop_core::constants::TICK_DURATION;
use mathpop_core::state::SessionSnapshot;

use crate::state::GameLoopCommand;

/// Channels and thread of a running game loop.
pub struct GameLoopHandle {
    pub commands: mpsc::Sender<GameLoopCommand>,
    pub snapshots: mpsc::Receiver<SessionSnapshot>,
    thread: JoinHandle<()>,
}

impl GameLoopHandle {
    /// Ask the loop to stop and wait for the thread.
    pub fn shutdown(self) -> std::thread::Result<()> {
        let _ = self.commands.send(GameLoopCommand::Shutdown);
        drop(self.snapshots);
        self.thread.join()
    }
}

/// Spawns the game loop in a new thread.
pub fn spawn_game_loop<S, R>(session: ArcadeGameSession<S, R>) -> io::Result<GameLoopHandle>
where
    S: SettingsRepository + Send + 'static,
    R: RecordStore + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let (snap_tx, snap_rx) = mpsc::channel::<SessionSnapshot>();

    let thread = std::thread::Builder::new()
        .name("mathpop-game-loop".into())
        .spawn(move || run_game_loop(session, cmd_rx, snap_tx))?;

    Ok(GameLoopHandle {
        commands: cmd_tx,
        snapshots: snap_rx,
        thread,
    })
}

/// Runs until Shutdown, a disconnected command channel or a dropped snapshot receiver.
fn run_game_loop<S: SettingsRepository, R: RecordStore>(
    mut session: ArcadeGameSession<S, R>,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    snap_tx: mpsc::Sender<SessionSnapshot>,
) {
    let mut clock = WallClock::new();
    let mut next_tick_time = Instant::now();

    loop {
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => session.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        let snapshot = session.tick(clock.delta());
        if snap_tx.send(snapshot).is_err() {
            debug!("snapshot receiver dropped, stopping game loop");
            return;
        }

        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; skip ahead rather than spiral.
            next_tick_time = now;
        }
    }
}
