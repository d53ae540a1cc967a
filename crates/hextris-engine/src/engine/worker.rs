use std::{
    ops::ControlFlow,
    sync::{
        Arc, Mutex, MutexGuard,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    core::{StoneCollision, StoneMove},
    engine::{DropRequest, Game, GameSnapshot, NewGameOptions},
};

/// Delay between scripted autoplay steps; paced like a player's key
/// presses rather than applied instantly.
pub const PLAN_STEP_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerSignal {
    /// Run the tick now instead of waiting out the drop interval.
    Wake,
    /// Re-evaluate the wait state without ticking (pause toggled, new
    /// game started).
    Refresh,
    Shutdown,
}

/// Owns the drop-loop thread and the shared game state.
///
/// The loop waits out the level's drop interval on an `mpsc` channel, so a
/// manual drop request cancels the wait instead of waiting for the timer.
/// While the game is paused (or over, or not started) the loop blocks on
/// the channel without ticking. Dropping the handle shuts the thread down
/// after at most one outstanding wait.
#[derive(Debug)]
pub struct GameWorker {
    game: Arc<Mutex<Game>>,
    signals: Sender<WorkerSignal>,
    thread: Option<JoinHandle<()>>,
}

impl GameWorker {
    #[must_use]
    pub fn spawn(game: Game) -> Self {
        let game = Arc::new(Mutex::new(game));
        let (signals, receiver) = mpsc::channel();
        let shared = Arc::clone(&game);
        let thread = thread::Builder::new()
            .name("hextris-drop-loop".into())
            .spawn(move || drop_loop(&shared, &receiver))
            .expect("failed to spawn drop-loop thread");
        Self {
            game,
            signals,
            thread: Some(thread),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Game> {
        self.game.lock().expect("game state poisoned")
    }

    pub fn new_game(&self, options: NewGameOptions) {
        self.lock().new_game(options);
        let _ = self.signals.send(WorkerSignal::Refresh);
    }

    pub fn toggle_pause(&self) {
        self.lock().toggle_pause();
        let _ = self.signals.send(WorkerSignal::Refresh);
    }

    /// Immediate translation or rotation, applied in the caller's thread.
    pub fn move_stone(&self, direction: StoneMove) -> Result<(), StoneCollision> {
        self.lock().move_stone(direction)
    }

    /// Registers a descent request and wakes the waiting drop loop.
    pub fn request(&self, request: DropRequest) {
        self.lock().request(request);
        let _ = self.signals.send(WorkerSignal::Wake);
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.lock().snapshot()
    }
}

impl Drop for GameWorker {
    fn drop(&mut self) {
        let _ = self.signals.send(WorkerSignal::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn drop_loop(game: &Mutex<Game>, signals: &Receiver<WorkerSignal>) {
    loop {
        let interval = {
            let game = game.lock().expect("game state poisoned");
            game.phase().is_running().then(|| game.drop_interval())
        };
        let signal = match interval {
            // Running: wait out the drop interval unless a signal arrives
            // first.
            Some(interval) => match signals.recv_timeout(interval) {
                Ok(signal) => Some(signal),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => return,
            },
            // Not running: nothing to time, block until something changes.
            None => match signals.recv() {
                Ok(signal) => Some(signal),
                Err(_) => return,
            },
        };
        match signal {
            Some(WorkerSignal::Shutdown) => return,
            // A refresh re-arms the wait without a descent, but a freshly
            // spawned demo stone already carries a plan to replay.
            Some(WorkerSignal::Refresh) => {}
            Some(WorkerSignal::Wake) | None => {
                game.lock().expect("game state poisoned").tick();
            }
        }
        if run_plan_steps(game, signals).is_break() {
            return;
        }
    }
}

/// Replays the autoplay plan one validated step at a time, pausing
/// [`PLAN_STEP_DELAY`] between steps. Breaks on shutdown.
fn run_plan_steps(game: &Mutex<Game>, signals: &Receiver<WorkerSignal>) -> ControlFlow<()> {
    loop {
        let done = game.lock().expect("game state poisoned").step_plan();
        if done {
            return ControlFlow::Continue(());
        }
        match signals.recv_timeout(PLAN_STEP_DELAY) {
            Ok(WorkerSignal::Shutdown) => return ControlFlow::Break(()),
            Ok(WorkerSignal::Wake | WorkerSignal::Refresh) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return ControlFlow::Break(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::{
        core::{HexBoard, Severity, Stone},
        engine::{BestMovePlanner, GameConfig, GamePhase, StonePlan},
    };

    fn wait_for(worker: &GameWorker, mut done: impl FnMut(&GameSnapshot) -> bool) -> GameSnapshot {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let snapshot = worker.snapshot();
            if done(&snapshot) || Instant::now() > deadline {
                return snapshot;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn fall_down_request_commits_promptly() {
        let worker = GameWorker::spawn(Game::new(GameConfig::default()));
        worker.new_game(NewGameOptions::standard(Severity::Medium, 1).with_seed(11));
        // Level 1 ticks every 800 ms; the wake must not wait that long.
        let started = Instant::now();
        worker.request(DropRequest::FallDown);
        let snapshot = wait_for(&worker, |s| s.stats.stones() >= 1);
        assert_eq!(snapshot.stats.stones(), 1);
        assert!(started.elapsed() < Duration::from_millis(700));
    }

    #[test]
    fn paused_game_does_not_advance() {
        let worker = GameWorker::spawn(Game::new(GameConfig::default()));
        worker.new_game(NewGameOptions::standard(Severity::Medium, 10).with_seed(11));
        worker.toggle_pause();
        let before = worker.snapshot();
        assert_eq!(before.phase, GamePhase::Paused);
        // Several level-10 intervals pass without a descent.
        thread::sleep(Duration::from_millis(300));
        let after = worker.snapshot();
        assert_eq!(after.board, before.board);
        assert_eq!(after.stats, before.stats);

        worker.toggle_pause();
        let resumed = wait_for(&worker, |s| s.board != before.board);
        assert_eq!(resumed.phase, GamePhase::Running);
    }

    #[derive(Debug)]
    struct LeftShiftPlanner;

    impl BestMovePlanner for LeftShiftPlanner {
        fn best_move(&self, _board: &HexBoard, stone: &Stone) -> Option<StonePlan> {
            Some(StonePlan {
                target_x: stone.position().x - 2,
                rotations: 0,
            })
        }
    }

    #[test]
    fn demo_plan_starts_before_the_first_timed_tick() {
        // Demo at level 1: the first descent is 800 ms away, so any earlier
        // board change can only come from the scripted plan.
        let options = NewGameOptions {
            severity: Severity::Medium,
            start_level: 1,
            demo: true,
            seed: Some(11),
        };
        let mut reference = Game::new(GameConfig::default());
        reference.new_game(options);
        let spawn_board = reference.snapshot().board;

        let game = Game::new(GameConfig::default()).with_planner(Box::new(LeftShiftPlanner));
        let worker = GameWorker::spawn(game);
        let started = Instant::now();
        worker.new_game(options);
        let snapshot = wait_for(&worker, |s| s.board != spawn_board);
        assert!(started.elapsed() < Duration::from_millis(400));
        assert_ne!(snapshot.board, spawn_board);
        // The stone shifted sideways; it has not descended or committed.
        assert_eq!(snapshot.stats.stones(), 0);
        assert_eq!(snapshot.stats.score(), 0);
    }

    #[test]
    fn dropping_the_handle_joins_the_thread() {
        let worker = GameWorker::spawn(Game::new(GameConfig::default()));
        worker.new_game(NewGameOptions::standard(Severity::Beginner, 1).with_seed(11));
        drop(worker);
    }
}
