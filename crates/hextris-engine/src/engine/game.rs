use std::{fmt, time::Duration};

use crate::{
    core::{HexBoard, HexPos, Severity, Stone, StoneCollision, StoneMove},
    engine::{GameConfig, GameStats, StoneGenerator},
};

/// Floor for the level-derived drop interval; keeps the interval positive
/// at levels where the raw formula reaches zero.
pub const MIN_DROP_INTERVAL: Duration = Duration::from_millis(50);

/// Start level used by demo games.
pub const DEMO_START_LEVEL: u32 = 7;

/// Time between automatic descents at the given level.
#[must_use]
pub fn drop_interval(level: u32) -> Duration {
    let millis = u64::from(1800 / (level + 1)).saturating_sub(100);
    Duration::from_millis(millis).max(MIN_DROP_INTERVAL)
}

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GamePhase {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Descent request consumed by the next tick. A manual single-row drop
/// never overwrites an already pending request; a fall-to-bottom always
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRequest {
    MoveDown,
    FallDown,
}

/// Target placement produced by a planner: a column for the stone's
/// anchor and the number of left rotations to apply first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StonePlan {
    pub target_x: i32,
    pub rotations: u8,
}

/// Chooses a placement for a freshly spawned stone. Called with the stone
/// erased from the board, so the settled content is unobstructed.
pub trait BestMovePlanner: fmt::Debug + Send {
    fn best_move(&self, board: &HexBoard, stone: &Stone) -> Option<StonePlan>;
}

/// Parameters of a new-game transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewGameOptions {
    pub severity: Severity,
    pub start_level: u32,
    pub demo: bool,
    pub seed: Option<u64>,
}

impl NewGameOptions {
    #[must_use]
    pub fn standard(severity: Severity, start_level: u32) -> Self {
        Self {
            severity,
            start_level,
            demo: false,
            seed: None,
        }
    }

    /// Demo games run the autoplay planner at a fixed severity and level.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            severity: Severity::Medium,
            start_level: DEMO_START_LEVEL,
            demo: true,
            seed: None,
        }
    }

    /// Fixes the stone sequence; used by tests and replays.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Read-only copy of everything a front end renders.
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    pub board: HexBoard,
    pub preview: HexBoard,
    pub stats: GameStats,
    pub phase: GamePhase,
    pub demo: bool,
}

/// The timed falling-block state machine.
///
/// All transitions run in the caller's thread; [`GameWorker`] wraps a
/// `Game` in a mutex and drives [`Game::tick`] from the drop loop.
///
/// [`GameWorker`]: crate::engine::GameWorker
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    board: HexBoard,
    preview: HexBoard,
    generator: StoneGenerator,
    current: Option<Stone>,
    next: Option<Stone>,
    stats: GameStats,
    phase: GamePhase,
    pending: Option<DropRequest>,
    demo: bool,
    planner: Option<Box<dyn BestMovePlanner>>,
    plan: Option<StonePlan>,
}

impl Game {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let mut board = HexBoard::new(config.board_width, config.board_height);
        board.reset_play_field();
        let preview = HexBoard::new(config.preview_size, config.preview_size);
        let generator = StoneGenerator::new(config.severity);
        let stats = GameStats::new(config.severity, config.start_level);
        Self {
            config,
            board,
            preview,
            generator,
            current: None,
            next: None,
            stats,
            phase: GamePhase::NotStarted,
            pending: None,
            demo: false,
            planner: None,
            plan: None,
        }
    }

    /// Installs the planner used by demo games.
    #[must_use]
    pub fn with_planner(mut self, planner: Box<dyn BestMovePlanner>) -> Self {
        self.planner = Some(planner);
        self
    }

    #[must_use]
    pub fn board(&self) -> &HexBoard {
        &self.board
    }

    #[must_use]
    pub fn preview(&self) -> &HexBoard {
        &self.preview
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.demo
    }

    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        drop_interval(self.stats.level())
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            preview: self.preview.clone(),
            stats: self.stats,
            phase: self.phase,
            demo: self.demo,
        }
    }

    /// Resets counters, re-frames the boards and spawns the first stone.
    /// Allowed from any phase.
    pub fn new_game(&mut self, options: NewGameOptions) {
        self.demo = options.demo;
        self.stats = GameStats::new(options.severity, options.start_level);
        self.generator = match options.seed {
            Some(seed) => StoneGenerator::with_seed(options.severity, seed),
            None => StoneGenerator::new(options.severity),
        };
        self.board.reset_play_field();
        self.preview = HexBoard::new(self.config.preview_size, self.config.preview_size);
        self.pending = None;
        self.plan = None;
        self.phase = GamePhase::Running;
        self.refill_next();
        self.spawn_next();
    }

    /// Applies one immediate translation or rotation to the falling stone.
    pub fn move_stone(&mut self, direction: StoneMove) -> Result<(), StoneCollision> {
        if !self.phase.is_running() {
            return Err(StoneCollision);
        }
        let Some(stone) = self.current.as_mut() else {
            return Err(StoneCollision);
        };
        stone.try_move(&mut self.board, direction)
    }

    /// Registers a descent request for the next tick.
    pub fn request(&mut self, request: DropRequest) {
        match request {
            DropRequest::MoveDown => {
                if self.pending.is_none() {
                    self.pending = Some(DropRequest::MoveDown);
                }
            }
            DropRequest::FallDown => self.pending = Some(DropRequest::FallDown),
        }
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => other,
        };
    }

    /// One step of the drop loop: consumes the pending request, descends
    /// (or falls) the stone, commits it on contact and spawns the next
    /// one. A no-op outside the running phase.
    pub fn tick(&mut self) {
        if !self.phase.is_running() || self.current.is_none() {
            return;
        }
        match self.pending.take() {
            Some(DropRequest::FallDown) => self.fall_down(),
            Some(DropRequest::MoveDown) => {
                self.stats.score_move_down();
                self.descend();
            }
            None => {
                self.descend();
            }
        }
    }

    /// Executes one step of the current autoplay plan: rotations first,
    /// then horizontal moves toward the target column. Returns `true` when
    /// no step remains (plan finished, blocked or absent).
    pub fn step_plan(&mut self) -> bool {
        // The plan survives a pause; it resumes with the stone.
        if !self.phase.is_running() {
            return true;
        }
        let Some(mut plan) = self.plan.take() else {
            return true;
        };
        let Some(stone) = self.current.as_mut() else {
            return true;
        };
        if plan.rotations > 0 {
            // A blocked rotation still consumes the step, like a scripted
            // key press that bounced.
            plan.rotations -= 1;
            let _ = stone.try_move(&mut self.board, StoneMove::RotateLeft);
            self.plan = Some(plan);
            return false;
        }
        let dx = plan.target_x - stone.position().x;
        if dx == 0 {
            return true;
        }
        let direction = if dx > 0 {
            StoneMove::MoveRight
        } else {
            StoneMove::MoveLeft
        };
        if stone.try_move(&mut self.board, direction).is_err() {
            return true;
        }
        self.plan = Some(plan);
        false
    }

    /// Moves the stone one row down, or commits it when blocked. Returns
    /// whether the stone moved.
    fn descend(&mut self) -> bool {
        let Some(stone) = self.current.as_mut() else {
            return false;
        };
        if stone.try_move(&mut self.board, StoneMove::MoveDown).is_ok() {
            return true;
        }
        // Contact: the stone's cells stay on the board as settled content.
        self.current = None;
        self.stats.commit_stone();
        let cleared = self.board.clear_full_rows();
        self.stats.add_lines(u32::try_from(cleared).expect("cleared row count fits in u32"));
        self.spawn_next();
        false
    }

    fn fall_down(&mut self) {
        while self.descend() {
            self.stats.score_fall_row();
        }
    }

    fn spawn_anchor(&self) -> HexPos {
        let x = self.config.board_width.saturating_sub(5) / 2;
        HexPos::new(i32::try_from(x).unwrap_or(0), -1)
    }

    /// Promotes the preview stone to the falling stone. A spawn that does
    /// not fit ends the game; the preview keeps showing the stone that
    /// failed to enter.
    fn spawn_next(&mut self) {
        let Some(next) = self.next.as_ref() else {
            return;
        };
        let mut stone = next.clone();
        let anchor = self.spawn_anchor();
        stone.set_position(anchor);
        if !stone.may_place(&self.board, anchor) {
            self.current = None;
            self.phase = GamePhase::GameOver;
            return;
        }
        if let Some(old) = self.next.take() {
            old.place(&mut self.preview, false);
        }
        stone.place(&mut self.board, true);
        self.current = Some(stone);
        self.refill_next();
        if self.demo {
            self.plan_current();
        }
    }

    fn refill_next(&mut self) {
        let mut next = self.generator.next_stone();
        next.set_position(HexPos::new(0, 0));
        next.place(&mut self.preview, true);
        self.next = Some(next);
    }

    /// Asks the planner for a placement with the falling stone erased, so
    /// the search sees only walls and settled content.
    fn plan_current(&mut self) {
        let Some(planner) = self.planner.as_ref() else {
            return;
        };
        let Some(stone) = self.current.as_ref() else {
            return;
        };
        stone.place(&mut self.board, false);
        self.plan = planner.best_move(&self.board, stone);
        stone.place(&mut self.board, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cell;

    fn running_game(severity: Severity, start_level: u32) -> Game {
        let mut game = Game::new(GameConfig::default());
        game.new_game(NewGameOptions::standard(severity, start_level).with_seed(11));
        game
    }

    #[test]
    fn new_game_spawns_at_centered_anchor() {
        let game = running_game(Severity::Medium, 1);
        assert!(game.phase().is_running());
        let stone = game.current.as_ref().unwrap();
        assert_eq!(stone.position(), HexPos::new(5, -1));
        // The stone is drawn onto the top rows and the preview shows the
        // next one.
        assert!((0..2).any(|y| (5..10).any(|x| {
            matches!(game.board().cell(HexPos::new(x, y)), Cell::Stone(_))
        })));
        assert!((0..6).any(|y| (0..6).any(|x| {
            matches!(game.preview().cell(HexPos::new(x, y)), Cell::Stone(_))
        })));
    }

    #[test]
    fn plain_tick_descends_without_scoring() {
        let mut game = running_game(Severity::Medium, 1);
        let y0 = game.current.as_ref().unwrap().position().y;
        game.tick();
        assert_eq!(game.current.as_ref().unwrap().position().y, y0 + 1);
        assert_eq!(game.stats().score(), 0);
    }

    #[test]
    fn first_commit_scores_stone_bonus_only() {
        let mut game = running_game(Severity::Beginner, 1);
        for _ in 0..200 {
            if game.stats().stones() == 1 {
                break;
            }
            game.tick();
        }
        assert_eq!(game.stats().stones(), 1);
        // No manual drops, no lines: only the commit bonus at level 1.
        assert_eq!(game.stats().score(), 10);
        assert_eq!(game.stats().lines(), 0);
        assert!(game.current.is_some(), "next stone spawned");
    }

    #[test]
    fn move_down_request_scores_and_descends_once() {
        let mut game = running_game(Severity::Medium, 3);
        let y0 = game.current.as_ref().unwrap().position().y;
        game.request(DropRequest::MoveDown);
        game.tick();
        assert_eq!(game.current.as_ref().unwrap().position().y, y0 + 1);
        assert_eq!(game.stats().score(), 2 * 3);
        // The request was consumed.
        assert_eq!(game.pending, None);
    }

    #[test]
    fn fall_down_commits_in_one_tick() {
        let mut game = running_game(Severity::Medium, 1);
        game.request(DropRequest::FallDown);
        game.tick();
        assert_eq!(game.stats().stones(), 1);
        // Commit bonus plus two points per fallen row at level 1.
        let score = game.stats().score();
        assert!(score > 2 * 10 && (score - 2 * 10) % 4 == 0, "score {score}");
    }

    #[test]
    fn move_down_never_overwrites_fall_down() {
        let mut game = running_game(Severity::Medium, 1);
        game.request(DropRequest::MoveDown);
        game.request(DropRequest::MoveDown);
        assert_eq!(game.pending, Some(DropRequest::MoveDown));
        game.request(DropRequest::FallDown);
        assert_eq!(game.pending, Some(DropRequest::FallDown));
        game.request(DropRequest::MoveDown);
        assert_eq!(game.pending, Some(DropRequest::FallDown));
    }

    #[test]
    fn paused_tick_is_a_no_op() {
        let mut game = running_game(Severity::Medium, 1);
        game.toggle_pause();
        assert!(game.phase().is_paused());
        let board = game.board().clone();
        let y0 = game.current.as_ref().unwrap().position().y;
        game.tick();
        assert_eq!(game.board(), &board);

        game.toggle_pause();
        assert!(game.phase().is_running());
        game.tick();
        assert_eq!(game.current.as_ref().unwrap().position().y, y0 + 1);
    }

    #[test]
    fn moves_are_rejected_outside_running_phase() {
        let mut game = Game::new(GameConfig::default());
        assert_eq!(game.move_stone(StoneMove::MoveLeft), Err(StoneCollision));
        game.new_game(NewGameOptions::standard(Severity::Medium, 1).with_seed(3));
        game.toggle_pause();
        assert_eq!(game.move_stone(StoneMove::MoveLeft), Err(StoneCollision));
    }

    #[test]
    fn stacking_stones_eventually_tops_out() {
        let mut game = running_game(Severity::Medium, 1);
        for _ in 0..600 {
            if game.phase().is_game_over() {
                break;
            }
            game.request(DropRequest::FallDown);
            game.tick();
        }
        assert!(game.phase().is_game_over());
        assert!(game.current.is_none());
        // The settled content that caused the top-out is still visible.
        assert!((0..15).any(|x| matches!(game.board().cell(HexPos::new(x, 2)), Cell::Stone(_))));

        // Only an explicit new game leaves the game-over phase.
        game.tick();
        assert!(game.phase().is_game_over());
        game.new_game(NewGameOptions::standard(Severity::Medium, 1).with_seed(5));
        assert!(game.phase().is_running());
        assert_eq!(game.stats().stones(), 0);
        assert_eq!(game.stats().score(), 0);
    }

    #[test]
    fn drop_interval_is_clamped_and_monotone() {
        assert_eq!(drop_interval(1), Duration::from_millis(800));
        assert_eq!(drop_interval(7), Duration::from_millis(125));
        let mut previous = drop_interval(1);
        for level in 2..=30 {
            let interval = drop_interval(level);
            assert!(interval <= previous);
            assert!(interval >= MIN_DROP_INTERVAL);
            previous = interval;
        }
    }

    #[derive(Debug)]
    struct FixedPlanner(StonePlan);

    impl BestMovePlanner for FixedPlanner {
        fn best_move(&self, _board: &HexBoard, _stone: &Stone) -> Option<StonePlan> {
            Some(self.0)
        }
    }

    #[test]
    fn demo_game_executes_plan_steps() {
        let plan = StonePlan {
            target_x: 2,
            rotations: 0,
        };
        let mut game = Game::new(GameConfig::default()).with_planner(Box::new(FixedPlanner(plan)));
        game.new_game(NewGameOptions::demo().with_seed(11));
        assert!(game.is_demo());
        assert_eq!(game.stats().severity(), Severity::Medium);
        assert_eq!(game.stats().level(), DEMO_START_LEVEL);
        assert_eq!(game.plan, Some(plan));

        let mut steps = 0;
        while !game.step_plan() {
            steps += 1;
            assert!(steps < 20, "plan must terminate");
        }
        assert_eq!(game.current.as_ref().unwrap().position().x, 2);
        assert_eq!(game.plan, None);
    }

    #[test]
    fn pausing_keeps_the_pending_plan() {
        let plan = StonePlan {
            target_x: 2,
            rotations: 0,
        };
        let mut game = Game::new(GameConfig::default()).with_planner(Box::new(FixedPlanner(plan)));
        game.new_game(NewGameOptions::demo().with_seed(11));

        game.toggle_pause();
        assert!(game.step_plan());
        assert_eq!(game.plan, Some(plan));

        game.toggle_pause();
        assert!(!game.step_plan());
    }

    #[test]
    fn plan_with_rotations_spends_them_first() {
        let plan = StonePlan {
            target_x: 5,
            rotations: 2,
        };
        let mut game = Game::new(GameConfig::default()).with_planner(Box::new(FixedPlanner(plan)));
        game.new_game(NewGameOptions::demo().with_seed(11));

        assert!(!game.step_plan());
        assert!(!game.step_plan());
        // Anchor already at the target column: the next step finishes.
        assert!(game.step_plan());
        assert_eq!(game.plan, None);
    }
}
