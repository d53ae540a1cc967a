use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use hextris_engine::engine::{DropRequest, GameSnapshot, GameWorker, NewGameOptions};
use hextris_engine::core::StoneMove;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Flex, Layout},
    text::{Line, Text},
    widgets::Block,
};

use crate::{
    config_file::KeyBindings,
    high_score::HighScoreFile,
    ui::widgets::{BoardDisplay, NameEntryDisplay, StatsDisplay, phase_border, style},
};

const POLL_INTERVAL: Duration = Duration::from_millis(33);
const MAX_NAME_LEN: usize = 16;

#[derive(Debug)]
enum AppMode {
    Playing,
    EnteringName { name: String, lines: u32 },
}

/// Terminal front end: renders snapshots of the shared game state and
/// forwards key presses to the worker handle. The drop loop itself runs
/// in the worker thread; this loop only polls input and redraws.
#[derive(Debug)]
pub struct GameApp {
    worker: GameWorker,
    keys: KeyBindings,
    scores: HighScoreFile,
    new_game: NewGameOptions,
    mode: AppMode,
    score_recorded: bool,
    exiting: bool,
}

impl GameApp {
    #[must_use]
    pub fn new(
        worker: GameWorker,
        keys: KeyBindings,
        scores: HighScoreFile,
        new_game: NewGameOptions,
    ) -> Self {
        Self {
            worker,
            keys,
            scores,
            new_game,
            mode: AppMode::Playing,
            score_recorded: false,
            exiting: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.exiting {
            let snapshot = self.worker.snapshot();
            self.check_game_over(&snapshot)?;
            terminal.draw(|frame| self.draw(frame, &snapshot))?;
            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key, &snapshot)?;
                }
            }
        }
        Ok(())
    }

    /// Opens the name prompt once per game when the result enters the
    /// ranking. Demo results are never recorded.
    fn check_game_over(&mut self, snapshot: &GameSnapshot) -> anyhow::Result<()> {
        if !snapshot.phase.is_game_over() || self.score_recorded || snapshot.demo {
            return Ok(());
        }
        self.score_recorded = true;
        let lines = snapshot.stats.lines();
        if self.scores.load()?.qualifies(lines) {
            self.mode = AppMode::EnteringName {
                name: String::new(),
                lines,
            };
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, snapshot: &GameSnapshot) -> anyhow::Result<()> {
        // Windows terminals also deliver release and repeat events; acting
        // on those would double every keypress.
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        match &mut self.mode {
            AppMode::EnteringName { name, lines } => {
                match key.code {
                    KeyCode::Char(c) if name.chars().count() < MAX_NAME_LEN => name.push(c),
                    KeyCode::Backspace => {
                        name.pop();
                    }
                    KeyCode::Enter => {
                        let player = if name.is_empty() {
                            "anonymous".to_string()
                        } else {
                            name.clone()
                        };
                        let mut table = self.scores.load()?;
                        table.add(player, *lines);
                        self.scores.save(&table)?;
                        self.mode = AppMode::Playing;
                    }
                    KeyCode::Esc => self.mode = AppMode::Playing,
                    _ => {}
                }
                return Ok(());
            }
            AppMode::Playing => {}
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exiting = true,
            KeyCode::Char('p') => self.worker.toggle_pause(),
            KeyCode::Char('n') => {
                self.score_recorded = false;
                self.worker.new_game(self.new_game);
            }
            // Stone control is the player's only in demo-less games.
            code if !snapshot.demo => {
                if code == self.keys.move_left {
                    let _ = self.worker.move_stone(StoneMove::MoveLeft);
                } else if code == self.keys.move_right {
                    let _ = self.worker.move_stone(StoneMove::MoveRight);
                } else if code == self.keys.rotate_left {
                    let _ = self.worker.move_stone(StoneMove::RotateLeft);
                } else if code == self.keys.rotate_right {
                    let _ = self.worker.move_stone(StoneMove::RotateRight);
                } else if code == self.keys.move_down {
                    self.worker.request(DropRequest::MoveDown);
                } else if code == self.keys.fall_down {
                    self.worker.request(DropRequest::FallDown);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>, snapshot: &GameSnapshot) {
        let border = phase_border(snapshot.phase);
        let board = BoardDisplay::new(&snapshot.board)
            .block(Block::bordered().border_style(border));
        let preview = BoardDisplay::new(&snapshot.preview).block(
            Block::bordered()
                .title(Line::from("NEXT").centered())
                .border_style(border),
        );
        let stats = StatsDisplay::new(&snapshot.stats, snapshot.phase, snapshot.demo).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .border_style(border),
        );

        let help = Text::from(
            "← → (Move) | ↑ r (Rotate) | ↓ (Drop) | Space (Fall) | P (Pause) | N (New) | Q (Quit)",
        )
        .style(style::HELP)
        .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let [board_area, side_area] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(preview.width().max(16)),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [preview_area, stats_area] = Layout::vertical([
            Constraint::Length(preview.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(side_area);

        frame.render_widget(&board, board_area);
        frame.render_widget(&preview, preview_area);
        frame.render_widget(stats, stats_area);
        frame.render_widget(help, help_area);

        if let AppMode::EnteringName { name, .. } = &self.mode {
            frame.render_widget(NameEntryDisplay::new(name), frame.area());
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use hextris_engine::{
        core::Severity,
        engine::{Game, GameConfig},
    };

    use super::*;

    fn test_app() -> GameApp {
        let worker = GameWorker::spawn(Game::new(GameConfig::default()));
        let scores = HighScoreFile::with_path(std::env::temp_dir().join(format!(
            "hextris-app-test-{}/highscores.json",
            std::process::id()
        )));
        GameApp::new(
            worker,
            KeyBindings::default(),
            scores,
            NewGameOptions::standard(Severity::Medium, 1),
        )
    }

    #[test]
    fn only_key_presses_are_dispatched() {
        let mut app = test_app();
        let snapshot = app.worker.snapshot();
        for kind in [KeyEventKind::Release, KeyEventKind::Repeat] {
            let event = KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, kind);
            app.handle_key(event, &snapshot).unwrap();
            assert!(!app.exiting);
        }
        let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        app.handle_key(press, &snapshot).unwrap();
        assert!(app.exiting);
    }

    #[test]
    fn released_keys_do_not_type_into_the_name_prompt() {
        let mut app = test_app();
        app.mode = AppMode::EnteringName {
            name: String::new(),
            lines: 3,
        };
        let snapshot = app.worker.snapshot();
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Release);
        app.handle_key(release, &snapshot).unwrap();
        let AppMode::EnteringName { name, .. } = &app.mode else {
            panic!("left name entry");
        };
        assert!(name.is_empty());
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let mut app = test_app();
        app.mode = AppMode::EnteringName {
            name: String::new(),
            lines: 3,
        };
        let snapshot = app.worker.snapshot();
        // Two-byte characters: a byte-based cap would stop at half the
        // advertised length.
        for _ in 0..MAX_NAME_LEN + 2 {
            let press = KeyEvent::new(KeyCode::Char('é'), KeyModifiers::NONE);
            app.handle_key(press, &snapshot).unwrap();
        }
        let AppMode::EnteringName { name, .. } = &app.mode else {
            panic!("left name entry");
        };
        assert_eq!(name.chars().count(), MAX_NAME_LEN);
    }
}
