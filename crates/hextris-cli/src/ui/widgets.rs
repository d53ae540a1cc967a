use hextris_engine::{
    core::{Cell as BoardCell, HexBoard, HexPos},
    engine::{GamePhase, GameStats},
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Widget},
};

pub mod style {
    use ratatui::style::{Color, Style};

    pub const EMPTY: Style = Style::new();
    pub const WALL: Style = Style::new().bg(Color::DarkGray);
    pub const RUNNING_BORDER: Style = Style::new().fg(Color::White);
    pub const PAUSED_BORDER: Style = Style::new().fg(Color::Yellow);
    pub const GAME_OVER_BORDER: Style = Style::new().fg(Color::Red);
    pub const HELP: Style = Style::new().fg(Color::DarkGray);
}

/// Terminal colors for the shape color ids (`>= 2`).
fn stone_style(id: u8) -> Style {
    const PALETTE: [Color; 13] = [
        Color::Cyan,
        Color::Yellow,
        Color::Green,
        Color::Red,
        Color::Magenta,
        Color::Blue,
        Color::LightRed,
        Color::LightGreen,
        Color::LightBlue,
        Color::LightMagenta,
        Color::LightCyan,
        Color::LightYellow,
        Color::Gray,
    ];
    let index = usize::from(id.saturating_sub(2)) % PALETTE.len();
    Style::new().bg(PALETTE[index])
}

/// Renders a hex board, one text row per board row and two columns per
/// cell. The half-row offset of odd columns cannot be drawn in character
/// cells, so the hex tiling is flattened; collision behavior is unaffected.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a HexBoard,
    block: Option<Block<'a>>,
}

impl<'a> BoardDisplay<'a> {
    #[must_use]
    pub fn new(board: &'a HexBoard) -> Self {
        Self { board, block: None }
    }

    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        u16::try_from(self.board.width() * 2 + 2).unwrap_or(u16::MAX)
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        u16::try_from(self.board.height() + 2).unwrap_or(u16::MAX)
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        for y in 0..self.board.height() {
            let Ok(row) = u16::try_from(y) else { break };
            let screen_y = inner.y + row;
            if screen_y >= inner.bottom() {
                break;
            }
            for x in 0..self.board.width() {
                let Ok(col) = u16::try_from(x * 2) else { break };
                let screen_x = inner.x + col;
                if screen_x + 1 >= inner.right() {
                    break;
                }
                let cell = self.board.cell(HexPos::new(
                    i32::try_from(x).unwrap_or(i32::MAX),
                    i32::try_from(y).unwrap_or(i32::MAX),
                ));
                let cell_style = match cell {
                    BoardCell::Empty => style::EMPTY,
                    BoardCell::Wall => style::WALL,
                    BoardCell::Stone(color) => stone_style(color.get()),
                };
                for dx in 0..2 {
                    if let Some(buf_cell) = buf.cell_mut((screen_x + dx, screen_y)) {
                        buf_cell.set_symbol(" ");
                        buf_cell.set_style(cell_style);
                    }
                }
            }
        }
    }
}

/// Level, counters and score, with the phase called out when the game is
/// not running.
#[derive(Debug)]
pub struct StatsDisplay<'a> {
    stats: &'a GameStats,
    phase: GamePhase,
    demo: bool,
    block: Option<Block<'a>>,
}

impl<'a> StatsDisplay<'a> {
    #[must_use]
    pub fn new(stats: &'a GameStats, phase: GamePhase, demo: bool) -> Self {
        Self {
            stats,
            phase,
            demo,
            block: None,
        }
    }

    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        8
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let phase_line = match self.phase {
            GamePhase::NotStarted => Line::from("press n to start"),
            GamePhase::Running if self.demo => Line::from("DEMO"),
            GamePhase::Running => Line::from(""),
            GamePhase::Paused => Line::from("PAUSED").style(style::PAUSED_BORDER),
            GamePhase::GameOver => Line::from("GAME OVER").style(style::GAME_OVER_BORDER),
        };
        let lines = [
            Line::from(format!("Level  {:>6}", self.stats.level())),
            Line::from(format!("Stones {:>6}", self.stats.stones())),
            Line::from(format!("Lines  {:>6}", self.stats.lines())),
            Line::from(format!("Score  {:>6}", self.stats.score())),
            Line::from(""),
            phase_line,
        ];
        for (i, line) in lines.into_iter().enumerate() {
            let Ok(offset) = u16::try_from(i) else { break };
            let y = inner.y + offset;
            if y >= inner.bottom() {
                break;
            }
            line.render(Rect::new(inner.x, y, inner.width, 1), buf);
        }
    }
}

/// Border style shared by the panels, keyed on the phase like the board
/// frame of the desktop original.
#[must_use]
pub fn phase_border(phase: GamePhase) -> Style {
    match phase {
        GamePhase::Paused => style::PAUSED_BORDER,
        GamePhase::GameOver => style::GAME_OVER_BORDER,
        GamePhase::NotStarted | GamePhase::Running => style::RUNNING_BORDER,
    }
}

/// Centered single-line input box for the high-score name prompt.
#[derive(Debug)]
pub struct NameEntryDisplay<'a> {
    name: &'a str,
}

impl<'a> NameEntryDisplay<'a> {
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }
}

impl Widget for NameEntryDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let width = area.width.min(34);
        let height = 3;
        let popup = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );
        let block = Block::bordered()
            .title(Line::from("NEW HIGH SCORE").centered())
            .border_style(style::GAME_OVER_BORDER)
            .style(Style::new().bg(Color::Black));
        let inner = block.inner(popup);
        ratatui::widgets::Clear.render(popup, buf);
        block.render(popup, buf);
        Line::from(format!("name: {}_", self.name)).render(inner, buf);
    }
}
