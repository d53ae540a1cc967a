use crate::core::Severity;

/// Highest reachable level; the level also stops rising here.
pub const MAX_LEVEL: u32 = 10;

/// Counters and score of one game.
///
/// All score formulas share the severity multiplier (1..=3); the level
/// factor uses the level at the time the points are earned, so the stone
/// committed when a level-up triggers still scores at the old level while
/// the lines it clears score at the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStats {
    severity: Severity,
    level: u32,
    stones: u32,
    lines: u32,
    score: u32,
}

impl GameStats {
    #[must_use]
    pub fn new(severity: Severity, start_level: u32) -> Self {
        Self {
            severity,
            level: start_level.clamp(1, MAX_LEVEL),
            stones: 0,
            lines: 0,
            score: 0,
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn stones(&self) -> u32 {
        self.stones
    }

    #[must_use]
    pub fn lines(&self) -> u32 {
        self.lines
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// A manually requested single-row descent.
    pub(crate) fn score_move_down(&mut self) {
        self.score += self.severity.multiplier() * self.level;
    }

    /// One row of an uninterrupted fall to the bottom.
    pub(crate) fn score_fall_row(&mut self) {
        self.score += self.severity.multiplier() * 2 * self.level;
    }

    /// A stone merged into the settled content. Levels up after every
    /// 20·level stones until [`MAX_LEVEL`].
    pub(crate) fn commit_stone(&mut self) {
        self.score += self.severity.multiplier() * 10 * self.level;
        self.stones += 1;
        if self.stones > 20 * self.level && self.level < MAX_LEVEL {
            self.level += 1;
        }
    }

    /// `cleared` rows completed by one commit; quadratic line bonus.
    pub(crate) fn add_lines(&mut self, cleared: u32) {
        self.score += self.severity.multiplier() * 100 * self.level * cleared * cleared;
        self.lines += cleared;
    }
}
