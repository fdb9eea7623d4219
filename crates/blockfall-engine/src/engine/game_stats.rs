use serde::{Deserialize, Serialize};

/// Points awarded per cleared line.
pub const POINTS_PER_LINE: usize = 100;

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: usize = 10;

// Shapes are at most 8 rows tall, so no drop clears more than 8 lines.
const LINE_COUNTER_LEN: usize = 9;

/// Statistics of one game: score, lines cleared and shapes placed.
///
/// Scoring is flat: every cleared line is worth [`POINTS_PER_LINE`] points regardless of how
/// many lines one drop clears. The level starts at 1 and increases every
/// [`LINES_PER_LEVEL`] lines.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_shape_drop(4);
/// stats.complete_shape_drop(0);
///
/// assert_eq!(stats.score(), 400);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.completed_shapes(), 2);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameStats {
    score: usize,
    completed_shapes: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; LINE_COUNTER_LEN],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_shapes: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; LINE_COUNTER_LEN],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns `1 + lines / 10`.
    #[must_use]
    pub const fn level(&self) -> usize {
        1 + self.total_cleared_lines / LINES_PER_LEVEL
    }

    #[must_use]
    pub const fn completed_shapes(&self) -> usize {
        self.completed_shapes
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns how many drops cleared exactly `n` lines, indexed by `n`.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; LINE_COUNTER_LEN] {
        &self.line_cleared_counter
    }

    /// Records one locked shape that cleared `cleared_lines` lines.
    pub const fn complete_shape_drop(&mut self, cleared_lines: usize) {
        self.completed_shapes += 1;
        self.total_cleared_lines += cleared_lines;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        }
        self.score += cleared_lines * POINTS_PER_LINE;
    }

    /// Returns the end-of-game record handed to the score table.
    #[must_use]
    pub const fn summary(&self, agent_controlled: bool) -> GameSummary {
        GameSummary {
            score: self.score,
            lines_cleared: self.total_cleared_lines,
            level: self.level(),
            agent_controlled,
        }
    }
}

/// Final result of a game as recorded by a leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub score: usize,
    pub lines_cleared: usize,
    pub level: usize,
    pub agent_controlled: bool,
}
