use std::time::Duration;

use crate::core::line_clear_score;

/// Points needed per level.
const POINTS_PER_LEVEL: u32 = 100;
/// Gravity interval at level 1.
const BASE_DROP_INTERVAL: Duration = Duration::from_millis(1000);
/// Gravity interval reduction per level.
const DROP_INTERVAL_STEP: Duration = Duration::from_millis(100);
/// Fastest level-derived gravity interval.
const MIN_DROP_INTERVAL: Duration = Duration::from_millis(100);

/// Game statistics tracking score, rows cleared, and piece count.
///
/// Score comes from line clears and orb effects. It never goes below zero:
/// deductions saturate. Level and gravity speed are derived from the score.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use orbtris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// assert_eq!(stats.complete_piece_drop(4), 80);
/// stats.add_points(100);
///
/// assert_eq!(stats.score(), 180);
/// assert_eq!(stats.level(), 2);
/// assert_eq!(stats.level_drop_interval(), Duration::from_millis(900));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GameStats {
    score: u32,
    completed_pieces: usize,
    total_cleared_rows: usize,
    row_cleared_counter: [usize; 5],
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_rows: 0,
            row_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Returns the current level, starting at 1 and rising every 100 points.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.score / POINTS_PER_LEVEL + 1
    }

    /// Gravity interval for the current level.
    ///
    /// 1000 ms at level 1, 100 ms faster per level, never below 100 ms.
    #[must_use]
    pub fn level_drop_interval(&self) -> Duration {
        BASE_DROP_INTERVAL
            .saturating_sub(DROP_INTERVAL_STEP * (self.level() - 1))
            .max(MIN_DROP_INTERVAL)
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    /// Returns a histogram of lock events by number of rows cleared (0-4).
    #[must_use]
    pub const fn row_cleared_counter(&self) -> &[usize; 5] {
        &self.row_cleared_counter
    }

    pub fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Deducts points, stopping at zero.
    pub fn deduct_points(&mut self, points: u32) {
        self.score = self.score.saturating_sub(points);
    }

    /// Updates statistics after a piece locks and returns the points awarded.
    pub fn complete_piece_drop(&mut self, cleared_rows: usize) -> u32 {
        self.completed_pieces += 1;
        self.total_cleared_rows += cleared_rows;
        if let Some(counter) = self.row_cleared_counter.get_mut(cleared_rows) {
            *counter += 1;
        }
        let points = line_clear_score(cleared_rows);
        self.add_points(points);
        points
    }
}
