//! Series configuration.

use gridduel_match::MIN_BOARD_SIZE;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Thresholds that end a series and limits on match board size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Cumulative match wins that close the series.
    pub total_wins_to_win: u32,

    /// Consecutive match wins that close the series.
    pub streak_to_win: u32,

    /// Smallest board a match may use. Never below 3.
    pub min_board_size: usize,

    /// Largest board a match may use.
    pub max_board_size: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            total_wins_to_win: 10,
            streak_to_win: 3,
            min_board_size: MIN_BOARD_SIZE,
            max_board_size: 64,
        }
    }
}

impl SeriesConfig {
    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Rules:
    /// - both thresholds are at least 1;
    /// - `min_board_size` is at least [`MIN_BOARD_SIZE`];
    /// - `max_board_size` is at least `min_board_size`.
    pub fn validated(mut self) -> Self {
        if self.total_wins_to_win == 0 {
            warn!("total_wins_to_win is 0: clamping to 1");
            self.total_wins_to_win = 1;
        }
        if self.streak_to_win == 0 {
            warn!("streak_to_win is 0: clamping to 1");
            self.streak_to_win = 1;
        }
        if self.min_board_size < MIN_BOARD_SIZE {
            warn!(
                min = self.min_board_size,
                floor = MIN_BOARD_SIZE,
                "min_board_size below rules minimum: clamping"
            );
            self.min_board_size = MIN_BOARD_SIZE;
        }
        if self.max_board_size < self.min_board_size {
            warn!(
                max = self.max_board_size,
                min = self.min_board_size,
                "max_board_size below min_board_size: clamping"
            );
            self.max_board_size = self.min_board_size;
        }
        self
    }

    /// Returns `true` if `size` is an allowed board size.
    pub fn allows_board_size(&self, size: usize) -> bool {
        (self.min_board_size..=self.max_board_size).contains(&size)
    }
}
