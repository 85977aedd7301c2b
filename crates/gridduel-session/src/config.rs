//! Session configuration.

use gridduel_series::SeriesConfig;
use gridduel_timer::TimerConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Everything a series actor needs to know besides its two players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Series thresholds and board size limits.
    pub series: SeriesConfig,

    /// Move deadline.
    pub timer: TimerConfig,

    /// Start the next match as soon as one ends without closing the series.
    /// When off, the caller drives every match start.
    pub auto_start_next_match: bool,

    /// Remove a series from the directory once it closes.
    pub evict_finished_series: bool,

    /// Bound of each series actor's command channel.
    pub command_channel_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            series: SeriesConfig::default(),
            timer: TimerConfig::default(),
            auto_start_next_match: false,
            evict_finished_series: true,
            command_channel_size: 64,
        }
    }
}

impl SessionConfig {
    /// Clamp out-of-range values, including the nested configs.
    pub fn validated(mut self) -> Self {
        self.series = self.series.validated();
        self.timer = self.timer.validated();
        if self.command_channel_size == 0 {
            warn!("command_channel_size is 0, clamping to 1");
            self.command_channel_size = 1;
        }
        self
    }
}
