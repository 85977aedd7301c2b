//! Win streaks over a series' match history.
//!
//! A streak is a maximal run of consecutive history entries won by the
//! same player. A draw (no winner) or a loss ends the run.

use gridduel_protocol::PlayerId;
use serde::Serialize;

use crate::MatchSummary;

/// A run of consecutive wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub player: PlayerId,
    pub len: usize,
}

/// The longest run of consecutive wins by `player`. Zero if none.
pub fn longest_streak_of(history: &[MatchSummary], player: PlayerId) -> usize {
    let mut best = 0;
    let mut run = 0;
    for entry in history {
        if entry.winner == Some(player) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

/// The longest run of consecutive wins by anyone.
///
/// Ties go to the run that started first. `None` if nobody has won yet.
pub fn longest_run(history: &[MatchSummary]) -> Option<Streak> {
    let mut best: Option<Streak> = None;
    let mut current: Option<Streak> = None;

    for entry in history {
        current = match (entry.winner, current) {
            (Some(w), Some(s)) if s.player == w => Some(Streak { len: s.len + 1, ..s }),
            (Some(w), _) => Some(Streak { player: w, len: 1 }),
            (None, _) => None,
        };
        if let Some(run) = current {
            // Strictly greater, so an earlier run of equal length is kept.
            if best.is_none_or(|b| run.len > b.len) {
                best = Some(run);
            }
        }
    }
    best
}
