//! The series orchestrator.
//!
//! ```text
//! Open ──(record outcome reaching a threshold)──→ Closed
//! ```
//!
//! While open, a series starts matches on request and records the outcome
//! of each one. Once closed it never starts another match.

use std::sync::atomic::{AtomicU64, Ordering};

use gridduel_match::{Match, MatchSnapshot};
use gridduel_protocol::{
    Coord, MatchId, MoveResult, MoveStamp, PairingId, PlayerId, SeriesId,
};
use serde::Serialize;

use crate::streak::{Streak, longest_run, longest_streak_of};
use crate::{SeriesConfig, SeriesError};

/// Counter for generating unique series IDs.
static NEXT_SERIES_ID: AtomicU64 = AtomicU64::new(1);

/// One finished match in the series history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    /// `None` for a draw.
    pub winner: Option<PlayerId>,
}

/// Why a series closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesVerdict {
    /// The winner reached the cumulative win threshold.
    TotalWins { winner: PlayerId },
    /// The winner reached the consecutive win threshold.
    Streak { winner: PlayerId },
}

impl SeriesVerdict {
    pub fn winner(&self) -> PlayerId {
        match self {
            Self::TotalWins { winner } | Self::Streak { winner } => *winner,
        }
    }
}

/// What a move submitted to the series did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The match the move was played in.
    pub match_id: MatchId,
    /// The match's answer, accepted or not.
    pub result: MoveResult,
    /// The move to arm a deadline for, if it was accepted.
    pub armed: Option<MoveStamp>,
    /// Set when this move closed the series.
    pub verdict: Option<SeriesVerdict>,
}

/// What an expired, still-valid move deadline did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Forfeit {
    pub match_id: MatchId,
    pub winner: PlayerId,
    /// Set when the forfeit closed the series.
    pub verdict: Option<SeriesVerdict>,
}

/// The run of matches between two fixed players.
#[derive(Debug)]
pub struct Series {
    id: SeriesId,
    pairing: PairingId,
    players: [PlayerId; 2],
    /// Win counts, indexed like `players`.
    wins: [u32; 2],
    history: Vec<MatchSummary>,
    current: Option<Match>,
    can_start_new_match: bool,
    final_winner: Option<PlayerId>,
    config: SeriesConfig,
}

impl Series {
    /// Creates an open series with no matches played.
    ///
    /// `first` plays `X` and opens every match of the series.
    pub fn new(
        first: PlayerId,
        second: PlayerId,
        pairing: PairingId,
        config: SeriesConfig,
    ) -> Self {
        let id = SeriesId(NEXT_SERIES_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            id,
            pairing,
            players: [first, second],
            wins: [0, 0],
            history: Vec::new(),
            current: None,
            can_start_new_match: true,
            final_winner: None,
            config: config.validated(),
        }
    }

    /// Starts a fresh match with the same two players and makes it current.
    ///
    /// Any unfinished current match is abandoned; deadlines armed against
    /// it go stale because they name its match id.
    pub fn start_new_match(&mut self, board_size: usize) -> Result<&Match, SeriesError> {
        if !self.can_start_new_match {
            return Err(SeriesError::Closed(self.id));
        }
        if !self.config.allows_board_size(board_size) {
            return Err(SeriesError::InvalidBoardSize {
                size: board_size,
                min: self.config.min_board_size,
                max: self.config.max_board_size,
            });
        }

        let next = Match::new(self.players[0], self.players[1], board_size)?;
        if let Some(prev) = &self.current {
            if !prev.is_ended() {
                tracing::debug!(
                    series_id = %self.id,
                    match_id = %prev.id(),
                    "abandoning unfinished match"
                );
            }
        }
        tracing::info!(
            series_id = %self.id,
            match_id = %next.id(),
            board_size,
            "match started"
        );
        Ok(self.current.insert(next))
    }

    /// Forwards a move to the current match and records its outcome if the
    /// move ended it.
    pub fn submit_move(
        &mut self,
        actor: PlayerId,
        coord: Coord,
    ) -> Result<MoveOutcome, SeriesError> {
        let current = self
            .current
            .as_mut()
            .ok_or(SeriesError::NoCurrentMatch(self.id))?;

        let match_id = current.id();
        let result = current.submit_move(actor, coord);
        let armed = result.is_accepted().then(|| current.last_move()).flatten();

        let verdict = if result.is_accepted() && result.ended {
            match result.winner {
                Some(winner) => self.record_outcome(winner),
                None => {
                    self.record_draw();
                    None
                }
            }
        } else {
            None
        };

        Ok(MoveOutcome {
            match_id,
            result,
            armed,
            verdict,
        })
    }

    /// Decides an expired move deadline for `match_id`.
    ///
    /// Returns `None` when the deadline is stale: a newer match is current,
    /// the opponent already answered, or the match is over.
    pub fn expire(&mut self, match_id: MatchId, armed: MoveStamp) -> Option<Forfeit> {
        let current = self.current.as_mut().filter(|m| m.id() == match_id)?;
        let winner = current.expire(armed)?;
        let verdict = self.record_outcome(winner);
        Some(Forfeit {
            match_id,
            winner,
            verdict,
        })
    }

    /// Records a decisive result for the current match.
    ///
    /// Increments the winner's count, appends to the history, then checks
    /// the total-wins threshold before the streak threshold. Returns the
    /// verdict if the series just closed.
    pub fn record_outcome(&mut self, winner: PlayerId) -> Option<SeriesVerdict> {
        let match_id = self.unrecorded_match()?;
        let Some(seat) = self.players.iter().position(|p| *p == winner) else {
            tracing::error!(
                series_id = %self.id,
                %winner,
                "fail to add win count: player not in series"
            );
            return None;
        };

        self.wins[seat] += 1;
        self.history.push(MatchSummary {
            match_id,
            winner: Some(winner),
        });
        tracing::info!(
            series_id = %self.id,
            %match_id,
            %winner,
            wins = ?self.wins,
            "match outcome recorded"
        );

        let verdict = if self.wins[seat] >= self.config.total_wins_to_win {
            SeriesVerdict::TotalWins { winner }
        } else if longest_streak_of(&self.history, winner) >= self.config.streak_to_win as usize {
            SeriesVerdict::Streak { winner }
        } else {
            return None;
        };

        self.close(verdict);
        Some(verdict)
    }

    /// Records a draw for the current match. No win count changes; the
    /// entry breaks any running streak.
    pub fn record_draw(&mut self) {
        let Some(match_id) = self.unrecorded_match() else {
            return;
        };
        self.history.push(MatchSummary {
            match_id,
            winner: None,
        });
        tracing::info!(series_id = %self.id, %match_id, "draw recorded");
    }

    /// The current match id, unless there is none or it was already
    /// recorded. Both cases are logged and ignored.
    fn unrecorded_match(&self) -> Option<MatchId> {
        let Some(current) = &self.current else {
            tracing::warn!(series_id = %self.id, "no current match to record");
            return None;
        };
        let match_id = current.id();
        if self.history.last().is_some_and(|s| s.match_id == match_id) {
            tracing::warn!(series_id = %self.id, %match_id, "match outcome already recorded");
            return None;
        }
        Some(match_id)
    }

    fn close(&mut self, verdict: SeriesVerdict) {
        self.final_winner = Some(verdict.winner());
        self.can_start_new_match = false;
        tracing::info!(series_id = %self.id, ?verdict, "series closed");
    }

    pub fn id(&self) -> SeriesId {
        self.id
    }

    pub fn pairing(&self) -> PairingId {
        self.pairing
    }

    pub fn players(&self) -> [PlayerId; 2] {
        self.players
    }

    /// Cumulative wins of `player`, or 0 if not in the series.
    pub fn wins_of(&self, player: PlayerId) -> u32 {
        self.players
            .iter()
            .position(|p| *p == player)
            .map_or(0, |seat| self.wins[seat])
    }

    pub fn history(&self) -> &[MatchSummary] {
        &self.history
    }

    pub fn current_match(&self) -> Option<&Match> {
        self.current.as_ref()
    }

    pub fn can_start_new_match(&self) -> bool {
        self.can_start_new_match
    }

    pub fn is_closed(&self) -> bool {
        self.final_winner.is_some()
    }

    pub fn final_winner(&self) -> Option<PlayerId> {
        self.final_winner
    }

    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    pub fn snapshot(&self) -> SeriesSnapshot {
        SeriesSnapshot {
            id: self.id,
            pairing: self.pairing,
            players: self.players,
            wins: self.wins,
            history: self.history.clone(),
            longest_streak: longest_run(&self.history),
            can_start_new_match: self.can_start_new_match,
            final_winner: self.final_winner,
            current_match: self.current.as_ref().map(Match::snapshot),
        }
    }
}

/// A read-only copy of a series, safe to hand across task boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesSnapshot {
    pub id: SeriesId,
    pub pairing: PairingId,
    pub players: [PlayerId; 2],
    pub wins: [u32; 2],
    pub history: Vec<MatchSummary>,
    /// The longest run of consecutive wins so far. `None` before any win.
    pub longest_streak: Option<Streak>,
    pub can_start_new_match: bool,
    pub final_winner: Option<PlayerId>,
    pub current_match: Option<MatchSnapshot>,
}
