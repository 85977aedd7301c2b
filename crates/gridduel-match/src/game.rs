//! The match state machine.
//!
//! ```text
//! InProgress ──(winning move | filling move | expired deadline)──→ Ended
//! ```
//!
//! `ended` only ever goes from `false` to `true`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use gridduel_protocol::{
    Axis, Coord, MatchId, MoveRejection, MoveResult, MoveStamp, PlayerId,
};
use serde::Serialize;
use tokio::time::Instant;

use crate::board::write_rows;
use crate::rules::winning_line;
use crate::{Board, Cell, MIN_BOARD_SIZE, MatchError};

/// Counter for generating unique match IDs.
static NEXT_MATCH_ID: AtomicU64 = AtomicU64::new(1);

/// One accepted move.
///
/// `at` reads the Tokio clock, the same one move deadlines are set on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub actor: PlayerId,
    pub coord: Coord,
    pub at: Instant,
}

impl HistoryEntry {
    pub fn stamp(&self) -> MoveStamp {
        MoveStamp {
            actor: self.actor,
            coord: self.coord,
        }
    }
}

/// A single game between two players on an N×N board.
#[derive(Debug, Clone)]
pub struct Match {
    id: MatchId,
    /// `players[0]` plays `X` and moves first, `players[1]` plays `O`.
    players: [PlayerId; 2],
    board: Board,
    history: Vec<HistoryEntry>,
    ended: bool,
    winner: Option<PlayerId>,
}

impl Match {
    /// Creates a match with an empty board.
    pub fn new(
        first: PlayerId,
        second: PlayerId,
        board_size: usize,
    ) -> Result<Self, MatchError> {
        if board_size < MIN_BOARD_SIZE {
            return Err(MatchError::BoardTooSmall {
                size: board_size,
                min: MIN_BOARD_SIZE,
            });
        }
        if first == second {
            return Err(MatchError::SamePlayer(first));
        }

        let id = MatchId(NEXT_MATCH_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %first, %second, board_size, "match created");

        Ok(Self {
            id,
            players: [first, second],
            board: Board::new(board_size),
            history: Vec::with_capacity(board_size * board_size),
            ended: false,
            winner: None,
        })
    }

    /// Validates and applies a move.
    ///
    /// Validation runs in stages and stops at the first failing stage:
    /// membership, ended, turn order, bounds, occupancy. Only the bounds
    /// stage can report more than one rejection (one per bad axis).
    pub fn submit_move(&mut self, actor: PlayerId, coord: Coord) -> MoveResult {
        let Some(seat) = self.seat_of(actor) else {
            return self.reject(MoveRejection::NotInMatch { actor });
        };

        if self.ended {
            return self.reject(MoveRejection::AlreadyEnded);
        }

        let my_turn = match self.history.last() {
            Some(last) => last.actor != actor,
            // The first player opens.
            None => seat == 0,
        };
        if !my_turn {
            return self.reject(MoveRejection::WaitForOpponent);
        }

        let Some((row, col)) = self.board.index_of(coord) else {
            return self.reject_all(self.bounds_rejections(coord));
        };

        if !self.board.get(row, col).is_empty() {
            return self.reject(MoveRejection::CellOccupied { coord });
        }

        let mark = if seat == 0 { Cell::X } else { Cell::O };
        self.board.set(row, col, mark);
        self.history.push(HistoryEntry {
            actor,
            coord,
            at: Instant::now(),
        });

        if let Some((line, _)) = winning_line(&self.board) {
            self.ended = true;
            self.winner = Some(actor);
            tracing::info!(id = %self.id, winner = %actor, ?line, "match won");
        } else if self.board.is_full() {
            self.ended = true;
            tracing::info!(id = %self.id, "match drawn");
        }

        MoveResult::accepted(self.ended, self.winner)
    }

    /// Decides an expired move deadline.
    ///
    /// `armed` is the move the deadline was started for. If it is still the
    /// latest move and the match is still running, the opponent never
    /// answered: the match ends and `armed.actor` wins. Otherwise the
    /// deadline is stale and nothing changes.
    pub fn expire(&mut self, armed: MoveStamp) -> Option<PlayerId> {
        if self.ended {
            return None;
        }
        let latest = self.history.last()?.stamp();
        if latest != armed {
            return None;
        }

        self.ended = true;
        self.winner = Some(armed.actor);
        tracing::info!(id = %self.id, winner = %armed.actor, "match forfeited");
        Some(armed.actor)
    }

    fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| *p == player)
    }

    fn bounds_rejections(&self, coord: Coord) -> Vec<MoveRejection> {
        let size = self.board.size();
        [(Axis::X, coord.x), (Axis::Y, coord.y)]
            .into_iter()
            .filter(|(_, value)| usize::try_from(*value).map_or(true, |v| v >= size))
            .map(|(axis, value)| MoveRejection::OutOfBounds { axis, value, size })
            .collect()
    }

    fn reject(&self, rejection: MoveRejection) -> MoveResult {
        self.reject_all(vec![rejection])
    }

    fn reject_all(&self, rejections: Vec<MoveRejection>) -> MoveResult {
        tracing::debug!(id = %self.id, ?rejections, "move rejected");
        MoveResult::rejected(self.ended, self.winner, rejections)
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn players(&self) -> [PlayerId; 2] {
        self.players
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_size(&self) -> usize {
        self.board.size()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The latest accepted move, if any.
    pub fn last_move(&self) -> Option<MoveStamp> {
        self.history.last().map(HistoryEntry::stamp)
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// The winner. `None` while in progress and after a draw.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Returns `true` if the match ended with no winner.
    pub fn is_draw(&self) -> bool {
        self.ended && self.winner.is_none()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            id: self.id,
            players: self.players,
            board: self.board.rows(),
            moves: self.history.iter().map(HistoryEntry::stamp).collect(),
            ended: self.ended,
            winner: self.winner,
        }
    }
}

/// A read-only copy of a match, safe to hand across task boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSnapshot {
    pub id: MatchId,
    pub players: [PlayerId; 2],
    pub board: Vec<Vec<Cell>>,
    pub moves: Vec<MoveStamp>,
    pub ended: bool,
    pub winner: Option<PlayerId>,
}

/// Same layout as the [`Board`] it was taken from.
impl fmt::Display for MatchSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rows(f, self.board.iter().map(Vec::as_slice))
    }
}
