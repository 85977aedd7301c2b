//! Move coordinates, move identity, and the result of a move attempt.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PlayerId;

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// A target cell. `x` is the row, `y` is the column; `(0, 0)` is top-left.
///
/// Signed on purpose: coordinates arrive from an untrusted caller, and a
/// negative value must be representable so it can be rejected with the
/// offending axis rather than wrapped around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Which coordinate axis a bounds rejection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

// ---------------------------------------------------------------------------
// MoveStamp
// ---------------------------------------------------------------------------

/// The identity of an accepted move: who placed a mark, and where.
///
/// Within one match a cell is written at most once, so `actor + coord`
/// names a move uniquely. Move timers capture a stamp and compare it with
/// the match's latest move when they fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveStamp {
    pub actor: PlayerId,
    pub coord: Coord,
}

// ---------------------------------------------------------------------------
// MoveRejection
// ---------------------------------------------------------------------------

/// Why a move was refused.
///
/// Rejections are ordinary values, not errors that abort anything: they
/// are collected into [`MoveResult::rejections`] and delivered to the
/// player. The `Display` text is the human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveRejection {
    /// The actor is neither of the match's two players.
    #[error("actor not in match")]
    NotInMatch { actor: PlayerId },

    /// The match has already been decided (win, draw, or forfeit).
    #[error("already ended")]
    AlreadyEnded,

    /// It is the other player's turn.
    #[error("wait for opponent")]
    WaitForOpponent,

    /// One coordinate lies outside `[0, size)`.
    #[error("{axis} out of bounds: {value} is not in [0, {size})")]
    OutOfBounds { axis: Axis, value: i32, size: usize },

    /// The target cell already holds a mark.
    #[error("cell {coord} is occupied")]
    CellOccupied { coord: Coord },
}

// ---------------------------------------------------------------------------
// MoveResult
// ---------------------------------------------------------------------------

/// The outcome of one move attempt.
///
/// Every attempt produces one of these, including rejected ones, so
/// callers always handle a single shape. `rejections` is empty exactly
/// when the move was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// Whether the match is over after this attempt.
    pub ended: bool,
    /// The match winner, if decided. `None` while in progress and on a draw.
    pub winner: Option<PlayerId>,
    /// Reasons the move was refused. Empty on success.
    pub rejections: Vec<MoveRejection>,
}

impl MoveResult {
    /// A move that was applied.
    pub fn accepted(ended: bool, winner: Option<PlayerId>) -> Self {
        Self {
            ended,
            winner,
            rejections: Vec::new(),
        }
    }

    /// A move that was refused, reporting the match's current status.
    pub fn rejected(
        ended: bool,
        winner: Option<PlayerId>,
        rejections: Vec<MoveRejection>,
    ) -> Self {
        Self {
            ended,
            winner,
            rejections,
        }
    }

    /// Returns `true` if the move was applied.
    pub fn is_accepted(&self) -> bool {
        self.rejections.is_empty()
    }

    /// Human-readable rejection reasons, in order.
    pub fn reasons(&self) -> Vec<String> {
        self.rejections.iter().map(ToString::to_string).collect()
    }
}
