//! Single-match rules engine for gridduel.
//!
//! A [`Match`] owns an N×N [`Board`] and the ordered move history of one
//! game between two players. It validates and applies moves, detects wins
//! and draws, and decides whether an expired move deadline still counts
//! as a forfeit.
//!
//! # Key types
//!
//! - [`Match`]: the state machine (`in progress → ended`)
//! - [`Board`] / [`Cell`]: the grid
//! - [`Line`]: which full-length line completed a win
//! - [`MatchSnapshot`]: a read-only copy for delivery to clients
//!
//! A match never learns which series it belongs to; the owner reacts to
//! the [`MoveResult`](gridduel_protocol::MoveResult) it returns.

mod board;
mod error;
mod game;
mod rules;

pub use board::{Board, Cell};
pub use error::MatchError;
pub use game::{HistoryEntry, Match, MatchSnapshot};
pub use rules::{Line, winning_line};

/// Smallest board the rules are defined for.
pub const MIN_BOARD_SIZE: usize = 3;
