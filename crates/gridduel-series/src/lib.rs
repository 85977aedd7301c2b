//! Series orchestration for gridduel.
//!
//! A [`Series`] is the run of matches between two fixed players. It owns
//! the current [`Match`](gridduel_match::Match), keeps an append-only
//! history of finished matches, and closes itself for good once a player
//! reaches the total-wins or win-streak threshold.
//!
//! # Key types
//!
//! - [`Series`]: the orchestrator
//! - [`SeriesConfig`]: thresholds and board size limits
//! - [`SeriesVerdict`]: why a series closed
//! - [`MoveOutcome`] / [`Forfeit`]: what a move or an expired deadline did

mod config;
mod error;
mod series;
mod streak;

pub use config::SeriesConfig;
pub use error::SeriesError;
pub use series::{Forfeit, MatchSummary, MoveOutcome, Series, SeriesSnapshot, SeriesVerdict};
pub use streak::{Streak, longest_run, longest_streak_of};
