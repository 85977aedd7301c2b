//! Error types for the series layer.

use gridduel_match::MatchError;
use gridduel_protocol::SeriesId;

/// Errors that can occur during series operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    /// A final winner was declared; no further matches start.
    #[error("series closed")]
    Closed(SeriesId),

    /// A move arrived before any match was started.
    #[error("series {0} has no current match")]
    NoCurrentMatch(SeriesId),

    /// The requested board size is outside the configured limits.
    #[error("board size {size} is outside [{min}, {max}]")]
    InvalidBoardSize { size: usize, min: usize, max: usize },

    /// The match itself refused to be created.
    #[error(transparent)]
    Match(#[from] MatchError),
}
