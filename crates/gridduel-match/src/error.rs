//! Error types for the match layer.

/// Errors that can occur while setting up a match.
///
/// Move validation failures are not errors: they are reported as
/// [`MoveRejection`](gridduel_protocol::MoveRejection) values inside the
/// move result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The board would be smaller than 3×3.
    #[error("board size should be at least {min}x{min}, got {size}")]
    BoardTooSmall { size: usize, min: usize },

    /// The two seats were given the same player.
    #[error("a match needs two distinct players, got {0} twice")]
    SamePlayer(gridduel_protocol::PlayerId),
}
