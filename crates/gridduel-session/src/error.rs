//! Error types for the session layer.

use gridduel_protocol::{PairingId, PlayerId, SeriesId};
use gridduel_series::SeriesError;

/// Errors that can occur while creating, resolving or driving a series.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Both seats were given the same player.
    #[error("player {0} cannot play against themselves")]
    SamePlayer(PlayerId),

    /// The player registry doesn't know this player.
    #[error("player {0} is not known")]
    UnknownPlayer(PlayerId),

    /// The player already belongs to an active series.
    #[error("player {0} is already in series {1}")]
    PlayerBusy(PlayerId, SeriesId),

    /// The pairing id is already bound to an active series.
    #[error("pairing {0} is already bound to series {1}")]
    DuplicatePairing(PairingId, SeriesId),

    /// No series with this id is in the directory.
    #[error("series {0} not found")]
    SeriesNotFound(SeriesId),

    /// The series actor's command channel is full or closed.
    #[error("series {0} is unavailable")]
    Unavailable(SeriesId),

    /// The series refused the operation.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
