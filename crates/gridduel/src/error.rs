//! Unified error type for gridduel.

use gridduel_events::BusError;
use gridduel_match::MatchError;
use gridduel_series::SeriesError;
use gridduel_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// Move validation failures are not errors; they come back as a rejected
/// [`MoveResult`](gridduel_protocol::MoveResult).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A match could not be created.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// The series refused the operation (closed, bad board size, ...).
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// Series lookup or creation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An event subscription failed.
    #[error(transparent)]
    Bus(#[from] BusError),
}

impl GridError {
    /// Returns `true` if the error means the series id doesn't resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Session(SessionError::SeriesNotFound(_)))
    }
}

#[cfg(test)]
mod tests {
    use gridduel_protocol::{PlayerId, SeriesId};

    use super::*;

    #[test]
    fn test_from_match_error() {
        let err = MatchError::SamePlayer(PlayerId(1));
        let grid_err: GridError = err.into();
        assert!(matches!(grid_err, GridError::Match(_)));
    }

    #[test]
    fn test_from_series_error() {
        let err = SeriesError::Closed(SeriesId(1));
        let grid_err: GridError = err.into();
        assert!(matches!(grid_err, GridError::Series(_)));
        assert_eq!(grid_err.to_string(), "series closed");
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::SeriesNotFound(SeriesId(5));
        let grid_err: GridError = err.into();
        assert!(grid_err.is_not_found());
        assert!(grid_err.to_string().contains("S-5"));
    }

    #[test]
    fn test_from_bus_error() {
        let grid_err: GridError = BusError::Closed.into();
        assert!(matches!(grid_err, GridError::Bus(_)));
        assert!(!grid_err.is_not_found());
    }
}
