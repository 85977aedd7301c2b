//! The outcome event set.

use std::fmt;

use gridduel_protocol::{Coord, MatchId, MoveResult, PlayerId, SeriesId};
use serde::{Deserialize, Serialize};

/// A state transition in a match or series.
///
/// `#[serde(tag = "type")]` gives the transport a flat JSON object:
/// `{ "type": "MoveTimedOut", "series_id": 1, ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutcomeEvent {
    /// A new match became current in the series.
    MatchCreated {
        series_id: SeriesId,
        match_id: MatchId,
        board_size: usize,
    },

    /// A move was accepted. `result` says whether it ended the match.
    MoveApplied {
        series_id: SeriesId,
        match_id: MatchId,
        actor: PlayerId,
        coord: Coord,
        result: MoveResult,
    },

    /// A move failed validation. `result.rejections` says why.
    MoveRejected {
        series_id: SeriesId,
        actor: PlayerId,
        result: MoveResult,
    },

    /// The opponent didn't answer in time; the last mover wins the match.
    MoveTimedOut {
        series_id: SeriesId,
        match_id: MatchId,
        winner_id: PlayerId,
    },

    /// The board filled up with no winning line.
    MatchDrawn {
        series_id: SeriesId,
        match_id: MatchId,
    },

    /// The series closed on consecutive wins.
    SeriesWonByStreak {
        series_id: SeriesId,
        winner_id: PlayerId,
    },

    /// The series closed on cumulative wins.
    SeriesWonByTotal {
        series_id: SeriesId,
        winner_id: PlayerId,
    },

    /// A new match could not be started.
    MatchCreationFailed { series_id: SeriesId, reason: String },

    /// The series was removed from the directory.
    SeriesEvicted { series_id: SeriesId },
}

impl OutcomeEvent {
    /// The discriminant, for filtering.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MatchCreated { .. } => EventKind::MatchCreated,
            Self::MoveApplied { .. } => EventKind::MoveApplied,
            Self::MoveRejected { .. } => EventKind::MoveRejected,
            Self::MoveTimedOut { .. } => EventKind::MoveTimedOut,
            Self::MatchDrawn { .. } => EventKind::MatchDrawn,
            Self::SeriesWonByStreak { .. } => EventKind::SeriesWonByStreak,
            Self::SeriesWonByTotal { .. } => EventKind::SeriesWonByTotal,
            Self::MatchCreationFailed { .. } => EventKind::MatchCreationFailed,
            Self::SeriesEvicted { .. } => EventKind::SeriesEvicted,
        }
    }

    /// The series the event belongs to. Every event has one.
    pub fn series_id(&self) -> SeriesId {
        match self {
            Self::MatchCreated { series_id, .. }
            | Self::MoveApplied { series_id, .. }
            | Self::MoveRejected { series_id, .. }
            | Self::MoveTimedOut { series_id, .. }
            | Self::MatchDrawn { series_id, .. }
            | Self::SeriesWonByStreak { series_id, .. }
            | Self::SeriesWonByTotal { series_id, .. }
            | Self::MatchCreationFailed { series_id, .. }
            | Self::SeriesEvicted { series_id } => *series_id,
        }
    }

    /// Returns `true` for the two series-closing events.
    pub fn is_series_end(&self) -> bool {
        matches!(
            self,
            Self::SeriesWonByStreak { .. } | Self::SeriesWonByTotal { .. }
        )
    }
}

/// Event discriminants, used to subscribe to a subset of events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    MatchCreated,
    MoveApplied,
    MoveRejected,
    MoveTimedOut,
    MatchDrawn,
    SeriesWonByStreak,
    SeriesWonByTotal,
    MatchCreationFailed,
    SeriesEvicted,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
