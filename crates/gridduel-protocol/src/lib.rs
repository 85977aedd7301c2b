//! Shared vocabulary for gridduel.
//!
//! This crate defines the values that every other layer passes around:
//!
//! - **Identifiers** ([`PlayerId`], [`SeriesId`], [`MatchId`],
//!   [`PairingId`]): newtype wrappers so ids of different kinds can't be
//!   mixed up.
//! - **Moves** ([`Coord`], [`MoveStamp`]): where a mark goes and who
//!   placed it.
//! - **Results** ([`MoveResult`], [`MoveRejection`]): the uniform shape
//!   returned by every move attempt, accepted or not.
//!
//! Nothing here knows about boards, timers, or tasks. Everything that
//! crosses to a transport layer derives `Serialize`/`Deserialize`, but the
//! wire format itself is the transport's choice.

mod ids;
mod moves;

pub use ids::{MatchId, PairingId, PlayerId, SeriesId};
pub use moves::{Axis, Coord, MoveRejection, MoveResult, MoveStamp};
