//! # Gridduel
//!
//! Core engine for a two-player, turn-based grid game played as a
//! best-of series.
//!
//! The transport layer (WebSockets, invites, connection tracking) lives
//! outside this crate. It talks to the [`Engine`]: create a series, start
//! matches, submit moves, and subscribe to [`OutcomeEvent`]s to learn what
//! happened. Every series runs in its own Tokio task, so the engine must
//! be used from inside a Tokio runtime.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridduel::prelude::*;
//!
//! # async fn demo() -> Result<(), GridError> {
//! let engine = Engine::builder().build(AnyPlayer);
//! let mut events = engine.subscribe();
//!
//! let series = engine.create_series(PlayerId(1), PlayerId(2), PairingId(1)).await?;
//! engine.start_new_match(series, 3).await?;
//! let result = engine.submit_move(series, PlayerId(1), 0, 0).await?;
//! assert!(result.is_accepted());
//!
//! while let Ok(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
pub mod telemetry;

pub use engine::{Engine, EngineBuilder};
pub use error::GridError;

pub mod prelude {
    pub use crate::{Engine, EngineBuilder, GridError};
    pub use gridduel_events::{BusError, EventKind, OutcomeBus, OutcomeEvent, Subscription};
    pub use gridduel_match::{Board, Cell, MatchError, MatchSnapshot};
    pub use gridduel_protocol::{
        Coord, MatchId, MoveRejection, MoveResult, PairingId, PlayerId, SeriesId,
    };
    pub use gridduel_series::{MatchSummary, SeriesConfig, SeriesError, SeriesSnapshot, Streak};
    pub use gridduel_session::{AnyPlayer, PlayerRegistry, SessionConfig, SessionError};
    pub use gridduel_timer::TimerConfig;
}
