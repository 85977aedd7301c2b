//! Outcome events and the event bus for gridduel.
//!
//! Match and series state transitions are announced as [`OutcomeEvent`]s
//! on an [`OutcomeBus`]. Whatever delivers them to players (a WebSocket
//! layer, a test, a log) holds a [`Subscription`].
//!
//! Events carry ids and small values only, never the mutable objects
//! themselves; a consumer that needs more re-resolves state by id.
//!
//! # Ordering
//!
//! Events caused by one action on one series are published in a fixed
//! order (outcome first, then any resulting match creation). Nothing is
//! guaranteed across different series.

mod bus;
mod error;
mod event;

pub use bus::{DEFAULT_BUS_CAPACITY, OutcomeBus, Subscription};
pub use error::BusError;
pub use event::{EventKind, OutcomeEvent};
