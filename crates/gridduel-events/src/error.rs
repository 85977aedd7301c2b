//! Error types for the event bus.

/// Errors a [`Subscription`](crate::Subscription) can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// Every publisher is gone; no more events will arrive.
    #[error("event bus closed")]
    Closed,

    /// The subscriber fell behind and the oldest events were dropped.
    /// The subscription stays usable and resumes with the oldest
    /// retained event.
    #[error("subscriber lagged, {0} events dropped")]
    Lagged(u64),
}
