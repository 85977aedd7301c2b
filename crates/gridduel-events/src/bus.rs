//! Fan-out bus built on `tokio::sync::broadcast`.
//!
//! Every subscriber sees every published event (optionally filtered by
//! kind) in publish order. Publishing never blocks: a slow subscriber
//! loses its oldest events and is told so with [`BusError::Lagged`].

use std::collections::HashSet;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::{BusError, EventKind, OutcomeEvent};

/// Default number of events retained for slow subscribers.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Publishes outcome events to any number of subscribers.
///
/// Cheap to clone; all clones publish to the same subscribers.
#[derive(Debug, Clone)]
pub struct OutcomeBus {
    sender: broadcast::Sender<OutcomeEvent>,
}

impl OutcomeBus {
    /// Creates a bus that retains up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event. Returns how many subscribers will see it.
    ///
    /// Having no subscribers is not an error; the event is dropped.
    pub fn publish(&self, event: OutcomeEvent) -> usize {
        tracing::debug!(
            kind = %event.kind(),
            series_id = %event.series_id(),
            "outcome event"
        );
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribes to every event kind.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            kinds: None,
        }
    }

    /// Subscribes to the given event kinds only.
    pub fn subscribe_to(&self, kinds: impl IntoIterator<Item = EventKind>) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            kinds: Some(kinds.into_iter().collect()),
        }
    }
}

impl Default for OutcomeBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

/// A receiving end of the bus.
///
/// Only sees events published after it was created.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<OutcomeEvent>,
    /// `None` means every kind.
    kinds: Option<HashSet<EventKind>>,
}

impl Subscription {
    /// Waits for the next event this subscription is interested in.
    pub async fn recv(&mut self) -> Result<OutcomeEvent, BusError> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.wants(&event) => return Ok(event),
                Ok(_) => continue,
                Err(RecvError::Closed) => return Err(BusError::Closed),
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!(dropped = n, "outcome subscriber lagged");
                    return Err(BusError::Lagged(n));
                }
            }
        }
    }

    /// Returns the next buffered event, or `Ok(None)` if there is none yet.
    pub fn try_recv(&mut self) -> Result<Option<OutcomeEvent>, BusError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.wants(&event) => return Ok(Some(event)),
                Ok(_) => continue,
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(BusError::Closed),
                Err(TryRecvError::Lagged(n)) => {
                    tracing::warn!(dropped = n, "outcome subscriber lagged");
                    return Err(BusError::Lagged(n));
                }
            }
        }
    }

    /// Drains every buffered event this subscription is interested in.
    pub fn drain(&mut self) -> Vec<OutcomeEvent> {
        let mut events = Vec::new();
        loop {
            match self.try_recv() {
                Ok(Some(event)) => events.push(event),
                Ok(None) | Err(BusError::Closed) => return events,
                Err(BusError::Lagged(_)) => continue,
            }
        }
    }

    fn wants(&self, event: &OutcomeEvent) -> bool {
        self.kinds
            .as_ref()
            .is_none_or(|kinds| kinds.contains(&event.kind()))
    }
}
