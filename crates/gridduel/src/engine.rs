//! `Engine` builder and the operations exposed to the transport layer.
//!
//! This is the entry point for driving gridduel. It ties together the
//! session directory, the series actors and the outcome bus.

use std::sync::Arc;
use std::time::Duration;

use gridduel_events::{DEFAULT_BUS_CAPACITY, EventKind, OutcomeBus, OutcomeEvent, Subscription};
use gridduel_match::MatchSnapshot;
use gridduel_protocol::{Coord, MatchId, MoveResult, PairingId, PlayerId, SeriesId};
use gridduel_series::{Series, SeriesSnapshot};
use gridduel_session::{
    AnyPlayer, PlayerRegistry, SeriesHandle, SessionConfig, SessionDirectory, SessionError,
    SharedDirectory, spawn_series,
};

use crate::GridError;

/// Shared engine state.
///
/// Wrapped in `Arc` so the engine can be cheaply cloned across tasks.
struct EngineState<R: PlayerRegistry> {
    directory: SharedDirectory,
    bus: OutcomeBus,
    registry: R,
    config: SessionConfig,
}

/// Builder for configuring an [`Engine`].
///
/// # Example
///
/// ```rust
/// use std::collections::HashSet;
/// use std::time::Duration;
/// use gridduel::prelude::*;
///
/// let registry: HashSet<PlayerId> = [PlayerId(1), PlayerId(2)].into();
/// let engine = Engine::builder()
///     .move_timeout(Duration::from_secs(30))
///     .auto_start_next_match(true)
///     .build(registry);
///
/// assert_eq!(engine.config().timer.move_timeout, Duration::from_secs(30));
/// assert!(engine.config().auto_start_next_match);
/// ```
pub struct EngineBuilder {
    session_config: SessionConfig,
    bus_capacity: usize,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            session_config: SessionConfig::default(),
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }

    /// Sets the whole session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Sets how long a player has to answer a move.
    pub fn move_timeout(mut self, timeout: Duration) -> Self {
        self.session_config.timer.move_timeout = timeout;
        self
    }

    /// Starts the next match automatically after one ends.
    pub fn auto_start_next_match(mut self, enabled: bool) -> Self {
        self.session_config.auto_start_next_match = enabled;
        self
    }

    /// Removes closed series from the directory.
    pub fn evict_finished_series(mut self, enabled: bool) -> Self {
        self.session_config.evict_finished_series = enabled;
        self
    }

    /// Sets how many events a slow subscriber may fall behind by.
    pub fn bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity;
        self
    }

    /// Builds the engine with the given player registry.
    pub fn build<R: PlayerRegistry>(self, registry: R) -> Engine<R> {
        let config = self.session_config.validated();
        tracing::debug!(
            move_timeout = ?config.timer.move_timeout,
            auto_start_next_match = config.auto_start_next_match,
            evict_finished_series = config.evict_finished_series,
            bus_capacity = self.bus_capacity,
            "engine built"
        );
        Engine {
            state: Arc::new(EngineState {
                directory: SessionDirectory::shared(),
                bus: OutcomeBus::new(self.bus_capacity),
                registry,
                config,
            }),
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The gridduel engine.
///
/// Cheap to clone; clones share the same series and event bus.
pub struct Engine<R: PlayerRegistry> {
    state: Arc<EngineState<R>>,
}

impl<R: PlayerRegistry> Clone for Engine<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl Engine<AnyPlayer> {
    /// Creates a new builder.
    ///
    /// The registry type is picked by [`EngineBuilder::build`], so this
    /// works for any registry despite living on `Engine<AnyPlayer>`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }
}

impl<R: PlayerRegistry> Engine<R> {
    /// Creates a series between two players and returns its id.
    ///
    /// `first` opens every match. Fails if the players are the same, not
    /// known to the registry, already in a series, or if `pairing` is
    /// already bound to a series. No match is started yet.
    pub async fn create_series(
        &self,
        first: PlayerId,
        second: PlayerId,
        pairing: PairingId,
    ) -> Result<SeriesId, GridError> {
        if first == second {
            return Err(SessionError::SamePlayer(first).into());
        }
        for player in [first, second] {
            if !self.state.registry.is_known(player).await {
                tracing::warn!(%player, %pairing, "series refused: unknown player");
                return Err(SessionError::UnknownPlayer(player).into());
            }
        }

        let mut directory = self.state.directory.lock().await;
        directory
            .ensure_available([first, second], pairing)
            .inspect_err(|e| tracing::warn!(%pairing, error = %e, "series refused"))?;

        let series = Series::new(first, second, pairing, self.state.config.series.clone());
        let series_id = series.id();
        let handle = spawn_series(
            series,
            self.state.config.clone(),
            self.state.bus.clone(),
            Arc::clone(&self.state.directory),
        );
        directory.insert(handle)?;

        tracing::info!(%series_id, %first, %second, %pairing, "series created");
        Ok(series_id)
    }

    /// Submits a move at row `x`, column `y` of the series' current match.
    ///
    /// Rule violations come back as a rejected [`MoveResult`]; an error
    /// means the series couldn't be reached or has no match yet.
    pub async fn submit_move(
        &self,
        series_id: SeriesId,
        actor: PlayerId,
        x: i32,
        y: i32,
    ) -> Result<MoveResult, GridError> {
        let handle = self.resolve(series_id).await?;
        Ok(handle.submit_move(actor, Coord::new(x, y)).await?)
    }

    /// Starts a new match in the series and returns its initial state.
    ///
    /// Every failure is also published as `MatchCreationFailed`.
    pub async fn start_new_match(
        &self,
        series_id: SeriesId,
        board_size: usize,
    ) -> Result<MatchSnapshot, GridError> {
        let handle = match self.resolve(series_id).await {
            Ok(handle) => handle,
            Err(e) => {
                self.state.bus.publish(OutcomeEvent::MatchCreationFailed {
                    series_id,
                    reason: "series not found".into(),
                });
                return Err(e);
            }
        };
        Ok(handle.start_new_match(board_size).await?)
    }

    /// Reads the state of a series.
    pub async fn series_snapshot(&self, series_id: SeriesId) -> Result<SeriesSnapshot, GridError> {
        let handle = self.resolve(series_id).await?;
        Ok(handle.snapshot().await?)
    }

    /// Reads the series' current match, if one was started.
    pub async fn match_snapshot(
        &self,
        series_id: SeriesId,
    ) -> Result<Option<MatchSnapshot>, GridError> {
        Ok(self.series_snapshot(series_id).await?.current_match)
    }

    /// Removes a series from the directory and stops its actor.
    pub async fn remove_series(&self, series_id: SeriesId) -> Result<(), GridError> {
        let handle = self
            .state
            .directory
            .lock()
            .await
            .remove(series_id)
            .ok_or(SessionError::SeriesNotFound(series_id))?;

        // The actor may already be gone; removal still succeeded.
        let _ = handle.shutdown().await;
        self.state
            .bus
            .publish(OutcomeEvent::SeriesEvicted { series_id });
        tracing::info!(%series_id, "series removed");
        Ok(())
    }

    /// Subscribes to every outcome event.
    pub fn subscribe(&self) -> Subscription {
        self.state.bus.subscribe()
    }

    /// Subscribes to the given event kinds only.
    pub fn subscribe_to(&self, kinds: impl IntoIterator<Item = EventKind>) -> Subscription {
        self.state.bus.subscribe_to(kinds)
    }

    /// The series `player` is currently in.
    pub async fn series_of_player(&self, player: PlayerId) -> Option<SeriesId> {
        let directory = self.state.directory.lock().await;
        directory.find_by_player(player).map(SeriesHandle::series_id)
    }

    /// The series that started `match_id`.
    pub async fn series_of_match(&self, match_id: MatchId) -> Option<SeriesId> {
        let directory = self.state.directory.lock().await;
        directory.find_by_match(match_id).map(SeriesHandle::series_id)
    }

    /// The series bound to `pairing`.
    pub async fn series_of_pairing(&self, pairing: PairingId) -> Option<SeriesId> {
        let directory = self.state.directory.lock().await;
        directory.find_by_pairing(pairing).map(SeriesHandle::series_id)
    }

    /// Number of series in the directory.
    pub async fn series_count(&self) -> usize {
        self.state.directory.lock().await.len()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.state.config
    }

    /// Clones the series handle out of the directory. The lock is released
    /// before the caller talks to the actor.
    async fn resolve(&self, series_id: SeriesId) -> Result<SeriesHandle, GridError> {
        let directory = self.state.directory.lock().await;
        directory
            .find_by_id(series_id)
            .cloned()
            .ok_or_else(|| {
                tracing::warn!(%series_id, "series not found");
                SessionError::SeriesNotFound(series_id).into()
            })
    }
}
