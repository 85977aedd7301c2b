//! Series actor: a Tokio task that owns one series.
//!
//! The actor is the only writer of its [`Series`]. Commands arrive over an
//! mpsc channel and move deadlines come from a [`MoveTimer`]; both are
//! drained by the same `select!` loop, so a move and an expiring deadline
//! for the same match are always applied one after the other.
//!
//! For one triggering action the actor publishes, in order: the move or
//! timeout event, `MatchDrawn`, the series verdict, `SeriesEvicted`, and
//! finally `MatchCreated` for an automatic rematch.

use gridduel_events::{OutcomeBus, OutcomeEvent};
use gridduel_match::{Match, MatchSnapshot};
use gridduel_protocol::{Coord, MoveResult, PairingId, PlayerId, SeriesId};
use gridduel_series::{Series, SeriesSnapshot, SeriesVerdict};
use gridduel_timer::{ArmedMove, MoveTimer};
use tokio::sync::{mpsc, oneshot};

use crate::{SessionConfig, SessionError, SharedDirectory};

/// Commands sent to a series actor through its channel.
pub(crate) enum SeriesCommand {
    /// Submit a move to the current match.
    SubmitMove {
        actor: PlayerId,
        coord: Coord,
        reply: oneshot::Sender<Result<MoveResult, SessionError>>,
    },

    /// Replace the current match with a fresh one.
    StartNewMatch {
        board_size: usize,
        reply: oneshot::Sender<Result<MatchSnapshot, SessionError>>,
    },

    /// Read the series state.
    Snapshot {
        reply: oneshot::Sender<SeriesSnapshot>,
    },

    /// Stop the actor.
    Shutdown,
}

/// Handle to a running series actor.
///
/// Cheap to clone. The directory holds one per series; callers clone it
/// out of the directory before awaiting anything.
#[derive(Debug, Clone)]
pub struct SeriesHandle {
    series_id: SeriesId,
    players: [PlayerId; 2],
    pairing: PairingId,
    sender: mpsc::Sender<SeriesCommand>,
}

impl SeriesHandle {
    pub(crate) fn new(
        series_id: SeriesId,
        players: [PlayerId; 2],
        pairing: PairingId,
        sender: mpsc::Sender<SeriesCommand>,
    ) -> Self {
        Self {
            series_id,
            players,
            pairing,
            sender,
        }
    }

    pub fn series_id(&self) -> SeriesId {
        self.series_id
    }

    /// The two players, first seat first.
    pub fn players(&self) -> [PlayerId; 2] {
        self.players
    }

    pub fn pairing(&self) -> PairingId {
        self.pairing
    }

    /// Submits a move and waits for the match's answer.
    ///
    /// Validation failures come back as a rejected [`MoveResult`], not as
    /// an error.
    pub async fn submit_move(
        &self,
        actor: PlayerId,
        coord: Coord,
    ) -> Result<MoveResult, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SeriesCommand::SubmitMove {
            actor,
            coord,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.series_id))?
    }

    /// Starts a new match and returns its initial state.
    pub async fn start_new_match(
        &self,
        board_size: usize,
    ) -> Result<MatchSnapshot, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SeriesCommand::StartNewMatch {
            board_size,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.series_id))?
    }

    /// Requests a read-only copy of the series.
    pub async fn snapshot(&self) -> Result<SeriesSnapshot, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SeriesCommand::Snapshot { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.series_id))
    }

    /// Tells the actor to stop. Pending deadlines are dropped with it.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(SeriesCommand::Shutdown).await
    }

    async fn send(&self, cmd: SeriesCommand) -> Result<(), SessionError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Unavailable(self.series_id))
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct SeriesActor {
    series: Series,
    timer: MoveTimer,
    config: SessionConfig,
    bus: OutcomeBus,
    directory: SharedDirectory,
    receiver: mpsc::Receiver<SeriesCommand>,
}

impl SeriesActor {
    /// Runs until shut down or until every handle is dropped.
    async fn run(mut self) {
        let series_id = self.series.id();
        tracing::info!(%series_id, "series actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(SeriesCommand::SubmitMove { actor, coord, reply }) => {
                        let result = self.handle_move(actor, coord).await;
                        let _ = reply.send(result);
                    }
                    Some(SeriesCommand::StartNewMatch { board_size, reply }) => {
                        let result = self.start_match(board_size).await;
                        let _ = reply.send(result);
                    }
                    Some(SeriesCommand::Snapshot { reply }) => {
                        let _ = reply.send(self.series.snapshot());
                    }
                    Some(SeriesCommand::Shutdown) => {
                        tracing::info!(%series_id, "series shutting down");
                        break;
                    }
                    None => break,
                },
                armed = self.timer.next_expired() => {
                    self.handle_expiry(armed).await;
                }
            }
        }

        tracing::info!(
            %series_id,
            armed = self.timer.metrics().total_armed,
            expired = self.timer.metrics().total_expired,
            "series actor stopped"
        );
    }

    async fn handle_move(
        &mut self,
        actor: PlayerId,
        coord: Coord,
    ) -> Result<MoveResult, SessionError> {
        let series_id = self.series.id();
        let outcome = self.series.submit_move(actor, coord).inspect_err(|e| {
            tracing::warn!(%series_id, %actor, error = %e, "move refused");
        })?;

        let result = outcome.result.clone();
        if !result.is_accepted() {
            tracing::debug!(
                %series_id,
                %actor,
                %coord,
                reasons = ?result.reasons(),
                "move rejected"
            );
            self.bus.publish(OutcomeEvent::MoveRejected {
                series_id,
                actor,
                result: result.clone(),
            });
            return Ok(result);
        }

        tracing::debug!(
            %series_id,
            match_id = %outcome.match_id,
            %actor,
            %coord,
            ended = result.ended,
            "move applied"
        );
        if let Some(stamp) = outcome.armed {
            self.timer.arm(outcome.match_id, stamp);
        }
        self.bus.publish(OutcomeEvent::MoveApplied {
            series_id,
            match_id: outcome.match_id,
            actor,
            coord,
            result: result.clone(),
        });

        if result.ended {
            if result.winner.is_none() {
                self.bus.publish(OutcomeEvent::MatchDrawn {
                    series_id,
                    match_id: outcome.match_id,
                });
            }
            self.after_match_end(outcome.verdict).await;
        }

        Ok(result)
    }

    /// Handles an expired deadline. Stale deadlines are dropped here.
    async fn handle_expiry(&mut self, armed: ArmedMove) {
        let series_id = self.series.id();
        let Some(forfeit) = self.series.expire(armed.match_id, armed.stamp) else {
            tracing::trace!(
                %series_id,
                match_id = %armed.match_id,
                actor = %armed.stamp.actor,
                "stale move deadline ignored"
            );
            return;
        };

        tracing::info!(
            %series_id,
            match_id = %forfeit.match_id,
            winner = %forfeit.winner,
            "move timed out"
        );
        self.bus.publish(OutcomeEvent::MoveTimedOut {
            series_id,
            match_id: forfeit.match_id,
            winner_id: forfeit.winner,
        });
        self.after_match_end(forfeit.verdict).await;
    }

    /// Announces the verdict if the series closed, otherwise starts the
    /// next match when configured to.
    async fn after_match_end(&mut self, verdict: Option<SeriesVerdict>) {
        match verdict {
            Some(verdict) => self.announce_verdict(verdict).await,
            None if self.config.auto_start_next_match => {
                let board_size = self
                    .series
                    .current_match()
                    .map_or(self.config.series.min_board_size, Match::board_size);
                // Failures are already published as MatchCreationFailed.
                let _ = self.start_match(board_size).await;
            }
            None => {}
        }
    }

    async fn announce_verdict(&mut self, verdict: SeriesVerdict) {
        let series_id = self.series.id();
        let event = match verdict {
            SeriesVerdict::Streak { winner } => OutcomeEvent::SeriesWonByStreak {
                series_id,
                winner_id: winner,
            },
            SeriesVerdict::TotalWins { winner } => OutcomeEvent::SeriesWonByTotal {
                series_id,
                winner_id: winner,
            },
        };
        self.bus.publish(event);

        if self.config.evict_finished_series {
            let removed = self.directory.lock().await.remove(series_id);
            if removed.is_some() {
                tracing::info!(%series_id, "finished series evicted");
                self.bus.publish(OutcomeEvent::SeriesEvicted { series_id });
            }
        }
    }

    async fn start_match(&mut self, board_size: usize) -> Result<MatchSnapshot, SessionError> {
        let series_id = self.series.id();
        let snapshot = match self.series.start_new_match(board_size) {
            Ok(started) => started.snapshot(),
            Err(e) => {
                tracing::warn!(%series_id, board_size, error = %e, "match creation failed");
                self.bus.publish(OutcomeEvent::MatchCreationFailed {
                    series_id,
                    reason: e.to_string(),
                });
                return Err(e.into());
            }
        };

        self.directory
            .lock()
            .await
            .index_match(snapshot.id, series_id);
        self.bus.publish(OutcomeEvent::MatchCreated {
            series_id,
            match_id: snapshot.id,
            board_size,
        });
        Ok(snapshot)
    }
}

/// Spawns a series actor and returns a handle to it.
///
/// The handle is not added to the directory; the caller does that. The
/// actor only uses the directory to index the matches it starts and to
/// evict itself once closed.
pub fn spawn_series(
    series: Series,
    config: SessionConfig,
    bus: OutcomeBus,
    directory: SharedDirectory,
) -> SeriesHandle {
    let config = config.validated();
    let (tx, rx) = mpsc::channel(config.command_channel_size);
    let handle = SeriesHandle::new(series.id(), series.players(), series.pairing(), tx);

    let actor = SeriesActor {
        timer: MoveTimer::new(config.timer.clone()),
        series,
        config,
        bus,
        directory,
        receiver: rx,
    };
    tokio::spawn(actor.run());

    handle
}
