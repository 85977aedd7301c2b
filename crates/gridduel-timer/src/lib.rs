//! Per-move deadline scheduling for gridduel.
//!
//! Every accepted move arms a deadline. A deadline is never cancelled:
//! when it expires it hands back an [`ArmedMove`] snapshot (match id plus
//! the identity of the move it was armed for), and the owner decides
//! whether that move is still the one the match is waiting on. A deadline
//! whose move has been answered is simply ignored.
//!
//! # Integration
//!
//! The timer is designed to sit inside a series actor's `tokio::select!`
//! loop, so expiry and command handling never interleave:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands, arm deadlines */ }
//!         armed = timer.next_expired() => { /* stale check, maybe forfeit */ }
//!     }
//! }
//! ```
//!
//! All waiting uses `tokio::time`, so tests can drive it with a paused
//! clock.

use std::collections::VecDeque;
use std::time::Duration;

use gridduel_protocol::{MatchId, MoveStamp};
use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::{trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for move deadlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// How long a player has to answer the opponent's move.
    pub move_timeout: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            move_timeout: Duration::from_secs(15),
        }
    }
}

impl TimerConfig {
    /// Shortest accepted timeout.
    pub const MIN_TIMEOUT: Duration = Duration::from_millis(1);

    /// Create a config with a specific timeout.
    pub fn with_timeout(move_timeout: Duration) -> Self {
        Self { move_timeout }
    }

    /// Clamp out-of-range values. A zero timeout becomes [`Self::MIN_TIMEOUT`].
    pub fn validated(mut self) -> Self {
        if self.move_timeout < Self::MIN_TIMEOUT {
            warn!(
                timeout = ?self.move_timeout,
                min = ?Self::MIN_TIMEOUT,
                "move_timeout below minimum, clamping"
            );
            self.move_timeout = Self::MIN_TIMEOUT;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// ArmedMove
// ---------------------------------------------------------------------------

/// An immutable snapshot captured when a deadline is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedMove {
    /// The match the move was played in.
    pub match_id: MatchId,
    /// The move the deadline guards.
    pub stamp: MoveStamp,
    /// When the deadline expires.
    pub deadline: Instant,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Counters for one timer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerMetrics {
    /// Deadlines armed.
    pub total_armed: u64,
    /// Deadlines that reached their expiry and were handed back.
    pub total_expired: u64,
}

// ---------------------------------------------------------------------------
// MoveTimer
// ---------------------------------------------------------------------------

/// A queue of move deadlines for one series.
///
/// All deadlines share the same timeout and are armed in time order, so
/// the queue is always sorted and the front expires first.
#[derive(Debug)]
pub struct MoveTimer {
    config: TimerConfig,
    pending: VecDeque<ArmedMove>,
    metrics: TimerMetrics,
}

impl MoveTimer {
    /// Create a timer from config.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config: config.validated(),
            pending: VecDeque::new(),
            metrics: TimerMetrics::default(),
        }
    }

    /// Create a timer with a specific timeout.
    pub fn with_timeout(move_timeout: Duration) -> Self {
        Self::new(TimerConfig::with_timeout(move_timeout))
    }

    /// Arms a deadline for `stamp`, `move_timeout` from now.
    pub fn arm(&mut self, match_id: MatchId, stamp: MoveStamp) -> ArmedMove {
        let armed = ArmedMove {
            match_id,
            stamp,
            deadline: Instant::now() + self.config.move_timeout,
        };
        self.pending.push_back(armed);
        self.metrics.total_armed += 1;
        trace!(
            %match_id,
            actor = %stamp.actor,
            coord = %stamp.coord,
            pending = self.pending.len(),
            "move deadline armed"
        );
        armed
    }

    /// Waits for the earliest deadline and returns its snapshot.
    ///
    /// With nothing armed this future pends forever, which lets
    /// `tokio::select!` keep serving its other branches. Cancel-safe: a
    /// deadline is only removed once it has expired.
    pub async fn next_expired(&mut self) -> ArmedMove {
        let Some(front) = self.pending.front().copied() else {
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(front.deadline).await;

        self.pending.pop_front();
        self.metrics.total_expired += 1;
        trace!(match_id = %front.match_id, "move deadline expired");
        front
    }

    /// Number of armed deadlines that haven't expired yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// The configured move timeout.
    pub fn move_timeout(&self) -> Duration {
        self.config.move_timeout
    }

    pub fn metrics(&self) -> &TimerMetrics {
        &self.metrics
    }
}
