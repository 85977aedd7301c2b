//! Player identity hook.
//!
//! The engine never decides who is a real, connected player. The host
//! application does, by implementing [`PlayerRegistry`]; the engine asks
//! it before creating a series.

use std::collections::HashSet;
use std::sync::Arc;

use gridduel_protocol::PlayerId;

/// Vouches for player ids supplied by the transport layer.
///
/// # Example
///
/// ```rust
/// use gridduel_protocol::PlayerId;
/// use gridduel_session::PlayerRegistry;
///
/// /// Knows players 1 through 100.
/// struct FirstHundred;
///
/// impl PlayerRegistry for FirstHundred {
///     async fn is_known(&self, player: PlayerId) -> bool {
///         (1..=100).contains(&player.0)
///     }
/// }
/// ```
pub trait PlayerRegistry: Send + Sync + 'static {
    /// Returns `true` if `player` is a known, connected player.
    fn is_known(&self, player: PlayerId) -> impl std::future::Future<Output = bool> + Send;
}

/// Accepts every player id. For development and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyPlayer;

impl PlayerRegistry for AnyPlayer {
    async fn is_known(&self, _player: PlayerId) -> bool {
        true
    }
}

/// A fixed set of known players.
impl PlayerRegistry for HashSet<PlayerId> {
    async fn is_known(&self, player: PlayerId) -> bool {
        self.contains(&player)
    }
}

impl<R: PlayerRegistry> PlayerRegistry for Arc<R> {
    async fn is_known(&self, player: PlayerId) -> bool {
        self.as_ref().is_known(player).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_player_knows_everyone() {
        assert!(AnyPlayer.is_known(PlayerId(42)).await);
    }

    #[tokio::test]
    async fn test_fixed_set_knows_members_only() {
        let known: HashSet<PlayerId> = [PlayerId(1), PlayerId(2)].into();
        let shared = Arc::new(known);
        assert!(shared.is_known(PlayerId(2)).await);
        assert!(!shared.is_known(PlayerId(3)).await);
    }
}
