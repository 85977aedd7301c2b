//! Session directory: resolves series by id, match, player and pairing.
//!
//! Nothing outside the directory keeps a reference to a series across an
//! await point; callers look the series up, clone its handle, release the
//! lock and only then talk to the actor.

use std::collections::HashMap;
use std::sync::Arc;

use gridduel_protocol::{MatchId, PairingId, PlayerId, SeriesId};
use tokio::sync::Mutex;

use crate::{SeriesHandle, SessionError};

/// The directory as shared between the engine and series actors.
pub type SharedDirectory = Arc<Mutex<SessionDirectory>>;

/// Tracks every active series and which player, pairing and match belongs
/// to which series.
///
/// A player is in at most one series at a time, and a pairing id is bound
/// to at most one series at a time.
#[derive(Debug, Default)]
pub struct SessionDirectory {
    /// Active series, keyed by series ID.
    series: HashMap<SeriesId, SeriesHandle>,
    /// Every match a live series has started.
    by_match: HashMap<MatchId, SeriesId>,
    by_player: HashMap<PlayerId, SeriesId>,
    by_pairing: HashMap<PairingId, SeriesId>,
}

impl SessionDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty directory ready to be shared.
    pub fn shared() -> SharedDirectory {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Checks that neither player is busy and the pairing is free.
    pub fn ensure_available(
        &self,
        players: [PlayerId; 2],
        pairing: PairingId,
    ) -> Result<(), SessionError> {
        for player in players {
            if let Some(series_id) = self.by_player.get(&player) {
                return Err(SessionError::PlayerBusy(player, *series_id));
            }
        }
        if let Some(series_id) = self.by_pairing.get(&pairing) {
            return Err(SessionError::DuplicatePairing(pairing, *series_id));
        }
        Ok(())
    }

    /// Adds a series and indexes it by its players and pairing.
    pub fn insert(&mut self, handle: SeriesHandle) -> Result<(), SessionError> {
        self.ensure_available(handle.players(), handle.pairing())?;

        let series_id = handle.series_id();
        for player in handle.players() {
            self.by_player.insert(player, series_id);
        }
        self.by_pairing.insert(handle.pairing(), series_id);
        self.series.insert(series_id, handle);
        tracing::debug!(%series_id, series = self.series.len(), "series indexed");
        Ok(())
    }

    /// Records that `match_id` belongs to `series_id`.
    ///
    /// Returns `false` (and indexes nothing) if the series is no longer in
    /// the directory.
    pub fn index_match(&mut self, match_id: MatchId, series_id: SeriesId) -> bool {
        if !self.series.contains_key(&series_id) {
            return false;
        }
        self.by_match.insert(match_id, series_id);
        true
    }

    /// Removes a series and every index entry pointing at it.
    pub fn remove(&mut self, series_id: SeriesId) -> Option<SeriesHandle> {
        let handle = self.series.remove(&series_id)?;
        for player in handle.players() {
            self.by_player.remove(&player);
        }
        self.by_pairing.remove(&handle.pairing());
        self.by_match.retain(|_, sid| *sid != series_id);
        tracing::debug!(%series_id, series = self.series.len(), "series unindexed");
        Some(handle)
    }

    pub fn find_by_id(&self, series_id: SeriesId) -> Option<&SeriesHandle> {
        self.series.get(&series_id)
    }

    /// Resolves the series that started `match_id`.
    pub fn find_by_match(&self, match_id: MatchId) -> Option<&SeriesHandle> {
        self.by_match
            .get(&match_id)
            .and_then(|series_id| self.series.get(series_id))
    }

    /// Resolves the series `player` is currently in.
    pub fn find_by_player(&self, player: PlayerId) -> Option<&SeriesHandle> {
        self.by_player
            .get(&player)
            .and_then(|series_id| self.series.get(series_id))
    }

    pub fn find_by_pairing(&self, pairing: PairingId) -> Option<&SeriesHandle> {
        self.by_pairing
            .get(&pairing)
            .and_then(|series_id| self.series.get(series_id))
    }

    /// Number of active series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Lists all active series IDs.
    pub fn series_ids(&self) -> Vec<SeriesId> {
        self.series.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn pid(n: u64) -> PlayerId {
        PlayerId(n)
    }

    fn handle(series: u64, a: u64, b: u64, pairing: u64) -> SeriesHandle {
        let (tx, _rx) = mpsc::channel(1);
        SeriesHandle::new(SeriesId(series), [pid(a), pid(b)], PairingId(pairing), tx)
    }

    #[test]
    fn test_insert_indexes_players_and_pairing() {
        let mut dir = SessionDirectory::new();
        dir.insert(handle(1, 1, 2, 7)).unwrap();

        assert_eq!(dir.len(), 1);
        assert_eq!(dir.find_by_id(SeriesId(1)).unwrap().series_id(), SeriesId(1));
        assert_eq!(dir.find_by_player(pid(2)).unwrap().series_id(), SeriesId(1));
        assert_eq!(dir.find_by_pairing(PairingId(7)).unwrap().series_id(), SeriesId(1));
        assert!(dir.find_by_player(pid(3)).is_none());
    }

    #[test]
    fn test_insert_busy_player_rejected() {
        let mut dir = SessionDirectory::new();
        dir.insert(handle(1, 1, 2, 7)).unwrap();

        let err = dir.insert(handle(2, 3, 2, 8)).unwrap_err();
        assert_eq!(err, SessionError::PlayerBusy(pid(2), SeriesId(1)));
        assert_eq!(dir.len(), 1);
        assert!(dir.find_by_player(pid(3)).is_none());
    }

    #[test]
    fn test_insert_duplicate_pairing_rejected() {
        let mut dir = SessionDirectory::new();
        dir.insert(handle(1, 1, 2, 7)).unwrap();

        let err = dir.insert(handle(2, 3, 4, 7)).unwrap_err();
        assert_eq!(err, SessionError::DuplicatePairing(PairingId(7), SeriesId(1)));
    }

    #[test]
    fn test_index_match_resolves_owning_series() {
        let mut dir = SessionDirectory::new();
        dir.insert(handle(1, 1, 2, 7)).unwrap();

        assert!(dir.index_match(MatchId(10), SeriesId(1)));
        assert!(dir.index_match(MatchId(11), SeriesId(1)));
        assert_eq!(dir.find_by_match(MatchId(10)).unwrap().series_id(), SeriesId(1));
        assert_eq!(dir.find_by_match(MatchId(11)).unwrap().series_id(), SeriesId(1));
    }

    #[test]
    fn test_index_match_unknown_series_ignored() {
        let mut dir = SessionDirectory::new();
        assert!(!dir.index_match(MatchId(10), SeriesId(9)));
        assert!(dir.find_by_match(MatchId(10)).is_none());
    }

    #[test]
    fn test_remove_clears_every_index() {
        let mut dir = SessionDirectory::new();
        dir.insert(handle(1, 1, 2, 7)).unwrap();
        dir.index_match(MatchId(10), SeriesId(1));

        assert!(dir.remove(SeriesId(1)).is_some());
        assert!(dir.is_empty());
        assert!(dir.find_by_player(pid(1)).is_none());
        assert!(dir.find_by_pairing(PairingId(7)).is_none());
        assert!(dir.find_by_match(MatchId(10)).is_none());

        // Players and pairing are free again.
        dir.insert(handle(2, 1, 2, 7)).unwrap();
        assert_eq!(dir.series_ids(), vec![SeriesId(2)]);
    }

    #[test]
    fn test_remove_missing_returns_none() {
        let mut dir = SessionDirectory::new();
        assert!(dir.remove(SeriesId(1)).is_none());
    }
}
