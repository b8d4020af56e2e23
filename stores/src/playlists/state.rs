//! Playlist store state.

use cadence_api::{EntityId, Playlist, PlaylistQuery, Track};
use cadence_macros::State;

/// Playlist store state.
#[derive(State, Clone, Debug, Default)]
pub struct PlaylistState {
    /// Loaded page of playlists, without embedded tracks: server order,
    /// created ones first
    pub playlists: Vec<Playlist>,
    /// Playlist opened on its own, possibly with its tracks
    pub current: Option<Playlist>,
    /// Filters of the last load
    pub query: PlaylistQuery,
    /// Total playlists matching `query` on the server
    pub total: u64,
    /// More pages follow
    pub has_next: bool,
    /// Requests in flight
    #[loading]
    pub pending: usize,
    /// Last failure message
    #[last_error]
    pub error: Option<String>,
}

impl PlaylistState {
    /// The playlist with `id`.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Playlist> {
        crate::list::find(&self.playlists, id)
    }

    /// Tracks of the current playlist, if loaded.
    #[must_use]
    pub fn current_tracks(&self) -> &[Track] {
        self.current
            .as_ref()
            .and_then(|playlist| playlist.tracks.as_deref())
            .unwrap_or_default()
    }

    /// Apply `patch` to every loaded copy of playlist `id`.
    pub fn patch(&mut self, id: EntityId, patch: impl Fn(&mut Playlist)) {
        self.playlists
            .iter_mut()
            .chain(self.current.as_mut())
            .filter(|playlist| playlist.id == id)
            .for_each(patch);
    }

    /// Store `playlist` as the canonical copy of its id: its summary in the
    /// list and, if it is the current one, as current. The current
    /// playlist keeps its tracks unless `playlist` carries some.
    pub fn absorb(&mut self, playlist: Playlist) {
        crate::list::replace(&mut self.playlists, summary(&playlist));
        if let Some(current) = self.current.as_mut().filter(|c| c.id == playlist.id) {
            let tracks = playlist.tracks.clone().or_else(|| current.tracks.take());
            *current = Playlist { tracks, ..playlist };
        }
    }
}

/// `playlist` without embedded tracks.
#[must_use]
pub fn summary(playlist: &Playlist) -> Playlist {
    Playlist {
        tracks: None,
        ..playlist.clone()
    }
}
