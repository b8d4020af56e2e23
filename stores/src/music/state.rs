//! Music store state.

use cadence_api::{CatalogEntry, EntityId, MusicQuery, Track};
use cadence_macros::State;
use std::collections::BTreeSet;

/// Music store state.
#[derive(State, Clone, Debug, Default)]
pub struct MusicState {
    /// Loaded library page: server order, added tracks first
    pub tracks: Vec<Track>,
    /// Track opened on its own
    pub current: Option<Track>,
    /// Now-playing track
    pub now_playing: Option<Track>,
    /// Last external catalog search
    pub search_results: Vec<CatalogEntry>,
    /// Favorite track ids. The backend keeps no favorites.
    pub favorites: BTreeSet<EntityId>,
    /// Filters of the last library load
    pub query: MusicQuery,
    /// Total tracks matching `query` on the server
    pub total: u64,
    /// More library pages follow
    pub has_next: bool,
    /// The loaded catalog is the demo one
    pub from_fixtures: bool,
    /// Requests in flight
    #[loading]
    pub pending: usize,
    /// Last failure message
    #[last_error]
    pub error: Option<String>,
}

impl MusicState {
    /// The track with `id`.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Track> {
        crate::list::find(&self.tracks, id)
    }

    /// Whether `id` is marked as favorite.
    #[must_use]
    pub fn is_favorite(&self, id: EntityId) -> bool {
        self.favorites.contains(&id)
    }

    /// Loaded tracks marked as favorite.
    #[must_use]
    pub fn favorite_tracks(&self) -> Vec<&Track> {
        self.tracks
            .iter()
            .filter(|track| self.is_favorite(track.id))
            .collect()
    }

    /// The track after the now-playing one, wrapping to the first.
    #[must_use]
    pub fn next_track(&self) -> Option<&Track> {
        let len = self.tracks.len();
        self.step(|position| position.map_or(0, |p| (p + 1) % len))
    }

    /// The track before the now-playing one, wrapping to the last.
    #[must_use]
    pub fn previous_track(&self) -> Option<&Track> {
        let last = self.tracks.len().saturating_sub(1);
        self.step(|position| match position {
            Some(p) if p > 0 => p - 1,
            _ => last,
        })
    }

    // `target` maps the now-playing position (None if it left the list) to
    // the index to play.
    fn step(&self, target: impl FnOnce(Option<usize>) -> usize) -> Option<&Track> {
        let playing = self.now_playing.as_ref()?;
        if self.tracks.is_empty() {
            return None;
        }
        let position = self.tracks.iter().position(|track| track.id == playing.id);
        self.tracks.get(target(position))
    }
}
