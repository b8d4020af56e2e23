//! Music store façade.

use super::actions::MusicAction;
use super::reducer::MusicReducer;
use super::state::MusicState;
use crate::config::StoreConfig;
use crate::environment::StoreEnvironment;
use crate::error::{DomainError, Result};
use crate::request::{dispatch, unexpected};
use cadence_api::{
    ApiClient, AudioStream, CatalogEntry, EntityId, MusicQuery, Track, TrackUpdate, Upload,
};
use cadence_core::action::RequestId;
use cadence_runtime::Store;
use std::collections::BTreeSet;
use tokio::sync::broadcast;

type MusicRuntime = Store<MusicState, MusicAction, StoreEnvironment, MusicReducer>;

/// Client-side music library with a now-playing cursor.
///
/// Favorites live only in this store. Under
/// [`FallbackPolicy::Fixtures`](crate::FallbackPolicy::Fixtures) a failed
/// library load or search serves the demo catalog instead of failing.
#[derive(Clone)]
pub struct MusicStore {
    store: MusicRuntime,
    config: StoreConfig,
}

impl MusicStore {
    /// Create an empty store on `api`.
    #[must_use]
    pub fn new(api: ApiClient, config: StoreConfig) -> Self {
        let env = StoreEnvironment::new(api).with_fallback(config.fallback);
        Self::with_environment(env, config)
    }

    /// Create an empty store on a prepared environment.
    #[must_use]
    pub fn with_environment(env: StoreEnvironment, config: StoreConfig) -> Self {
        Self {
            store: Store::new(MusicState::default(), MusicReducer::new(), env),
            config,
        }
    }

    async fn request<F>(&self, command: F) -> Result<MusicAction>
    where
        F: FnOnce(RequestId) -> MusicAction,
    {
        dispatch(&self.store, self.config.request_timeout, MusicAction::is_event, command).await
    }

    async fn send(&self, action: MusicAction) -> Result<()> {
        self.store.send(action).await?;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════
    // Library
    // ═══════════════════════════════════════════════════════════

    /// Load one page of the library, replacing the loaded tracks.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the library is unchanged.
    pub async fn fetch_all(&self, query: MusicQuery) -> Result<Vec<Track>> {
        match self
            .request(|request_id| MusicAction::FetchTracks { request_id, query })
            .await?
        {
            MusicAction::TracksLoaded { page, .. } => Ok(page.items),
            other => Err(failure(other)),
        }
    }

    /// Load one track as the current track.
    ///
    /// # Errors
    ///
    /// Returns the backend's error (e.g. not found).
    pub async fn fetch_by_id(&self, id: EntityId) -> Result<Track> {
        match self
            .request(|request_id| MusicAction::FetchTrack { request_id, id })
            .await?
        {
            MusicAction::TrackLoaded { track, .. } => Ok(track),
            other => Err(failure(other)),
        }
    }

    /// Change a track's metadata.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (e.g. not the uploader).
    pub async fn update(&self, id: EntityId, update: TrackUpdate) -> Result<Track> {
        match self
            .request(|request_id| MusicAction::UpdateTrack {
                request_id,
                id,
                update,
            })
            .await?
        {
            MusicAction::TrackUpdated { track, .. } => Ok(track),
            other => Err(failure(other)),
        }
    }

    /// Delete a track.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the library is unchanged.
    pub async fn delete(&self, id: EntityId) -> Result<()> {
        match self
            .request(|request_id| MusicAction::DeleteTrack { request_id, id })
            .await?
        {
            MusicAction::TrackDeleted { .. } => Ok(()),
            other => Err(failure(other)),
        }
    }

    /// Upload a local audio file; the new track goes first.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (e.g. unsupported format).
    pub async fn upload(&self, upload: Upload) -> Result<Track> {
        match self
            .request(|request_id| MusicAction::UploadTrack { request_id, upload })
            .await?
        {
            MusicAction::TrackAdded { track, .. } => Ok(track),
            other => Err(failure(other)),
        }
    }

    /// Add a catalog search result to the library; it goes first.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (e.g. already imported).
    pub async fn import(&self, entry: &CatalogEntry) -> Result<Track> {
        let spotify_id = entry.spotify_id.clone();
        match self
            .request(|request_id| MusicAction::Import {
                request_id,
                spotify_id,
            })
            .await?
        {
            MusicAction::TrackAdded { track, .. } => Ok(track),
            other => Err(failure(other)),
        }
    }

    /// Stream a track's audio. The store is not touched.
    ///
    /// # Errors
    ///
    /// Returns the backend's error (e.g. no local file).
    pub async fn stream(&self, id: EntityId) -> Result<AudioStream> {
        tracing::debug!(id, "Opening audio stream");
        Ok(self.store.environment().api.music().stream(id).await?)
    }

    /// Count one play of a track, returning the new count.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn record_play(&self, id: EntityId) -> Result<u64> {
        match self
            .request(|request_id| MusicAction::RecordPlay { request_id, id })
            .await?
        {
            MusicAction::PlayRecorded { play_count, .. } => Ok(play_count),
            other => Err(failure(other)),
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Search
    // ═══════════════════════════════════════════════════════════

    /// Search the external catalog. A blank query clears the results
    /// without calling the backend.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; earlier results are kept.
    pub async fn search(&self, query: &str, limit: Option<u32>) -> Result<Vec<CatalogEntry>> {
        let query = query.to_string();
        match self
            .request(|request_id| MusicAction::Search {
                request_id,
                query,
                limit,
            })
            .await?
        {
            MusicAction::SearchLoaded { results, .. } => Ok(results),
            other => Err(failure(other)),
        }
    }

    /// Forget the search results.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn clear_search(&self) -> Result<()> {
        self.send(MusicAction::ClearSearch).await
    }

    // ═══════════════════════════════════════════════════════════
    // Local state
    // ═══════════════════════════════════════════════════════════

    /// Flip a track's favorite mark, returning whether it is now a favorite.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn toggle_favorite(&self, id: EntityId) -> Result<bool> {
        self.send(MusicAction::ToggleFavorite { id }).await?;
        Ok(self.is_favorite(id).await)
    }

    /// Make `track` the now-playing track.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn play(&self, track: Track) -> Result<()> {
        self.send(MusicAction::Play { track }).await
    }

    /// Play the next loaded track, wrapping to the first. Does nothing when
    /// no track plays.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn play_next(&self) -> Result<Option<Track>> {
        self.send(MusicAction::PlayNext).await?;
        Ok(self.now_playing().await)
    }

    /// Play the previous loaded track, wrapping to the last. Does nothing
    /// when no track plays.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn play_previous(&self) -> Result<Option<Track>> {
        self.send(MusicAction::PlayPrevious).await?;
        Ok(self.now_playing().await)
    }

    /// Stop playback.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn stop(&self) -> Result<()> {
        self.send(MusicAction::Stop).await
    }

    /// Forget the current track.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn clear_current(&self) -> Result<()> {
        self.send(MusicAction::ClearCurrent).await
    }

    /// Forget the last error.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn clear_error(&self) -> Result<()> {
        self.send(MusicAction::ClearError).await
    }

    /// Drop everything loaded, favorites included.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn reset(&self) -> Result<()> {
        self.send(MusicAction::Reset).await
    }

    // ═══════════════════════════════════════════════════════════
    // Getters
    // ═══════════════════════════════════════════════════════════

    /// Read the state through a closure.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&MusicState) -> T,
    {
        self.store.state(f).await
    }

    /// Loaded tracks.
    pub async fn tracks(&self) -> Vec<Track> {
        self.state(|s| s.tracks.clone()).await
    }

    /// Track opened on its own.
    pub async fn current(&self) -> Option<Track> {
        self.state(|s| s.current.clone()).await
    }

    /// Now-playing track.
    pub async fn now_playing(&self) -> Option<Track> {
        self.state(|s| s.now_playing.clone()).await
    }

    /// Last search results.
    pub async fn search_results(&self) -> Vec<CatalogEntry> {
        self.state(|s| s.search_results.clone()).await
    }

    /// Favorite track ids.
    pub async fn favorites(&self) -> BTreeSet<EntityId> {
        self.state(|s| s.favorites.clone()).await
    }

    /// Whether `id` is a favorite.
    pub async fn is_favorite(&self, id: EntityId) -> bool {
        self.state(|s| s.is_favorite(id)).await
    }

    /// Whether the loaded library is the demo catalog.
    pub async fn from_fixtures(&self) -> bool {
        self.state(|s| s.from_fixtures).await
    }

    /// Whether a request is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state(MusicState::is_loading).await
    }

    /// Last recorded failure message.
    pub async fn last_error(&self) -> Option<String> {
        self.state(|s| s.last_error().map(str::to_string)).await
    }

    /// Observe every reduced music action.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<MusicAction> {
        self.store.subscribe_actions()
    }
}

impl std::fmt::Debug for MusicStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn failure(action: MusicAction) -> DomainError {
    match action {
        MusicAction::Failed { error, .. } => error,
        other => unexpected(&other),
    }
}
