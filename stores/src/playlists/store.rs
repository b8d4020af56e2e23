//! Playlist store façade.

use super::actions::PlaylistAction;
use super::reducer::PlaylistReducer;
use super::state::PlaylistState;
use crate::config::StoreConfig;
use crate::environment::StoreEnvironment;
use crate::error::{DomainError, Result};
use crate::request::{dispatch, unexpected};
use cadence_api::{
    ApiClient, EntityId, Playlist, PlaylistDraft, PlaylistDuration, PlaylistQuery, Track,
};
use cadence_core::action::RequestId;
use cadence_runtime::Store;
use tokio::sync::broadcast;

type PlaylistRuntime = Store<PlaylistState, PlaylistAction, StoreEnvironment, PlaylistReducer>;

/// Client-side playlist collection.
///
/// The list holds playlist summaries; the current playlist may carry its
/// tracks. Track mutations reload the track order from the backend.
#[derive(Clone)]
pub struct PlaylistStore {
    store: PlaylistRuntime,
    config: StoreConfig,
}

impl PlaylistStore {
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
            store: Store::new(PlaylistState::default(), PlaylistReducer::new(), env),
            config,
        }
    }

    async fn request<F>(&self, command: F) -> Result<PlaylistAction>
    where
        F: FnOnce(RequestId) -> PlaylistAction,
    {
        dispatch(
            &self.store,
            self.config.request_timeout,
            PlaylistAction::is_event,
            command,
        )
        .await
    }

    // ═══════════════════════════════════════════════════════════
    // CRUD
    // ═══════════════════════════════════════════════════════════

    /// Load one page of playlists, replacing the loaded ones.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the list is unchanged.
    pub async fn fetch_all(&self, query: PlaylistQuery) -> Result<Vec<Playlist>> {
        match self
            .request(|request_id| PlaylistAction::FetchPlaylists { request_id, query })
            .await?
        {
            PlaylistAction::PlaylistsLoaded { page, .. } => Ok(page.items),
            other => Err(failure(other)),
        }
    }

    /// Load one playlist as the current playlist.
    ///
    /// # Errors
    ///
    /// Returns the backend's error (e.g. a private playlist of someone else).
    pub async fn fetch_by_id(&self, id: EntityId, include_tracks: bool) -> Result<Playlist> {
        match self
            .request(|request_id| PlaylistAction::FetchPlaylist {
                request_id,
                id,
                include_tracks,
            })
            .await?
        {
            PlaylistAction::PlaylistLoaded { playlist, .. } => Ok(playlist),
            other => Err(failure(other)),
        }
    }

    /// Create a playlist; it goes first.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (e.g. a missing name).
    pub async fn create(&self, draft: PlaylistDraft) -> Result<Playlist> {
        match self
            .request(|request_id| PlaylistAction::CreatePlaylist { request_id, draft })
            .await?
        {
            PlaylistAction::PlaylistCreated { playlist, .. } => Ok(playlist),
            other => Err(failure(other)),
        }
    }

    /// Change a playlist.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection.
    pub async fn update(&self, id: EntityId, draft: PlaylistDraft) -> Result<Playlist> {
        match self
            .request(|request_id| PlaylistAction::UpdatePlaylist {
                request_id,
                id,
                draft,
            })
            .await?
        {
            PlaylistAction::PlaylistUpdated { playlist, .. } => Ok(playlist),
            other => Err(failure(other)),
        }
    }

    /// Delete a playlist.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the list is unchanged.
    pub async fn delete(&self, id: EntityId) -> Result<()> {
        match self
            .request(|request_id| PlaylistAction::DeletePlaylist { request_id, id })
            .await?
        {
            PlaylistAction::PlaylistDeleted { .. } => Ok(()),
            other => Err(failure(other)),
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Tracks
    // ═══════════════════════════════════════════════════════════

    /// Load a playlist's tracks in order.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn tracks(&self, id: EntityId) -> Result<Vec<Track>> {
        match self
            .request(|request_id| PlaylistAction::FetchTracks { request_id, id })
            .await?
        {
            PlaylistAction::TracksLoaded { tracks, .. } => Ok(tracks),
            other => Err(failure(other)),
        }
    }

    /// Add a library track at a 1-based `position`, or at the end.
    /// Returns the added track.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (409 if already in the playlist).
    pub async fn add_track(
        &self,
        id: EntityId,
        music_id: EntityId,
        position: Option<u32>,
    ) -> Result<Track> {
        match self
            .request(|request_id| PlaylistAction::AddTrack {
                request_id,
                id,
                music_id,
                position,
            })
            .await?
        {
            PlaylistAction::TracksChanged {
                added: Some(track), ..
            } => Ok(track),
            other => Err(failure(other)),
        }
    }

    /// Remove a track, returning the playlist with its remaining tracks.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (404 if not in the playlist).
    pub async fn remove_track(&self, id: EntityId, music_id: EntityId) -> Result<Playlist> {
        self.track_change(|request_id| PlaylistAction::RemoveTrack {
            request_id,
            id,
            music_id,
        })
        .await
    }

    /// Move a track to a 1-based position, returning the playlist with its
    /// tracks in the new order.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection.
    pub async fn reorder(
        &self,
        id: EntityId,
        music_id: EntityId,
        new_position: u32,
    ) -> Result<Playlist> {
        self.track_change(|request_id| PlaylistAction::ReorderTrack {
            request_id,
            id,
            music_id,
            new_position,
        })
        .await
    }

    async fn track_change<F>(&self, command: F) -> Result<Playlist>
    where
        F: FnOnce(RequestId) -> PlaylistAction,
    {
        match self.request(command).await? {
            PlaylistAction::TracksChanged {
                playlist, tracks, ..
            } => Ok(Playlist {
                tracks: Some(tracks),
                ..playlist
            }),
            other => Err(failure(other)),
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Other actions
    // ═══════════════════════════════════════════════════════════

    /// Copy a playlist with its tracks; the copy goes first.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection.
    pub async fn duplicate(&self, id: EntityId, draft: PlaylistDraft) -> Result<Playlist> {
        match self
            .request(|request_id| PlaylistAction::Duplicate {
                request_id,
                id,
                draft,
            })
            .await?
        {
            PlaylistAction::Duplicated { copy, .. } => Ok(copy),
            other => Err(failure(other)),
        }
    }

    /// Count one play, returning the new count.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection.
    pub async fn record_play(&self, id: EntityId) -> Result<u64> {
        match self
            .request(|request_id| PlaylistAction::RecordPlay { request_id, id })
            .await?
        {
            PlaylistAction::PlayRecorded { play_count, .. } => Ok(play_count),
            other => Err(failure(other)),
        }
    }

    /// Recompute the total duration.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection.
    pub async fn refresh_duration(&self, id: EntityId) -> Result<PlaylistDuration> {
        match self
            .request(|request_id| PlaylistAction::RefreshDuration { request_id, id })
            .await?
        {
            PlaylistAction::DurationRefreshed { duration, .. } => Ok(duration),
            other => Err(failure(other)),
        }
    }

    /// Forget the current playlist.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn clear_current(&self) -> Result<()> {
        self.store.send(PlaylistAction::ClearCurrent).await?;
        Ok(())
    }

    /// Forget the last error.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn clear_error(&self) -> Result<()> {
        self.store.send(PlaylistAction::ClearError).await?;
        Ok(())
    }

    /// Drop everything loaded.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn reset(&self) -> Result<()> {
        self.store.send(PlaylistAction::Reset).await?;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════
    // Getters
    // ═══════════════════════════════════════════════════════════

    /// Read the state through a closure.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&PlaylistState) -> T,
    {
        self.store.state(f).await
    }

    /// Loaded playlist summaries.
    pub async fn playlists(&self) -> Vec<Playlist> {
        self.state(|s| s.playlists.clone()).await
    }

    /// Playlist opened on its own.
    pub async fn current(&self) -> Option<Playlist> {
        self.state(|s| s.current.clone()).await
    }

    /// Whether a request is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state(PlaylistState::is_loading).await
    }

    /// Last recorded failure message.
    pub async fn last_error(&self) -> Option<String> {
        self.state(|s| s.last_error().map(str::to_string)).await
    }

    /// Observe every reduced playlist action.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<PlaylistAction> {
        self.store.subscribe_actions()
    }
}

impl std::fmt::Debug for PlaylistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn failure(action: PlaylistAction) -> DomainError {
    match action {
        PlaylistAction::Failed { error, .. } => error,
        other => unexpected(&other),
    }
}
