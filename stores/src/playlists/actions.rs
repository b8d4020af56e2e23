//! Playlist store actions.

use crate::error::DomainError;
use cadence_api::{EntityId, Page, Playlist, PlaylistDraft, PlaylistDuration, PlaylistQuery, Track};
use cadence_core::action::RequestId;
use cadence_macros::Action;

/// Playlist store action.
#[derive(Action, Clone, Debug)]
pub enum PlaylistAction {
    // ═══════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════

    /// Load one page of playlists, replacing the loaded ones.
    #[command]
    FetchPlaylists {
        /// Correlation id
        request_id: RequestId,
        /// Filters and page
        query: PlaylistQuery,
    },

    /// Load one playlist as the current playlist.
    #[command]
    FetchPlaylist {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
        /// Embed the tracks
        include_tracks: bool,
    },

    /// Create a playlist.
    #[command]
    CreatePlaylist {
        /// Correlation id
        request_id: RequestId,
        /// Fields of the new playlist
        draft: PlaylistDraft,
    },

    /// Change a playlist.
    #[command]
    UpdatePlaylist {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
        /// Fields to change
        draft: PlaylistDraft,
    },

    /// Delete a playlist.
    #[command]
    DeletePlaylist {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
    },

    /// Load a playlist's tracks.
    #[command]
    FetchTracks {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
    },

    /// Add a library track to a playlist.
    #[command]
    AddTrack {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
        /// Track id
        music_id: EntityId,
        /// 1-based position; appended when unset
        position: Option<u32>,
    },

    /// Remove a track from a playlist.
    #[command]
    RemoveTrack {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
        /// Track id
        music_id: EntityId,
    },

    /// Move a track within a playlist.
    #[command]
    ReorderTrack {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
        /// Track id
        music_id: EntityId,
        /// 1-based target position
        new_position: u32,
    },

    /// Copy a playlist with its tracks.
    #[command]
    Duplicate {
        /// Correlation id
        request_id: RequestId,
        /// Source playlist id
        id: EntityId,
        /// Overrides of the copy; empty keeps the server's default name
        draft: PlaylistDraft,
    },

    /// Count one play of a playlist.
    #[command]
    RecordPlay {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
    },

    /// Recompute a playlist's total duration.
    #[command]
    RefreshDuration {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
    },

    /// Forget the current playlist.
    #[command]
    ClearCurrent,

    /// Forget the last error.
    #[command]
    ClearError,

    /// Drop everything loaded.
    #[command]
    Reset,

    // ═══════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════

    /// A page of playlists loaded.
    #[event]
    PlaylistsLoaded {
        /// Correlation id
        request_id: RequestId,
        /// Filters of the load
        query: PlaylistQuery,
        /// Playlists and pagination
        page: Page<Playlist>,
    },

    /// One playlist loaded.
    #[event]
    PlaylistLoaded {
        /// Correlation id
        request_id: RequestId,
        /// Playlist
        playlist: Playlist,
    },

    /// Playlist created or duplicated.
    #[event]
    PlaylistCreated {
        /// Correlation id
        request_id: RequestId,
        /// Canonical playlist
        playlist: Playlist,
    },

    /// Playlist fields changed.
    #[event]
    PlaylistUpdated {
        /// Correlation id
        request_id: RequestId,
        /// Canonical playlist
        playlist: Playlist,
    },

    /// Playlist deleted.
    #[event]
    PlaylistDeleted {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
    },

    /// A playlist's tracks loaded.
    #[event]
    TracksLoaded {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
        /// Tracks in playlist order
        tracks: Vec<Track>,
    },

    /// A playlist's tracks changed (add, remove or reorder).
    #[event]
    TracksChanged {
        /// Correlation id
        request_id: RequestId,
        /// Playlist after the change
        playlist: Playlist,
        /// Tracks in playlist order, as reloaded after the change
        tracks: Vec<Track>,
        /// Track inserted by an add
        added: Option<Track>,
    },

    /// Playlist duplicated.
    #[event]
    Duplicated {
        /// Correlation id
        request_id: RequestId,
        /// The copy, tracks embedded
        copy: Playlist,
        /// The source playlist
        original: Playlist,
    },

    /// Play counted.
    #[event]
    PlayRecorded {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
        /// New play count
        play_count: u64,
    },

    /// Duration recomputed.
    #[event]
    DurationRefreshed {
        /// Correlation id
        request_id: RequestId,
        /// Playlist id
        id: EntityId,
        /// New duration
        duration: PlaylistDuration,
    },

    /// A request failed; nothing was patched.
    #[event]
    Failed {
        /// Correlation id
        request_id: RequestId,
        /// Cause
        error: DomainError,
        /// Message recorded when the backend sent none
        fallback: &'static str,
    },
}
