//! Music store actions.

use crate::error::DomainError;
use cadence_api::{CatalogEntry, EntityId, MusicQuery, Page, Track, TrackUpdate, Upload};
use cadence_core::action::RequestId;
use cadence_macros::Action;

/// Music store action.
#[derive(Action, Clone, Debug)]
pub enum MusicAction {
    // ═══════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════

    /// Load one page of the library, replacing the loaded tracks.
    #[command]
    FetchTracks {
        /// Correlation id
        request_id: RequestId,
        /// Filters and page
        query: MusicQuery,
    },

    /// Load one track as the current track.
    #[command]
    FetchTrack {
        /// Correlation id
        request_id: RequestId,
        /// Track id
        id: EntityId,
    },

    /// Change a track's metadata.
    #[command]
    UpdateTrack {
        /// Correlation id
        request_id: RequestId,
        /// Track id
        id: EntityId,
        /// Fields to change
        update: TrackUpdate,
    },

    /// Delete a track.
    #[command]
    DeleteTrack {
        /// Correlation id
        request_id: RequestId,
        /// Track id
        id: EntityId,
    },

    /// Search the external catalog. A blank query clears the results.
    #[command]
    Search {
        /// Correlation id
        request_id: RequestId,
        /// Search text
        query: String,
        /// Maximum results
        limit: Option<u32>,
    },

    /// Import a catalog entry into the library.
    #[command]
    Import {
        /// Correlation id
        request_id: RequestId,
        /// External catalog id
        spotify_id: String,
    },

    /// Upload a local audio file.
    #[command]
    UploadTrack {
        /// Correlation id
        request_id: RequestId,
        /// File and metadata
        upload: Upload,
    },

    /// Count one play of a track.
    #[command]
    RecordPlay {
        /// Correlation id
        request_id: RequestId,
        /// Track id
        id: EntityId,
    },

    /// Flip a track's favorite mark. Local only.
    #[command]
    ToggleFavorite {
        /// Track id
        id: EntityId,
    },

    /// Make `track` the now-playing track.
    #[command]
    Play {
        /// Track to play
        track: Track,
    },

    /// Move the now-playing cursor forward, wrapping around.
    #[command]
    PlayNext,

    /// Move the now-playing cursor back, wrapping around.
    #[command]
    PlayPrevious,

    /// Clear the now-playing track.
    #[command]
    Stop,

    /// Forget the search results.
    #[command]
    ClearSearch,

    /// Forget the current track.
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

    /// A library page loaded.
    #[event]
    TracksLoaded {
        /// Correlation id
        request_id: RequestId,
        /// Filters of the load
        query: MusicQuery,
        /// Tracks and pagination
        page: Page<Track>,
        /// Served from the demo catalog after a failure
        from_fixtures: bool,
    },

    /// One track loaded.
    #[event]
    TrackLoaded {
        /// Correlation id
        request_id: RequestId,
        /// Track
        track: Track,
    },

    /// Track added to the library (import or upload).
    #[event]
    TrackAdded {
        /// Correlation id
        request_id: RequestId,
        /// Canonical track
        track: Track,
    },

    /// Track metadata changed.
    #[event]
    TrackUpdated {
        /// Correlation id
        request_id: RequestId,
        /// Canonical track
        track: Track,
    },

    /// Track deleted.
    #[event]
    TrackDeleted {
        /// Correlation id
        request_id: RequestId,
        /// Track id
        id: EntityId,
    },

    /// Search results arrived.
    #[event]
    SearchLoaded {
        /// Correlation id
        request_id: RequestId,
        /// Catalog entries
        results: Vec<CatalogEntry>,
        /// Served from the demo catalog after a failure
        from_fixtures: bool,
    },

    /// Play counted.
    #[event]
    PlayRecorded {
        /// Correlation id
        request_id: RequestId,
        /// Track id
        id: EntityId,
        /// New play count
        play_count: u64,
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
