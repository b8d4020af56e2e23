//! Playlist store reducer.

use super::actions::PlaylistAction;
use super::state::{summary, PlaylistState};
use crate::environment::StoreEnvironment;
use crate::error::DomainError;
use crate::list;
use crate::request::remote;
use cadence_api::{ApiError, Playlist};
use cadence_core::{action::RequestId, effect::Effect, reducer::Reducer, smallvec, SmallVec};

const FETCH_FAILED: &str = "Could not load playlists";
const FETCH_ONE_FAILED: &str = "Could not load playlist";
const CREATE_FAILED: &str = "Could not create playlist";
const UPDATE_FAILED: &str = "Could not update playlist";
const DELETE_FAILED: &str = "Could not delete playlist";
const TRACKS_FAILED: &str = "Could not load playlist tracks";
const ADD_TRACK_FAILED: &str = "Could not add track to playlist";
const REMOVE_TRACK_FAILED: &str = "Could not remove track from playlist";
const REORDER_FAILED: &str = "Could not reorder playlist";
const DUPLICATE_FAILED: &str = "Could not duplicate playlist";
const PLAY_FAILED: &str = "Could not record play";
const DURATION_FAILED: &str = "Could not refresh duration";

/// Reducer of the playlist store.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaylistReducer;

impl PlaylistReducer {
    /// Create a new playlist reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn failed(
    request_id: RequestId,
    fallback: &'static str,
) -> impl Fn(DomainError) -> PlaylistAction + Clone + Send + 'static {
    move |error| PlaylistAction::Failed {
        request_id,
        error,
        fallback,
    }
}

fn tracks_changed(
    request_id: RequestId,
) -> impl FnOnce((Playlist, Vec<cadence_api::Track>)) -> PlaylistAction + Send + 'static {
    move |(playlist, tracks)| PlaylistAction::TracksChanged {
        request_id,
        playlist,
        tracks,
        added: None,
    }
}

impl Reducer for PlaylistReducer {
    type State = PlaylistState;
    type Action = PlaylistAction;
    type Environment = StoreEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let api = env.api.clone();

        match action {
            // ═══════════════════════════════════════════════════════════
            // Commands
            // ═══════════════════════════════════════════════════════════
            PlaylistAction::FetchPlaylists { request_id, query } => {
                state.begin_request();
                smallvec![remote(
                    async move {
                        let page = api.playlists().list(&query).await?;
                        Ok::<_, ApiError>((query, page))
                    },
                    move |(query, page)| PlaylistAction::PlaylistsLoaded {
                        request_id,
                        query,
                        page,
                    },
                    failed(request_id, FETCH_FAILED),
                )]
            },

            PlaylistAction::FetchPlaylist {
                request_id,
                id,
                include_tracks,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.playlists().get(id, include_tracks).await },
                    move |playlist| PlaylistAction::PlaylistLoaded {
                        request_id,
                        playlist,
                    },
                    failed(request_id, FETCH_ONE_FAILED),
                )]
            },

            PlaylistAction::CreatePlaylist { request_id, draft } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.playlists().create(&draft).await },
                    move |playlist| PlaylistAction::PlaylistCreated {
                        request_id,
                        playlist,
                    },
                    failed(request_id, CREATE_FAILED),
                )]
            },

            PlaylistAction::UpdatePlaylist {
                request_id,
                id,
                draft,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.playlists().update(id, &draft).await },
                    move |playlist| PlaylistAction::PlaylistUpdated {
                        request_id,
                        playlist,
                    },
                    failed(request_id, UPDATE_FAILED),
                )]
            },

            PlaylistAction::DeletePlaylist { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.playlists().delete(id).await },
                    move |_| PlaylistAction::PlaylistDeleted { request_id, id },
                    failed(request_id, DELETE_FAILED),
                )]
            },

            PlaylistAction::FetchTracks { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.playlists().tracks(id).await },
                    move |tracks| PlaylistAction::TracksLoaded {
                        request_id,
                        id,
                        tracks,
                    },
                    failed(request_id, TRACKS_FAILED),
                )]
            },

            PlaylistAction::AddTrack {
                request_id,
                id,
                music_id,
                position,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move {
                        let added = api.playlists().add_track(id, music_id, position).await?;
                        let tracks = api.playlists().tracks(id).await?;
                        Ok::<_, ApiError>((added, tracks))
                    },
                    move |(added, tracks)| PlaylistAction::TracksChanged {
                        request_id,
                        playlist: added.playlist,
                        tracks,
                        added: Some(added.music),
                    },
                    failed(request_id, ADD_TRACK_FAILED),
                )]
            },

            PlaylistAction::RemoveTrack {
                request_id,
                id,
                music_id,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move {
                        let playlist = api.playlists().remove_track(id, music_id).await?;
                        let tracks = api.playlists().tracks(id).await?;
                        Ok::<_, ApiError>((playlist, tracks))
                    },
                    tracks_changed(request_id),
                    failed(request_id, REMOVE_TRACK_FAILED),
                )]
            },

            PlaylistAction::ReorderTrack {
                request_id,
                id,
                music_id,
                new_position,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move {
                        let playlist = api.playlists().reorder(id, music_id, new_position).await?;
                        let tracks = api.playlists().tracks(id).await?;
                        Ok::<_, ApiError>((playlist, tracks))
                    },
                    tracks_changed(request_id),
                    failed(request_id, REORDER_FAILED),
                )]
            },

            PlaylistAction::Duplicate {
                request_id,
                id,
                draft,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.playlists().duplicate(id, &draft).await },
                    move |duplicated| PlaylistAction::Duplicated {
                        request_id,
                        copy: duplicated.playlist,
                        original: duplicated.original_playlist,
                    },
                    failed(request_id, DUPLICATE_FAILED),
                )]
            },

            PlaylistAction::RecordPlay { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.playlists().play(id).await },
                    move |play_count| PlaylistAction::PlayRecorded {
                        request_id,
                        id,
                        play_count,
                    },
                    failed(request_id, PLAY_FAILED),
                )]
            },

            PlaylistAction::RefreshDuration { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.playlists().refresh_duration(id).await },
                    move |duration| PlaylistAction::DurationRefreshed {
                        request_id,
                        id,
                        duration,
                    },
                    failed(request_id, DURATION_FAILED),
                )]
            },

            PlaylistAction::ClearCurrent => {
                state.current = None;
                smallvec![Effect::None]
            },

            PlaylistAction::ClearError => {
                state.clear_error();
                smallvec![Effect::None]
            },

            PlaylistAction::Reset => {
                *state = PlaylistState {
                    pending: state.pending,
                    ..PlaylistState::default()
                };
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Events
            // ═══════════════════════════════════════════════════════════
            PlaylistAction::PlaylistsLoaded { query, page, .. } => {
                state.finish_request();
                state.playlists = page.items.iter().map(summary).collect();
                state.total = page.total;
                state.has_next = page.has_next;
                state.query = query;
                state.clear_error();
                smallvec![Effect::None]
            },

            PlaylistAction::PlaylistLoaded { playlist, .. } => {
                state.finish_request();
                list::replace(&mut state.playlists, summary(&playlist));
                state.current = Some(playlist);
                state.clear_error();
                smallvec![Effect::None]
            },

            PlaylistAction::PlaylistCreated { playlist, .. } => {
                state.finish_request();
                list::prepend(&mut state.playlists, summary(&playlist));
                state.total += 1;
                state.clear_error();
                smallvec![Effect::None]
            },

            PlaylistAction::PlaylistUpdated { playlist, .. } => {
                state.finish_request();
                state.absorb(playlist);
                state.clear_error();
                smallvec![Effect::None]
            },

            PlaylistAction::PlaylistDeleted { id, .. } => {
                state.finish_request();
                if list::remove(&mut state.playlists, id) {
                    state.total = state.total.saturating_sub(1);
                }
                list::forget_current(&mut state.current, id);
                state.clear_error();
                smallvec![Effect::None]
            },

            PlaylistAction::TracksLoaded { id, tracks, .. } => {
                state.finish_request();
                if let Some(current) = state.current.as_mut().filter(|c| c.id == id) {
                    current.tracks = Some(tracks);
                }
                state.clear_error();
                smallvec![Effect::None]
            },

            PlaylistAction::TracksChanged {
                playlist, tracks, ..
            } => {
                state.finish_request();
                state.absorb(Playlist {
                    tracks: Some(tracks),
                    ..playlist
                });
                state.clear_error();
                smallvec![Effect::None]
            },

            PlaylistAction::Duplicated { copy, original, .. } => {
                state.finish_request();
                state.absorb(original);
                list::prepend(&mut state.playlists, summary(&copy));
                state.total += 1;
                state.clear_error();
                smallvec![Effect::None]
            },

            PlaylistAction::PlayRecorded { id, play_count, .. } => {
                state.finish_request();
                state.patch(id, |playlist| playlist.play_count = play_count);
                smallvec![Effect::None]
            },

            PlaylistAction::DurationRefreshed { id, duration, .. } => {
                state.finish_request();
                state.patch(id, |playlist| {
                    playlist.total_duration = duration.total_duration;
                    playlist
                        .total_duration_formatted
                        .clone_from(&duration.total_duration_formatted);
                });
                state.clear_error();
                smallvec![Effect::None]
            },

            PlaylistAction::Failed {
                error, fallback, ..
            } => {
                state.finish_request();
                tracing::warn!(%error, "{fallback}");
                state.record_error(error.display_message(fallback));
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cadence_api::{ApiClient, ApiConfig, MemoryTokenStorage, PlaylistDuration, Track};
    use cadence_testing::{assertions, ReducerTest};
    use std::sync::Arc;

    fn test_env() -> StoreEnvironment {
        let api = ApiClient::new(
            ApiConfig::new("http://127.0.0.1:9"),
            Arc::new(MemoryTokenStorage::new()),
        )
        .unwrap();
        StoreEnvironment::new(api)
    }

    fn playlist(id: i64, name: &str) -> Playlist {
        Playlist {
            id,
            name: name.into(),
            ..Playlist::default()
        }
    }

    fn track(id: i64) -> Track {
        Track {
            id,
            ..Track::default()
        }
    }

    #[test]
    fn test_add_track_starts_a_request() {
        ReducerTest::new(PlaylistReducer::new())
            .with_env(test_env())
            .given_state(PlaylistState::default())
            .when_action(PlaylistAction::AddTrack {
                request_id: RequestId::new(),
                id: 1,
                music_id: 4,
                position: None,
            })
            .then_state(|state| assert!(state.is_loading()))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_track_change_replaces_current_tracks() {
        ReducerTest::new(PlaylistReducer::new())
            .with_env(test_env())
            .given_state(PlaylistState {
                playlists: vec![playlist(1, "Road trip")],
                current: Some(Playlist {
                    tracks: Some(vec![track(1), track(2)]),
                    ..playlist(1, "Road trip")
                }),
                pending: 1,
                ..PlaylistState::default()
            })
            .when_action(PlaylistAction::TracksChanged {
                request_id: RequestId::new(),
                playlist: Playlist {
                    tracks_count: 2,
                    ..playlist(1, "Road trip")
                },
                tracks: vec![track(2), track(1)],
                added: None,
            })
            .then_state(|state| {
                let ids: Vec<_> = state.current_tracks().iter().map(|t| t.id).collect();
                assert_eq!(ids, [2, 1]);
                assert!(state.get(1).unwrap().tracks.is_none());
                assert!(!state.is_loading());
            })
            .run();
    }

    #[test]
    fn test_duplicate_goes_first() {
        ReducerTest::new(PlaylistReducer::new())
            .with_env(test_env())
            .given_state(PlaylistState {
                playlists: vec![playlist(1, "Mix"), playlist(2, "Other")],
                total: 2,
                pending: 1,
                ..PlaylistState::default()
            })
            .when_action(PlaylistAction::Duplicated {
                request_id: RequestId::new(),
                copy: Playlist {
                    tracks: Some(vec![track(1)]),
                    ..playlist(3, "Mix - Cópia")
                },
                original: playlist(1, "Mix"),
            })
            .then_state(|state| {
                let ids: Vec<_> = state.playlists.iter().map(|p| p.id).collect();
                assert_eq!(ids, [3, 1, 2]);
                assert!(state.playlists[0].tracks.is_none());
                assert_eq!(state.total, 3);
            })
            .run();
    }

    #[test]
    fn test_duration_refresh_patches_cached_copies() {
        ReducerTest::new(PlaylistReducer::new())
            .with_env(test_env())
            .given_state(PlaylistState {
                playlists: vec![playlist(1, "Mix")],
                current: Some(playlist(1, "Mix")),
                pending: 1,
                ..PlaylistState::default()
            })
            .when_action(PlaylistAction::DurationRefreshed {
                request_id: RequestId::new(),
                id: 1,
                duration: PlaylistDuration {
                    total_duration: 407,
                    total_duration_formatted: Some("6:47".into()),
                },
            })
            .then_state(|state| {
                assert_eq!(state.get(1).unwrap().total_duration, 407);
                let current = state.current.as_ref().unwrap();
                assert_eq!(current.total_duration_formatted.as_deref(), Some("6:47"));
            })
            .run();
    }

    #[test]
    fn test_failure_keeps_playlists() {
        ReducerTest::new(PlaylistReducer::new())
            .with_env(test_env())
            .given_state(PlaylistState {
                playlists: vec![playlist(1, "Mix")],
                pending: 1,
                ..PlaylistState::default()
            })
            .when_action(PlaylistAction::Failed {
                request_id: RequestId::new(),
                error: DomainError::Api(ApiError::from_status(409, None)),
                fallback: ADD_TRACK_FAILED,
            })
            .then_state(|state| {
                assert_eq!(state.playlists.len(), 1);
                assert_eq!(state.last_error(), Some(ADD_TRACK_FAILED));
                assert!(!state.is_loading());
            })
            .run();
    }
}
