//! Music store reducer.

use super::actions::MusicAction;
use super::fixtures;
use super::state::MusicState;
use crate::config::FallbackPolicy;
use crate::environment::StoreEnvironment;
use crate::error::DomainError;
use crate::list;
use crate::request::remote;
use cadence_api::ApiError;
use cadence_core::{action::RequestId, effect::Effect, reducer::Reducer, smallvec, SmallVec};

const FETCH_FAILED: &str = "Could not load music";
const FETCH_ONE_FAILED: &str = "Could not load track";
const UPDATE_FAILED: &str = "Could not update track";
const DELETE_FAILED: &str = "Could not delete track";
const SEARCH_FAILED: &str = "Search failed";
const IMPORT_FAILED: &str = "Could not add track to the library";
const UPLOAD_FAILED: &str = "Upload failed";
const PLAY_FAILED: &str = "Could not record play";

/// Reducer of the music store.
#[derive(Debug, Clone, Copy, Default)]
pub struct MusicReducer;

impl MusicReducer {
    /// Create a new music reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn failed(
    request_id: RequestId,
    fallback: &'static str,
) -> impl Fn(DomainError) -> MusicAction + Clone + Send + 'static {
    move |error| MusicAction::Failed {
        request_id,
        error,
        fallback,
    }
}

fn serves_fixtures(policy: FallbackPolicy, error: &ApiError) -> bool {
    if policy == FallbackPolicy::Fixtures {
        tracing::warn!(%error, "Catalog unavailable, serving demo tracks");
        true
    } else {
        false
    }
}

impl Reducer for MusicReducer {
    type State = MusicState;
    type Action = MusicAction;
    type Environment = StoreEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let api = env.api.clone();
        let policy = env.fallback;

        match action {
            // ═══════════════════════════════════════════════════════════
            // Commands
            // ═══════════════════════════════════════════════════════════
            MusicAction::FetchTracks { request_id, query } => {
                state.begin_request();
                let on_failure = failed(request_id, FETCH_FAILED);
                smallvec![Effect::guarded(
                    async move {
                        match api.music().list(&query).await {
                            Ok(page) => MusicAction::TracksLoaded {
                                request_id,
                                query,
                                page,
                                from_fixtures: false,
                            },
                            Err(error) if serves_fixtures(policy, &error) => {
                                MusicAction::TracksLoaded {
                                    request_id,
                                    query,
                                    page: fixtures::page(),
                                    from_fixtures: true,
                                }
                            },
                            Err(error) => on_failure(error.into()),
                        }
                    },
                    move || MusicAction::Failed {
                        request_id,
                        error: DomainError::Interrupted,
                        fallback: FETCH_FAILED,
                    },
                )]
            },

            MusicAction::FetchTrack { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.music().get(id).await },
                    move |track| MusicAction::TrackLoaded { request_id, track },
                    failed(request_id, FETCH_ONE_FAILED),
                )]
            },

            MusicAction::UpdateTrack {
                request_id,
                id,
                update,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.music().update(id, &update).await },
                    move |track| MusicAction::TrackUpdated { request_id, track },
                    failed(request_id, UPDATE_FAILED),
                )]
            },

            MusicAction::DeleteTrack { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.music().delete(id).await },
                    move |_| MusicAction::TrackDeleted { request_id, id },
                    failed(request_id, DELETE_FAILED),
                )]
            },

            MusicAction::Search {
                request_id,
                query,
                limit,
            } => {
                state.begin_request();
                let query = query.trim().to_string();
                if query.is_empty() {
                    return smallvec![Effect::task(async move {
                        MusicAction::SearchLoaded {
                            request_id,
                            results: Vec::new(),
                            from_fixtures: false,
                        }
                    })];
                }
                let on_failure = failed(request_id, SEARCH_FAILED);
                smallvec![Effect::guarded(
                    async move {
                        match api.music().search(&query, limit).await {
                            Ok(results) => MusicAction::SearchLoaded {
                                request_id,
                                results,
                                from_fixtures: false,
                            },
                            Err(error) if serves_fixtures(policy, &error) => {
                                MusicAction::SearchLoaded {
                                    request_id,
                                    results: fixtures::search_results(&query),
                                    from_fixtures: true,
                                }
                            },
                            Err(error) => on_failure(error.into()),
                        }
                    },
                    move || MusicAction::Failed {
                        request_id,
                        error: DomainError::Interrupted,
                        fallback: SEARCH_FAILED,
                    },
                )]
            },

            MusicAction::Import {
                request_id,
                spotify_id,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.music().import(&spotify_id).await },
                    move |track| MusicAction::TrackAdded { request_id, track },
                    failed(request_id, IMPORT_FAILED),
                )]
            },

            MusicAction::UploadTrack { request_id, upload } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.music().upload(upload).await },
                    move |track| MusicAction::TrackAdded { request_id, track },
                    failed(request_id, UPLOAD_FAILED),
                )]
            },

            MusicAction::RecordPlay { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.music().play(id).await },
                    move |play_count| MusicAction::PlayRecorded {
                        request_id,
                        id,
                        play_count,
                    },
                    failed(request_id, PLAY_FAILED),
                )]
            },

            MusicAction::ToggleFavorite { id } => {
                if !state.favorites.remove(&id) {
                    state.favorites.insert(id);
                }
                smallvec![Effect::None]
            },

            MusicAction::Play { track } => {
                tracing::debug!(id = track.id, "Now playing");
                state.now_playing = Some(track);
                smallvec![Effect::None]
            },

            MusicAction::PlayNext => {
                if let Some(next) = state.next_track().cloned() {
                    state.now_playing = Some(next);
                }
                smallvec![Effect::None]
            },

            MusicAction::PlayPrevious => {
                if let Some(previous) = state.previous_track().cloned() {
                    state.now_playing = Some(previous);
                }
                smallvec![Effect::None]
            },

            MusicAction::Stop => {
                state.now_playing = None;
                smallvec![Effect::None]
            },

            MusicAction::ClearSearch => {
                state.search_results.clear();
                smallvec![Effect::None]
            },

            MusicAction::ClearCurrent => {
                state.current = None;
                smallvec![Effect::None]
            },

            MusicAction::ClearError => {
                state.clear_error();
                smallvec![Effect::None]
            },

            MusicAction::Reset => {
                *state = MusicState {
                    pending: state.pending,
                    ..MusicState::default()
                };
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Events
            // ═══════════════════════════════════════════════════════════
            MusicAction::TracksLoaded {
                query,
                page,
                from_fixtures,
                ..
            } => {
                state.finish_request();
                if from_fixtures && state.favorites.is_empty() {
                    state.favorites.extend(fixtures::FAVORITES);
                }
                state.tracks = page.items;
                state.total = page.total;
                state.has_next = page.has_next;
                state.query = query;
                state.from_fixtures = from_fixtures;
                state.clear_error();
                smallvec![Effect::None]
            },

            MusicAction::TrackLoaded { track, .. } => {
                state.finish_request();
                list::replace(&mut state.tracks, track.clone());
                state.current = Some(track);
                state.clear_error();
                smallvec![Effect::None]
            },

            MusicAction::TrackAdded { track, .. } => {
                state.finish_request();
                list::prepend(&mut state.tracks, track);
                state.total += 1;
                state.clear_error();
                smallvec![Effect::None]
            },

            MusicAction::TrackUpdated { track, .. } => {
                state.finish_request();
                list::replace_current(&mut state.current, &track);
                list::replace_current(&mut state.now_playing, &track);
                list::replace(&mut state.tracks, track);
                state.clear_error();
                smallvec![Effect::None]
            },

            MusicAction::TrackDeleted { id, .. } => {
                state.finish_request();
                if list::remove(&mut state.tracks, id) {
                    state.total = state.total.saturating_sub(1);
                }
                list::forget_current(&mut state.current, id);
                list::forget_current(&mut state.now_playing, id);
                state.favorites.remove(&id);
                state.clear_error();
                smallvec![Effect::None]
            },

            MusicAction::SearchLoaded { results, .. } => {
                state.finish_request();
                state.search_results = results;
                state.clear_error();
                smallvec![Effect::None]
            },

            MusicAction::PlayRecorded { id, play_count, .. } => {
                state.finish_request();
                for track in state
                    .tracks
                    .iter_mut()
                    .chain(state.current.as_mut())
                    .chain(state.now_playing.as_mut())
                    .filter(|track| track.id == id)
                {
                    track.play_count = play_count;
                }
                smallvec![Effect::None]
            },

            MusicAction::Failed {
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
