//! `/playlists`: playlists and their track sub-resource.

use super::{Ack, PlayCount};
use crate::{
    client::RequestOptions,
    types::{EntityId, Page, Playlist, Track},
    ApiClient, Result,
};
use serde::{Deserialize, Serialize};

/// Filters of the playlist listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct PlaylistQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Matches name or description
    pub search: Option<String>,
    pub owner_id: Option<EntityId>,
    pub is_public: Option<bool>,
}

/// Playlist fields for create and update. Unset fields are not sent;
/// `name` is required on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct PlaylistDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_collaborative: Option<bool>,
}

impl PlaylistDraft {
    /// A draft carrying just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Result of `POST /playlists/:id/tracks`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackAdded {
    /// The playlist after insertion
    pub playlist: Playlist,
    /// The inserted track
    pub music: Track,
}

/// Result of `POST /playlists/:id/duplicate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Duplicated {
    /// The copy, tracks embedded
    pub playlist: Playlist,
    /// The source playlist
    pub original_playlist: Playlist,
}

/// Result of `POST /playlists/:id/refresh-duration`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct PlaylistDuration {
    /// Seconds
    pub total_duration: u64,
    /// `H:MM:SS` / `M:SS`
    pub total_duration_formatted: Option<String>,
}

#[derive(Deserialize)]
#[serde(default)]
struct PlaylistPage {
    playlists: Vec<Playlist>,
    total: u64,
    pages: u64,
    current_page: u64,
    per_page: u64,
    has_next: bool,
    has_prev: bool,
}

impl Default for PlaylistPage {
    fn default() -> Self {
        Self {
            playlists: Vec::new(),
            total: 0,
            pages: 0,
            current_page: 1,
            per_page: 20,
            has_next: false,
            has_prev: false,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TrackListing {
    tracks: Vec<Track>,
}

#[derive(Deserialize)]
struct PlaylistEnvelope {
    playlist: Playlist,
}

#[derive(Serialize)]
struct AddTrack {
    music_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<u32>,
}

#[derive(Serialize)]
struct Reorder {
    music_id: EntityId,
    new_position: u32,
}

/// Handle on the `/playlists` resource.
#[derive(Debug, Clone, Copy)]
pub struct PlaylistsApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl PlaylistsApi<'_> {
    /// `GET /playlists`: the caller's playlists plus public ones, newest first.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    pub async fn list(&self, query: &PlaylistQuery) -> Result<Page<Playlist>> {
        let options = RequestOptions::new()
            .query_opt("page", query.page)
            .query_opt("per_page", query.per_page)
            .query_opt("search", query.search.as_deref())
            .query_opt("owner_id", query.owner_id)
            .query_opt("is_public", query.is_public);
        let page: PlaylistPage = self.client.get("/playlists", options).await?;

        Ok(Page {
            items: page.playlists,
            total: page.total,
            pages: page.pages,
            current_page: page.current_page,
            per_page: page.per_page,
            has_next: page.has_next,
            has_prev: page.has_prev,
        })
    }

    /// `GET /playlists/:id`, optionally embedding tracks.
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn get(&self, id: EntityId, include_tracks: bool) -> Result<Playlist> {
        let envelope: PlaylistEnvelope = self
            .client
            .get(
                &format!("/playlists/{id}"),
                RequestOptions::new().query("include_tracks", include_tracks),
            )
            .await?;
        Ok(envelope.playlist)
    }

    /// `POST /playlists`
    ///
    /// # Errors
    ///
    /// `Rejected` (400) without a name.
    pub async fn create(&self, draft: &PlaylistDraft) -> Result<Playlist> {
        let envelope: PlaylistEnvelope = self.client.post("/playlists", draft).await?;
        Ok(envelope.playlist)
    }

    /// `PUT /playlists/:id`
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn update(&self, id: EntityId, draft: &PlaylistDraft) -> Result<Playlist> {
        let envelope: PlaylistEnvelope =
            self.client.put(&format!("/playlists/{id}"), draft).await?;
        Ok(envelope.playlist)
    }

    /// `DELETE /playlists/:id`
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn delete(&self, id: EntityId) -> Result<Ack> {
        self.client.delete(&format!("/playlists/{id}")).await
    }

    /// `GET /playlists/:id/tracks`, in playlist order.
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn tracks(&self, id: EntityId) -> Result<Vec<Track>> {
        let listing: TrackListing = self
            .client
            .get(&format!("/playlists/{id}/tracks"), RequestOptions::new())
            .await?;
        Ok(listing.tracks)
    }

    /// `POST /playlists/:id/tracks`. `position` defaults to the end.
    ///
    /// # Errors
    ///
    /// `Rejected` (409) if the track is already in the playlist.
    pub async fn add_track(
        &self,
        id: EntityId,
        music_id: EntityId,
        position: Option<u32>,
    ) -> Result<TrackAdded> {
        self.client
            .post(
                &format!("/playlists/{id}/tracks"),
                &AddTrack { music_id, position },
            )
            .await
    }

    /// `DELETE /playlists/:id/tracks/:music_id`
    ///
    /// # Errors
    ///
    /// `Rejected` (404) if the track is not in the playlist.
    pub async fn remove_track(&self, id: EntityId, music_id: EntityId) -> Result<Playlist> {
        let envelope: PlaylistEnvelope = self
            .client
            .delete(&format!("/playlists/{id}/tracks/{music_id}"))
            .await?;
        Ok(envelope.playlist)
    }

    /// `POST /playlists/:id/tracks/reorder`
    ///
    /// # Errors
    ///
    /// `Rejected` (400 / 403 / 404).
    pub async fn reorder(
        &self,
        id: EntityId,
        music_id: EntityId,
        new_position: u32,
    ) -> Result<Playlist> {
        let envelope: PlaylistEnvelope = self
            .client
            .post(
                &format!("/playlists/{id}/tracks/reorder"),
                &Reorder {
                    music_id,
                    new_position,
                },
            )
            .await?;
        Ok(envelope.playlist)
    }

    /// `POST /playlists/:id/duplicate`. An empty draft copies the source
    /// with the name "`<name>` - Cópia".
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn duplicate(&self, id: EntityId, draft: &PlaylistDraft) -> Result<Duplicated> {
        self.client
            .post(&format!("/playlists/{id}/duplicate"), draft)
            .await
    }

    /// `POST /playlists/:id/play`, returning the new play count.
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn play(&self, id: EntityId) -> Result<u64> {
        let count: PlayCount = self
            .client
            .post(&format!("/playlists/{id}/play"), &serde_json::json!({}))
            .await?;
        Ok(count.play_count)
    }

    /// `POST /playlists/:id/refresh-duration`
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn refresh_duration(&self, id: EntityId) -> Result<PlaylistDuration> {
        self.client
            .post(
                &format!("/playlists/{id}/refresh-duration"),
                &serde_json::json!({}),
            )
            .await
    }
}
