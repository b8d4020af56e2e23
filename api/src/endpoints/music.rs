//! `/music`: the track library, external catalog search, uploads and streaming.

use super::{Ack, PlayCount};
use crate::{
    client::{Body, RequestOptions},
    error::ApiError,
    types::{CatalogEntry, EntityId, Page, Track},
    ApiClient, Result,
};
use async_stream::stream;
use futures::stream::{Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Audio bytes as they arrive from `/music/:id/stream`.
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>>> + Send>>;

/// Filters of the library listing. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct MusicQuery {
    pub page: Option<u64>,
    /// Server default 20, max 100
    pub per_page: Option<u64>,
    /// Matches title, artist or album
    pub search: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub is_local: Option<bool>,
    pub uploader_id: Option<EntityId>,
}

/// Editable track metadata. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct TrackUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

/// A local audio file to upload.
///
/// Metadata fields override what the backend extracts from the file tags.
#[derive(Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub track_number: Option<u32>,
    /// Server default `true`
    pub is_public: Option<bool>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .field("title", &self.title)
            .field("artist", &self.artist)
            .finish_non_exhaustive()
    }
}

impl Upload {
    /// Upload `bytes` under `file_name` with tag-derived metadata.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            ..Self::default()
        }
    }

    /// Build the `multipart/form-data` body: the `file` part plus every set
    /// metadata field as a text part.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the file name yields an
    /// invalid MIME part.
    pub fn into_form(self) -> Result<Form> {
        let mime = mime_for(&self.file_name);
        let file = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(mime)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        let mut form = Form::new().part("file", file);
        let fields = [
            ("title", self.title),
            ("artist", self.artist),
            ("album", self.album),
            ("genre", self.genre),
            ("year", self.year.map(|y| y.to_string())),
            ("track_number", self.track_number.map(|n| n.to_string())),
            ("is_public", self.is_public.map(|p| p.to_string())),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                form = form.text(name, value);
            }
        }
        Ok(form)
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct MusicPage {
    music: Vec<Track>,
    total: u64,
    pages: u64,
    current_page: u64,
    per_page: u64,
    has_next: bool,
    has_prev: bool,
}

impl Default for MusicPage {
    fn default() -> Self {
        Self {
            music: Vec::new(),
            total: 0,
            pages: 0,
            current_page: 1,
            per_page: 20,
            has_next: false,
            has_prev: false,
        }
    }
}

#[derive(Deserialize)]
struct TrackEnvelope {
    music: Track,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SearchEnvelope {
    results: Vec<CatalogEntry>,
}

#[derive(Serialize)]
struct ImportRequest<'a> {
    spotify_id: &'a str,
}

/// Handle on the `/music` resource.
#[derive(Debug, Clone, Copy)]
pub struct MusicApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl MusicApi<'_> {
    /// `GET /music`, newest first.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn list(&self, query: &MusicQuery) -> Result<Page<Track>> {
        let options = RequestOptions::new()
            .query_opt("page", query.page)
            .query_opt("per_page", query.per_page)
            .query_opt("search", query.search.as_deref())
            .query_opt("genre", query.genre.as_deref())
            .query_opt("year", query.year)
            .query_opt("is_local", query.is_local)
            .query_opt("uploader_id", query.uploader_id);
        let page: MusicPage = self.client.get("/music", options).await?;

        Ok(Page {
            items: page.music,
            total: page.total,
            pages: page.pages,
            current_page: page.current_page,
            per_page: page.per_page,
            has_next: page.has_next,
            has_prev: page.has_prev,
        })
    }

    /// `GET /music/:id`
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn get(&self, id: EntityId) -> Result<Track> {
        let envelope: TrackEnvelope = self
            .client
            .get(&format!("/music/{id}"), RequestOptions::new())
            .await?;
        Ok(envelope.music)
    }

    /// `PUT /music/:id`, returning the canonical track.
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn update(&self, id: EntityId, update: &TrackUpdate) -> Result<Track> {
        let envelope: TrackEnvelope = self.client.put(&format!("/music/{id}"), update).await?;
        Ok(envelope.music)
    }

    /// `DELETE /music/:id`
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn delete(&self, id: EntityId) -> Result<Ack> {
        self.client.delete(&format!("/music/{id}")).await
    }

    /// `GET /music/search?q=` against the external catalog.
    ///
    /// # Errors
    ///
    /// `Rejected` (400) for a blank query.
    pub async fn search(&self, query: &str, limit: Option<u32>) -> Result<Vec<CatalogEntry>> {
        let options = RequestOptions::new()
            .query("q", query)
            .query_opt("limit", limit);
        let envelope: SearchEnvelope = self.client.get("/music/search", options).await?;
        Ok(envelope.results)
    }

    /// `POST /music/import`. Importing an entry already in the library
    /// returns the existing track.
    ///
    /// # Errors
    ///
    /// `Rejected` (400 / 404).
    pub async fn import(&self, spotify_id: &str) -> Result<Track> {
        let envelope: TrackEnvelope = self
            .client
            .post("/music/import", &ImportRequest { spotify_id })
            .await?;
        Ok(envelope.music)
    }

    /// `POST /music/upload` (multipart).
    ///
    /// # Errors
    ///
    /// `Rejected` (400) for a missing or disallowed file.
    pub async fn upload(&self, upload: Upload) -> Result<Track> {
        let envelope: TrackEnvelope = self
            .client
            .send_json(
                Method::POST,
                "/music/upload",
                Body::Multipart(upload.into_form()?),
                RequestOptions::new(),
            )
            .await?;
        Ok(envelope.music)
    }

    /// `GET /music/:id/stream`: the audio file, chunk by chunk.
    ///
    /// The stream ends after the first transport error it yields.
    ///
    /// # Errors
    ///
    /// `Rejected` (400 / 403 / 404) before any byte is streamed.
    pub async fn stream(&self, id: EntityId) -> Result<AudioStream> {
        let response = self
            .client
            .request(
                Method::GET,
                &format!("/music/{id}/stream"),
                Body::Empty,
                RequestOptions::new(),
            )
            .await?;

        let mut chunks = response.bytes_stream();
        Ok(Box::pin(stream! {
            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(bytes) => yield Ok(bytes.to_vec()),
                    Err(e) => {
                        yield Err(ApiError::from(e));
                        break;
                    }
                }
            }
        }))
    }

    /// `POST /music/:id/play`, returning the new play count.
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn play(&self, id: EntityId) -> Result<u64> {
        let count: PlayCount = self
            .client
            .post(&format!("/music/{id}/play"), &serde_json::json!({}))
            .await?;
        Ok(count.play_count)
    }
}
