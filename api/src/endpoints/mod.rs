//! Typed bindings of the REST resources.
//!
//! Each resource is reached through a borrowed handle on [`ApiClient`]:
//!
//! ```no_run
//! # async fn demo(client: cadence_api::ApiClient) -> cadence_api::Result<()> {
//! let tasks = client.tasks().list(&Default::default()).await?;
//! let lists = client.task_lists().list(false).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Handles unwrap the response envelope and return the primary payload.

pub mod auth;
pub mod music;
pub mod playlists;
pub mod task_lists;
pub mod tasks;
pub mod users;

use crate::ApiClient;
use serde::{Deserialize, Serialize};

/// Envelope of calls whose only payload is a confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ack {
    /// Human-readable confirmation
    pub message: Option<String>,
}

/// Envelope of the play-count endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayCount {
    /// Play count after the increment
    pub play_count: u64,
}

impl ApiClient {
    /// `/auth` endpoints.
    #[must_use]
    pub const fn auth(&self) -> auth::AuthApi<'_> {
        auth::AuthApi { client: self }
    }

    /// `/users` endpoints.
    #[must_use]
    pub const fn users(&self) -> users::UsersApi<'_> {
        users::UsersApi { client: self }
    }

    /// `/music` endpoints.
    #[must_use]
    pub const fn music(&self) -> music::MusicApi<'_> {
        music::MusicApi { client: self }
    }

    /// `/playlists` endpoints.
    #[must_use]
    pub const fn playlists(&self) -> playlists::PlaylistsApi<'_> {
        playlists::PlaylistsApi { client: self }
    }

    /// `/task-lists` endpoints.
    #[must_use]
    pub const fn task_lists(&self) -> task_lists::TaskListsApi<'_> {
        task_lists::TaskListsApi { client: self }
    }

    /// `/tasks` endpoints.
    #[must_use]
    pub const fn tasks(&self) -> tasks::TasksApi<'_> {
        tasks::TasksApi { client: self }
    }
}
