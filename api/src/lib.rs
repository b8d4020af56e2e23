//! # Cadence REST client
//!
//! Authenticated access to the Cadence music-library and task-management
//! backend.
//!
//! ## Example
//!
//! ```no_run
//! use cadence_api::{ApiClient, ApiConfig, MemoryTokenStorage};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ApiConfig::from_env(), Arc::new(MemoryTokenStorage::new()))?;
//!
//!     let page = client.music().list(&Default::default()).await?;
//!     println!("{} tracks", page.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Behaviour
//!
//! - The bearer token is read from [`TokenStorage`] on every request
//! - A 401 runs the installed [`UnauthorizedHook`] and publishes a
//!   [`Redirect`] to the login route when a session was torn down
//! - Every other failure is returned as a classified [`ApiError`]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod storage;
pub mod types;

// Re-export main types for convenience
pub use client::{ApiClient, Body, Credential, Redirect, RequestOptions, UnauthorizedHook};
pub use config::ApiConfig;
pub use endpoints::{
    auth::{AuthGrant, Credentials, Registration},
    music::{AudioStream, MusicQuery, TrackUpdate, Upload},
    playlists::{Duplicated, PlaylistDraft, PlaylistDuration, PlaylistQuery, TrackAdded},
    task_lists::TaskListDraft,
    tasks::{BulkOperation, TaskDraft, TaskQuery},
    users::{ProfileUpdate, UserQuery},
    Ack,
};
pub use error::{ApiError, StorageError};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use types::{
    CatalogEntry, Dashboard, EntityId, Page, Playlist, Priority, PriorityInfo, Profile, Task,
    TaskList, TaskListStats, Track,
};

/// Result type for REST calls
pub type Result<T> = std::result::Result<T, ApiError>;
