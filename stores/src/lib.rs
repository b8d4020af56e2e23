//! # Cadence Stores
//!
//! Client-side collections of the Cadence domains: music, playlists, tasks
//! and task lists.
//!
//! Each domain is a reducer over its own state, run by a
//! [`Store`](cadence_runtime::Store), behind a façade with one async method
//! per operation. Every mutation follows the same contract:
//!
//! - on success the loaded list is patched from the backend's canonical
//!   answer;
//! - on failure the list is left alone, a display message is recorded
//!   (the backend's `error` text, else a per-operation default) and the
//!   error is returned.
//!
//! Loading is an in-flight counter, so overlapping calls never clear each
//! other's indicator.
//!
//! ## Example
//!
//! ```ignore
//! use cadence_api::{ApiClient, TaskDraft, TaskQuery};
//! use cadence_stores::{StoreConfig, TaskStore};
//!
//! let tasks = TaskStore::new(api.clone(), StoreConfig::default());
//! tasks.fetch_all(TaskQuery::default()).await?;
//! let task = tasks.create(TaskDraft::titled("Write report")).await?;
//! assert_eq!(tasks.tasks().await[0].id, task.id);
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod list;
pub mod music;
pub mod playlists;
pub mod task_lists;
pub mod tasks;

mod request;

pub use config::{FallbackPolicy, StoreConfig};
pub use environment::StoreEnvironment;
pub use error::{DomainError, Result};
pub use music::{MusicAction, MusicState, MusicStore};
pub use playlists::{PlaylistAction, PlaylistState, PlaylistStore};
pub use task_lists::{TaskListAction, TaskListState, TaskListStore};
pub use tasks::{TaskAction, TaskState, TaskStore};
