//! Entity types exchanged with the REST backend.
//!
//! Timestamps are naive: the backend serializes them without an offset.
//! Every struct is `#[serde(default)]` so partial payloads (as returned by
//! some endpoints and by test doubles) still decode.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of any backend entity.
pub type EntityId = i64;

// ═══════════════════════════════════════════════════════════
// Users
// ═══════════════════════════════════════════════════════════

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// User id
    pub id: EntityId,
    /// Login name
    pub username: String,
    /// E-mail address
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Avatar image
    pub avatar_url: Option<String>,
    /// Administrator capability
    pub is_admin: bool,
    /// Deactivated accounts cannot log in
    pub is_active: bool,
    /// Account creation
    pub created_at: Option<NaiveDateTime>,
    /// Last successful login
    pub last_login: Option<NaiveDateTime>,
}

impl Profile {
    /// "First Last", trimmed when either part is empty.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// ═══════════════════════════════════════════════════════════
// Music
// ═══════════════════════════════════════════════════════════

/// A track in the music catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Track {
    pub id: EntityId,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    /// Length in seconds
    pub duration: Option<u32>,
    pub duration_formatted: Option<String>,
    pub track_number: Option<u32>,
    pub spotify_id: Option<String>,
    pub external_url: Option<String>,
    pub preview_url: Option<String>,
    pub cover_image_url: Option<String>,
    /// Uploaded file rather than an imported catalog entry
    pub is_local: bool,
    pub is_public: bool,
    pub play_count: u64,
    pub uploaded_by_id: Option<EntityId>,
    /// Uploader's username
    pub uploader: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub playlists_count: u64,
}

/// An entry of the external catalog search, importable into the library.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct CatalogEntry {
    pub spotify_id: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<u32>,
    pub track_number: Option<u32>,
    pub external_url: Option<String>,
    pub preview_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub genre: Option<String>,
    pub popularity: Option<u32>,
    pub explicit: bool,
}

// ═══════════════════════════════════════════════════════════
// Playlists
// ═══════════════════════════════════════════════════════════

/// A playlist. `tracks` is only present on endpoints that embed them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Playlist {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_public: bool,
    pub is_collaborative: bool,
    /// Sum of track durations in seconds
    pub total_duration: u64,
    pub total_duration_formatted: Option<String>,
    pub play_count: u64,
    pub tracks_count: u64,
    pub owner_id: Option<EntityId>,
    /// Owner's username
    pub owner: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
}

// ═══════════════════════════════════════════════════════════
// Tasks
// ═══════════════════════════════════════════════════════════

/// Task priority, ordered from least to most pressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Every priority, least pressing first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata for a priority, as served by `/tasks/priorities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityInfo {
    /// Priority value
    pub value: Priority,
    /// Human label
    pub label: String,
    /// Hex colour
    pub color: String,
}

impl PriorityInfo {
    /// The built-in table, used when the backend cannot be reached.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        [
            (Priority::Low, "Baixa", "#4caf50"),
            (Priority::Medium, "Média", "#ff9800"),
            (Priority::High, "Alta", "#f44336"),
            (Priority::Urgent, "Urgente", "#9c27b0"),
        ]
        .into_iter()
        .map(|(value, label, color)| Self {
            value,
            label: label.to_string(),
            color: color.to_string(),
        })
        .collect()
    }
}

/// A task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub task_list_id: Option<EntityId>,
    pub user_id: Option<EntityId>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub task_list_title: Option<String>,
    pub is_overdue: bool,
    pub days_until_due: Option<i64>,
}

/// A task list. `tasks` is only present on the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct TaskList {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub user_id: Option<EntityId>,
    pub is_archived: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub task_count: u64,
    pub completed_count: u64,
    pub pending_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

/// Per-priority counters of a single task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct PriorityCounts {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
}

/// Statistics of one task list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct TaskListStats {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub pending_tasks: u64,
    pub overdue_tasks: u64,
    /// Percentage, two decimals
    pub completion_rate: f64,
    pub priority_breakdown: std::collections::BTreeMap<Priority, PriorityCounts>,
}

/// Account-wide task statistics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct DashboardStats {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub pending_tasks: u64,
    pub overdue_tasks: u64,
    /// Percentage, two decimals
    pub completion_rate: f64,
    /// Pending tasks per priority
    pub priority_breakdown: std::collections::BTreeMap<Priority, u64>,
    pub recent_tasks_count: u64,
    pub upcoming_tasks_count: u64,
}

/// Dashboard payload: statistics plus the next few due tasks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    /// Statistics
    pub stats: DashboardStats,
    /// Up to five pending tasks due within a week
    pub upcoming_tasks: Vec<Task>,
}

// ═══════════════════════════════════════════════════════════
// Pagination
// ═══════════════════════════════════════════════════════════

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page<T> {
    /// Items of this page, in server order
    pub items: Vec<T>,
    /// Total matching items
    pub total: u64,
    /// Total pages
    pub pages: u64,
    /// 1-based page number
    pub current_page: u64,
    /// Page size
    pub per_page: u64,
    /// More pages follow
    pub has_next: bool,
    /// Pages precede
    pub has_prev: bool,
}
