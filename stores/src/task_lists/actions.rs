//! Task list store actions.

use crate::error::DomainError;
use cadence_api::{EntityId, TaskList, TaskListDraft, TaskListStats};
use cadence_core::action::RequestId;
use cadence_macros::Action;

/// Task list store action.
#[derive(Action, Clone, Debug)]
pub enum TaskListAction {
    // ═══════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════

    /// Load the user's lists, replacing the loaded ones.
    #[command]
    FetchTaskLists {
        /// Correlation id
        request_id: RequestId,
        /// Include archived lists
        include_archived: bool,
    },

    /// Load one list (with its tasks) as the current list.
    #[command]
    FetchTaskList {
        /// Correlation id
        request_id: RequestId,
        /// List id
        id: EntityId,
        /// Embed completed tasks too
        include_completed: bool,
    },

    /// Create a list.
    #[command]
    CreateTaskList {
        /// Correlation id
        request_id: RequestId,
        /// Fields of the new list
        draft: TaskListDraft,
    },

    /// Change a list.
    #[command]
    UpdateTaskList {
        /// Correlation id
        request_id: RequestId,
        /// List id
        id: EntityId,
        /// Fields to change
        draft: TaskListDraft,
    },

    /// Delete a list and its tasks.
    #[command]
    DeleteTaskList {
        /// Correlation id
        request_id: RequestId,
        /// List id
        id: EntityId,
    },

    /// Archive or unarchive a list.
    #[command]
    ToggleArchive {
        /// Correlation id
        request_id: RequestId,
        /// List id
        id: EntityId,
    },

    /// Load a list's statistics.
    #[command]
    FetchStats {
        /// Correlation id
        request_id: RequestId,
        /// List id
        id: EntityId,
    },

    /// Forget the current list.
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

    /// Lists loaded, in server order.
    #[event]
    TaskListsLoaded {
        /// Correlation id
        request_id: RequestId,
        /// Lists
        task_lists: Vec<TaskList>,
    },

    /// One list loaded.
    #[event]
    TaskListLoaded {
        /// Correlation id
        request_id: RequestId,
        /// List with embedded tasks
        task_list: TaskList,
    },

    /// List created.
    #[event]
    TaskListCreated {
        /// Correlation id
        request_id: RequestId,
        /// Canonical list
        task_list: TaskList,
    },

    /// List changed (update or archive toggle).
    #[event]
    TaskListUpdated {
        /// Correlation id
        request_id: RequestId,
        /// Canonical list
        task_list: TaskList,
    },

    /// List deleted.
    #[event]
    TaskListDeleted {
        /// Correlation id
        request_id: RequestId,
        /// List id
        id: EntityId,
    },

    /// Statistics loaded.
    #[event]
    StatsLoaded {
        /// Correlation id
        request_id: RequestId,
        /// List id
        id: EntityId,
        /// Statistics
        stats: TaskListStats,
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
