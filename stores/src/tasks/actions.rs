//! Task store actions.

use crate::error::DomainError;
use cadence_api::{BulkOperation, Dashboard, EntityId, PriorityInfo, Task, TaskDraft, TaskQuery};
use cadence_core::action::RequestId;
use cadence_macros::Action;

/// Task store action.
#[derive(Action, Clone, Debug)]
pub enum TaskAction {
    // ═══════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════

    /// Load the tasks matching `query`, replacing the list.
    #[command]
    FetchTasks {
        /// Correlation id
        request_id: RequestId,
        /// Server-side filters
        query: TaskQuery,
    },

    /// Load one task as the current task.
    #[command]
    FetchTask {
        /// Correlation id
        request_id: RequestId,
        /// Task id
        id: EntityId,
    },

    /// Create a task.
    #[command]
    CreateTask {
        /// Correlation id
        request_id: RequestId,
        /// Fields of the new task
        draft: TaskDraft,
    },

    /// Change a task.
    #[command]
    UpdateTask {
        /// Correlation id
        request_id: RequestId,
        /// Task id
        id: EntityId,
        /// Fields to change
        draft: TaskDraft,
    },

    /// Delete a task.
    #[command]
    DeleteTask {
        /// Correlation id
        request_id: RequestId,
        /// Task id
        id: EntityId,
    },

    /// Flip a task's completion.
    #[command]
    ToggleTask {
        /// Correlation id
        request_id: RequestId,
        /// Task id
        id: EntityId,
    },

    /// Load the priority table.
    #[command]
    FetchPriorities {
        /// Correlation id
        request_id: RequestId,
    },

    /// Load the dashboard statistics.
    #[command]
    FetchDashboard {
        /// Correlation id
        request_id: RequestId,
    },

    /// Apply one operation to several tasks, then reload the list.
    #[command]
    ApplyBulk {
        /// Correlation id
        request_id: RequestId,
        /// Affected tasks
        task_ids: Vec<EntityId>,
        /// Operation
        operation: BulkOperation,
    },

    /// Forget the current task.
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

    /// Tasks loaded, in server order.
    #[event]
    TasksLoaded {
        /// Correlation id
        request_id: RequestId,
        /// Filters the list was loaded with
        query: TaskQuery,
        /// Matching tasks
        tasks: Vec<Task>,
    },

    /// One task loaded.
    #[event]
    TaskLoaded {
        /// Correlation id
        request_id: RequestId,
        /// Task
        task: Task,
    },

    /// Task created.
    #[event]
    TaskCreated {
        /// Correlation id
        request_id: RequestId,
        /// Canonical task
        task: Task,
    },

    /// Task changed (update or toggle).
    #[event]
    TaskUpdated {
        /// Correlation id
        request_id: RequestId,
        /// Canonical task
        task: Task,
    },

    /// Task deleted.
    #[event]
    TaskDeleted {
        /// Correlation id
        request_id: RequestId,
        /// Task id
        id: EntityId,
    },

    /// Priority table loaded (the built-in one when the backend failed).
    #[event]
    PrioritiesLoaded {
        /// Correlation id
        request_id: RequestId,
        /// Priority table
        priorities: Vec<PriorityInfo>,
    },

    /// Dashboard loaded.
    #[event]
    DashboardLoaded {
        /// Correlation id
        request_id: RequestId,
        /// Statistics and upcoming tasks
        dashboard: Dashboard,
    },

    /// Bulk operation applied and list reloaded.
    #[event]
    BulkApplied {
        /// Correlation id
        request_id: RequestId,
        /// Tasks the backend changed
        affected: u64,
        /// Reloaded list
        tasks: Vec<Task>,
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
