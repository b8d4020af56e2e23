//! Task store façade.

use super::actions::TaskAction;
use super::reducer::TaskReducer;
use super::state::TaskState;
use crate::config::StoreConfig;
use crate::environment::StoreEnvironment;
use crate::error::{DomainError, Result};
use crate::request::{dispatch, unexpected};
use cadence_api::{
    ApiClient, BulkOperation, Dashboard, EntityId, Priority, PriorityInfo, Task, TaskDraft,
    TaskQuery,
};
use cadence_core::action::RequestId;
use cadence_runtime::Store;
use tokio::sync::broadcast;

type TaskRuntime = Store<TaskState, TaskAction, StoreEnvironment, TaskReducer>;

/// Client-side task collection.
///
/// Every mutation patches the list from the backend's answer; a failed call
/// leaves the list as it was, records a message and returns the error.
#[derive(Clone)]
pub struct TaskStore {
    store: TaskRuntime,
    config: StoreConfig,
}

impl TaskStore {
    /// Create an empty store on `api`.
    #[must_use]
    pub fn new(api: ApiClient, config: StoreConfig) -> Self {
        let env = StoreEnvironment::new(api).with_fallback(config.fallback);
        Self::with_environment(env, config)
    }

    /// Create an empty store on a prepared environment.
    #[must_use]
    pub fn with_environment(env: StoreEnvironment, config: StoreConfig) -> Self {
        Self {
            store: Store::new(TaskState::default(), TaskReducer::new(), env),
            config,
        }
    }

    async fn request<F>(&self, command: F) -> Result<TaskAction>
    where
        F: FnOnce(RequestId) -> TaskAction,
    {
        dispatch(&self.store, self.config.request_timeout, TaskAction::is_event, command).await
    }

    // ═══════════════════════════════════════════════════════════
    // CRUD
    // ═══════════════════════════════════════════════════════════

    /// Load the tasks matching `query`, replacing the list.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the list is unchanged.
    pub async fn fetch_all(&self, query: TaskQuery) -> Result<Vec<Task>> {
        match self
            .request(|request_id| TaskAction::FetchTasks { request_id, query })
            .await?
        {
            TaskAction::TasksLoaded { tasks, .. } => Ok(tasks),
            other => Err(failure(other)),
        }
    }

    /// Load one task as the current task.
    ///
    /// # Errors
    ///
    /// Returns the backend's error (e.g. not found).
    pub async fn fetch_by_id(&self, id: EntityId) -> Result<Task> {
        match self
            .request(|request_id| TaskAction::FetchTask { request_id, id })
            .await?
        {
            TaskAction::TaskLoaded { task, .. } => Ok(task),
            other => Err(failure(other)),
        }
    }

    /// Create a task; it goes first in the list.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (e.g. a missing title).
    pub async fn create(&self, draft: TaskDraft) -> Result<Task> {
        match self
            .request(|request_id| TaskAction::CreateTask { request_id, draft })
            .await?
        {
            TaskAction::TaskCreated { task, .. } => Ok(task),
            other => Err(failure(other)),
        }
    }

    /// Change a task.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection.
    pub async fn update(&self, id: EntityId, draft: TaskDraft) -> Result<Task> {
        match self
            .request(|request_id| TaskAction::UpdateTask {
                request_id,
                id,
                draft,
            })
            .await?
        {
            TaskAction::TaskUpdated { task, .. } => Ok(task),
            other => Err(failure(other)),
        }
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the list is unchanged.
    pub async fn delete(&self, id: EntityId) -> Result<()> {
        match self
            .request(|request_id| TaskAction::DeleteTask { request_id, id })
            .await?
        {
            TaskAction::TaskDeleted { .. } => Ok(()),
            other => Err(failure(other)),
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Task operations
    // ═══════════════════════════════════════════════════════════

    /// Flip a task's completion.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn toggle_completion(&self, id: EntityId) -> Result<Task> {
        match self
            .request(|request_id| TaskAction::ToggleTask { request_id, id })
            .await?
        {
            TaskAction::TaskUpdated { task, .. } => Ok(task),
            other => Err(failure(other)),
        }
    }

    /// Load the priority table. Falls back to the built-in table instead of
    /// failing.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store did not answer.
    pub async fn fetch_priorities(&self) -> Result<Vec<PriorityInfo>> {
        match self
            .request(|request_id| TaskAction::FetchPriorities { request_id })
            .await?
        {
            TaskAction::PrioritiesLoaded { priorities, .. } => Ok(priorities),
            other => Err(failure(other)),
        }
    }

    /// Load the dashboard statistics.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn fetch_dashboard(&self) -> Result<Dashboard> {
        match self
            .request(|request_id| TaskAction::FetchDashboard { request_id })
            .await?
        {
            TaskAction::DashboardLoaded { dashboard, .. } => Ok(dashboard),
            other => Err(failure(other)),
        }
    }

    /// Apply `operation` to `task_ids`, then reload the list with the last
    /// filters. Returns how many tasks the backend changed.
    ///
    /// # Errors
    ///
    /// Returns the backend's error from either call.
    pub async fn bulk_operation(
        &self,
        task_ids: Vec<EntityId>,
        operation: BulkOperation,
    ) -> Result<u64> {
        match self
            .request(|request_id| TaskAction::ApplyBulk {
                request_id,
                task_ids,
                operation,
            })
            .await?
        {
            TaskAction::BulkApplied { affected, .. } => Ok(affected),
            other => Err(failure(other)),
        }
    }

    /// Forget the current task.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn clear_current(&self) -> Result<()> {
        self.store.send(TaskAction::ClearCurrent).await?;
        Ok(())
    }

    /// Forget the last error.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn clear_error(&self) -> Result<()> {
        self.store.send(TaskAction::ClearError).await?;
        Ok(())
    }

    /// Drop everything loaded.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn reset(&self) -> Result<()> {
        self.store.send(TaskAction::Reset).await?;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════
    // Getters
    // ═══════════════════════════════════════════════════════════

    /// Read the state through a closure.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TaskState) -> T,
    {
        self.store.state(f).await
    }

    /// Loaded tasks.
    pub async fn tasks(&self) -> Vec<Task> {
        self.state(|s| s.tasks.clone()).await
    }

    /// Task opened on its own.
    pub async fn current(&self) -> Option<Task> {
        self.state(|s| s.current.clone()).await
    }

    /// Completed tasks.
    pub async fn completed(&self) -> Vec<Task> {
        self.state(|s| s.completed().into_iter().cloned().collect()).await
    }

    /// Tasks still to do.
    pub async fn open(&self) -> Vec<Task> {
        self.state(|s| s.open().into_iter().cloned().collect()).await
    }

    /// Open tasks past their due date.
    pub async fn overdue(&self) -> Vec<Task> {
        let now = self.now();
        self.state(|s| s.overdue(now).into_iter().cloned().collect()).await
    }

    /// Tasks of one priority.
    pub async fn by_priority(&self, priority: Priority) -> Vec<Task> {
        self.state(|s| s.by_priority(priority).into_iter().cloned().collect())
            .await
    }

    /// Apply `query` to the loaded tasks without asking the backend.
    pub async fn filter(&self, query: &TaskQuery) -> Vec<Task> {
        let now = self.now();
        self.state(|s| s.filtered(query, now).into_iter().cloned().collect())
            .await
    }

    /// Whether a request is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state(TaskState::is_loading).await
    }

    /// Last recorded failure message.
    pub async fn last_error(&self) -> Option<String> {
        self.state(|s| s.last_error().map(str::to_string)).await
    }

    /// Observe every reduced task action.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<TaskAction> {
        self.store.subscribe_actions()
    }

    fn now(&self) -> chrono::NaiveDateTime {
        self.store.environment().clock.now().naive_utc()
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn failure(action: TaskAction) -> DomainError {
    match action {
        TaskAction::Failed { error, .. } => error,
        other => unexpected(&other),
    }
}
