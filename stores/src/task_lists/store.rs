//! Task list store façade.

use super::actions::TaskListAction;
use super::reducer::TaskListReducer;
use super::state::TaskListState;
use crate::config::StoreConfig;
use crate::environment::StoreEnvironment;
use crate::error::{DomainError, Result};
use crate::request::{dispatch, unexpected};
use cadence_api::{ApiClient, EntityId, TaskList, TaskListDraft, TaskListStats};
use cadence_core::action::RequestId;
use cadence_runtime::Store;
use tokio::sync::broadcast;

type TaskListRuntime = Store<TaskListState, TaskListAction, StoreEnvironment, TaskListReducer>;

/// Client-side collection of task lists.
#[derive(Clone)]
pub struct TaskListStore {
    store: TaskListRuntime,
    config: StoreConfig,
}

impl TaskListStore {
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
            store: Store::new(TaskListState::default(), TaskListReducer::new(), env),
            config,
        }
    }

    async fn request<F>(&self, command: F) -> Result<TaskListAction>
    where
        F: FnOnce(RequestId) -> TaskListAction,
    {
        dispatch(
            &self.store,
            self.config.request_timeout,
            TaskListAction::is_event,
            command,
        )
        .await
    }

    /// Load the user's lists, replacing the loaded ones.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the list is unchanged.
    pub async fn fetch_all(&self, include_archived: bool) -> Result<Vec<TaskList>> {
        match self
            .request(|request_id| TaskListAction::FetchTaskLists {
                request_id,
                include_archived,
            })
            .await?
        {
            TaskListAction::TaskListsLoaded { task_lists, .. } => Ok(task_lists),
            other => Err(failure(other)),
        }
    }

    /// Load one list with its tasks as the current list.
    ///
    /// # Errors
    ///
    /// Returns the backend's error (e.g. not found).
    pub async fn fetch_by_id(&self, id: EntityId, include_completed: bool) -> Result<TaskList> {
        match self
            .request(|request_id| TaskListAction::FetchTaskList {
                request_id,
                id,
                include_completed,
            })
            .await?
        {
            TaskListAction::TaskListLoaded { task_list, .. } => Ok(task_list),
            other => Err(failure(other)),
        }
    }

    /// Create a list; it goes first.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection.
    pub async fn create(&self, draft: TaskListDraft) -> Result<TaskList> {
        match self
            .request(|request_id| TaskListAction::CreateTaskList { request_id, draft })
            .await?
        {
            TaskListAction::TaskListCreated { task_list, .. } => Ok(task_list),
            other => Err(failure(other)),
        }
    }

    /// Change a list.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection.
    pub async fn update(&self, id: EntityId, draft: TaskListDraft) -> Result<TaskList> {
        match self
            .request(|request_id| TaskListAction::UpdateTaskList {
                request_id,
                id,
                draft,
            })
            .await?
        {
            TaskListAction::TaskListUpdated { task_list, .. } => Ok(task_list),
            other => Err(failure(other)),
        }
    }

    /// Delete a list and its tasks.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the list is unchanged.
    pub async fn delete(&self, id: EntityId) -> Result<()> {
        match self
            .request(|request_id| TaskListAction::DeleteTaskList { request_id, id })
            .await?
        {
            TaskListAction::TaskListDeleted { .. } => Ok(()),
            other => Err(failure(other)),
        }
    }

    /// Archive or unarchive a list.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn toggle_archive(&self, id: EntityId) -> Result<TaskList> {
        match self
            .request(|request_id| TaskListAction::ToggleArchive { request_id, id })
            .await?
        {
            TaskListAction::TaskListUpdated { task_list, .. } => Ok(task_list),
            other => Err(failure(other)),
        }
    }

    /// Load a list's statistics.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn fetch_stats(&self, id: EntityId) -> Result<TaskListStats> {
        match self
            .request(|request_id| TaskListAction::FetchStats { request_id, id })
            .await?
        {
            TaskListAction::StatsLoaded { stats, .. } => Ok(stats),
            other => Err(failure(other)),
        }
    }

    /// Forget the current list.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn clear_current(&self) -> Result<()> {
        self.store.send(TaskListAction::ClearCurrent).await?;
        Ok(())
    }

    /// Forget the last error.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn clear_error(&self) -> Result<()> {
        self.store.send(TaskListAction::ClearError).await?;
        Ok(())
    }

    /// Drop everything loaded.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Runtime`] if the store is shutting down.
    pub async fn reset(&self) -> Result<()> {
        self.store.send(TaskListAction::Reset).await?;
        Ok(())
    }

    /// Read the state through a closure.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TaskListState) -> T,
    {
        self.store.state(f).await
    }

    /// Loaded lists.
    pub async fn task_lists(&self) -> Vec<TaskList> {
        self.state(|s| s.task_lists.clone()).await
    }

    /// List opened on its own.
    pub async fn current(&self) -> Option<TaskList> {
        self.state(|s| s.current.clone()).await
    }

    /// Lists not archived.
    pub async fn active(&self) -> Vec<TaskList> {
        self.state(|s| s.active().into_iter().cloned().collect()).await
    }

    /// Archived lists.
    pub async fn archived(&self) -> Vec<TaskList> {
        self.state(|s| s.archived().into_iter().cloned().collect()).await
    }

    /// Loaded statistics of a list.
    pub async fn stats(&self, id: EntityId) -> Option<TaskListStats> {
        self.state(|s| s.stats.get(&id).cloned()).await
    }

    /// Whether a request is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state(TaskListState::is_loading).await
    }

    /// Last recorded failure message.
    pub async fn last_error(&self) -> Option<String> {
        self.state(|s| s.last_error().map(str::to_string)).await
    }

    /// Observe every reduced task list action.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<TaskListAction> {
        self.store.subscribe_actions()
    }
}

impl std::fmt::Debug for TaskListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskListStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn failure(action: TaskListAction) -> DomainError {
    match action {
        TaskListAction::Failed { error, .. } => error,
        other => unexpected(&other),
    }
}
