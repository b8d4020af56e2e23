//! Task store reducer.

use super::actions::TaskAction;
use super::state::TaskState;
use crate::environment::StoreEnvironment;
use crate::error::DomainError;
use crate::list;
use crate::request::remote;
use cadence_api::{ApiError, PriorityInfo};
use cadence_core::{action::RequestId, effect::Effect, reducer::Reducer, smallvec, SmallVec};

const FETCH_FAILED: &str = "Could not load tasks";
const FETCH_ONE_FAILED: &str = "Could not load task";
const CREATE_FAILED: &str = "Could not create task";
const UPDATE_FAILED: &str = "Could not update task";
const DELETE_FAILED: &str = "Could not delete task";
const TOGGLE_FAILED: &str = "Could not change task status";
const DASHBOARD_FAILED: &str = "Could not load dashboard";
const BULK_FAILED: &str = "Bulk operation failed";

/// Reducer of the task store.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskReducer;

impl TaskReducer {
    /// Create a new task reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn failed(
    request_id: RequestId,
    fallback: &'static str,
) -> impl Fn(DomainError) -> TaskAction + Clone + Send + 'static {
    move |error| TaskAction::Failed {
        request_id,
        error,
        fallback,
    }
}

impl Reducer for TaskReducer {
    type State = TaskState;
    type Action = TaskAction;
    type Environment = StoreEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let api = env.api.clone();

        match action {
            // ═══════════════════════════════════════════════════════════
            // Commands
            // ═══════════════════════════════════════════════════════════
            TaskAction::FetchTasks { request_id, query } => {
                state.begin_request();
                smallvec![remote(
                    async move {
                        let tasks = api.tasks().list(&query).await?;
                        Ok::<_, ApiError>((query, tasks))
                    },
                    move |(query, tasks)| TaskAction::TasksLoaded {
                        request_id,
                        query,
                        tasks,
                    },
                    failed(request_id, FETCH_FAILED),
                )]
            },

            TaskAction::FetchTask { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.tasks().get(id).await },
                    move |task| TaskAction::TaskLoaded { request_id, task },
                    failed(request_id, FETCH_ONE_FAILED),
                )]
            },

            TaskAction::CreateTask { request_id, draft } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.tasks().create(&draft).await },
                    move |task| TaskAction::TaskCreated { request_id, task },
                    failed(request_id, CREATE_FAILED),
                )]
            },

            TaskAction::UpdateTask {
                request_id,
                id,
                draft,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.tasks().update(id, &draft).await },
                    move |task| TaskAction::TaskUpdated { request_id, task },
                    failed(request_id, UPDATE_FAILED),
                )]
            },

            TaskAction::DeleteTask { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.tasks().delete(id).await },
                    move |_| TaskAction::TaskDeleted { request_id, id },
                    failed(request_id, DELETE_FAILED),
                )]
            },

            TaskAction::ToggleTask { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.tasks().toggle(id).await },
                    move |task| TaskAction::TaskUpdated { request_id, task },
                    failed(request_id, TOGGLE_FAILED),
                )]
            },

            TaskAction::FetchPriorities { request_id } => {
                state.begin_request();
                smallvec![Effect::guarded(
                    async move {
                        let priorities = match api.tasks().priorities().await {
                            Ok(priorities) => priorities,
                            Err(error) => {
                                tracing::warn!(%error, "Priority table unavailable, using built-in one");
                                PriorityInfo::defaults()
                            },
                        };
                        TaskAction::PrioritiesLoaded {
                            request_id,
                            priorities,
                        }
                    },
                    move || TaskAction::PrioritiesLoaded {
                        request_id,
                        priorities: PriorityInfo::defaults(),
                    },
                )]
            },

            TaskAction::FetchDashboard { request_id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.tasks().dashboard().await },
                    move |dashboard| TaskAction::DashboardLoaded {
                        request_id,
                        dashboard,
                    },
                    failed(request_id, DASHBOARD_FAILED),
                )]
            },

            TaskAction::ApplyBulk {
                request_id,
                task_ids,
                operation,
            } => {
                state.begin_request();
                let query = state.query.clone();
                smallvec![remote(
                    async move {
                        let affected = api.tasks().bulk(&task_ids, operation).await?;
                        let tasks = api.tasks().list(&query).await?;
                        Ok::<_, ApiError>((affected, tasks))
                    },
                    move |(affected, tasks)| TaskAction::BulkApplied {
                        request_id,
                        affected,
                        tasks,
                    },
                    failed(request_id, BULK_FAILED),
                )]
            },

            TaskAction::ClearCurrent => {
                state.current = None;
                smallvec![Effect::None]
            },

            TaskAction::ClearError => {
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskAction::Reset => {
                *state = TaskState {
                    pending: state.pending,
                    ..TaskState::default()
                };
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Events
            // ═══════════════════════════════════════════════════════════
            TaskAction::TasksLoaded { query, tasks, .. } => {
                state.finish_request();
                tracing::debug!(count = tasks.len(), "Tasks loaded");
                state.tasks = tasks;
                state.query = query;
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskAction::TaskLoaded { task, .. } => {
                state.finish_request();
                list::replace(&mut state.tasks, task.clone());
                state.current = Some(task);
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskAction::TaskCreated { task, .. } => {
                state.finish_request();
                tracing::debug!(id = task.id, "Task created");
                list::prepend(&mut state.tasks, task);
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskAction::TaskUpdated { task, .. } => {
                state.finish_request();
                list::replace_current(&mut state.current, &task);
                list::replace(&mut state.tasks, task);
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskAction::TaskDeleted { id, .. } => {
                state.finish_request();
                list::remove(&mut state.tasks, id);
                list::forget_current(&mut state.current, id);
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskAction::PrioritiesLoaded { priorities, .. } => {
                state.finish_request();
                state.priorities = priorities;
                smallvec![Effect::None]
            },

            TaskAction::DashboardLoaded { dashboard, .. } => {
                state.finish_request();
                state.dashboard = Some(dashboard);
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskAction::BulkApplied { affected, tasks, .. } => {
                state.finish_request();
                tracing::debug!(affected, "Bulk operation applied");
                state.tasks = tasks;
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskAction::Failed {
                error, fallback, ..
            } => {
                state.finish_request();
                tracing::warn!(%error, "{fallback}");
                state.record_error(error.display_message(fallback));
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cadence_api::{ApiClient, ApiConfig, MemoryTokenStorage, Task, TaskDraft};
    use cadence_testing::{assertions, ReducerTest};
    use std::sync::Arc;

    fn test_env() -> StoreEnvironment {
        let api = ApiClient::new(
            ApiConfig::new("http://127.0.0.1:9"),
            Arc::new(MemoryTokenStorage::new()),
        )
        .unwrap();
        StoreEnvironment::new(api)
    }

    fn task(id: i64, title: &str) -> Task {
        Task {
            id,
            title: title.into(),
            ..Task::default()
        }
    }

    fn loaded() -> TaskState {
        TaskState {
            tasks: vec![task(1, "a"), task(2, "b")],
            ..TaskState::default()
        }
    }

    #[test]
    fn test_command_starts_request() {
        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_state(TaskState::default())
            .when_action(TaskAction::CreateTask {
                request_id: RequestId::new(),
                draft: TaskDraft::titled("X"),
            })
            .then_state(|state| assert!(state.is_loading()))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_created_task_goes_first() {
        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_state(TaskState {
                pending: 1,
                ..loaded()
            })
            .when_action(TaskAction::TaskCreated {
                request_id: RequestId::new(),
                task: task(7, "X"),
            })
            .then_state(|state| {
                let ids: Vec<_> = state.tasks.iter().map(|t| t.id).collect();
                assert_eq!(ids, [7, 1, 2]);
                assert!(!state.is_loading());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_failure_leaves_list_unchanged() {
        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_state(TaskState {
                pending: 1,
                ..loaded()
            })
            .when_action(TaskAction::Failed {
                request_id: RequestId::new(),
                error: ApiError::from_status(404, Some("Tarefa não encontrada".into())).into(),
                fallback: DELETE_FAILED,
            })
            .then_state(|state| {
                assert_eq!(state.tasks.len(), 2);
                assert_eq!(state.last_error(), Some("Tarefa não encontrada"));
                assert!(!state.is_loading());
            })
            .run();
    }

    #[test]
    fn test_update_patches_list_and_current() {
        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_state(TaskState {
                current: Some(task(2, "b")),
                pending: 1,
                ..loaded()
            })
            .when_action(TaskAction::TaskUpdated {
                request_id: RequestId::new(),
                task: Task {
                    completed: true,
                    ..task(2, "b")
                },
            })
            .then_state(|state| {
                assert!(state.get(2).unwrap().completed);
                assert!(state.current.as_ref().unwrap().completed);
            })
            .run();
    }

    #[test]
    fn test_delete_forgets_current() {
        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_state(TaskState {
                current: Some(task(1, "a")),
                pending: 1,
                ..loaded()
            })
            .when_action(TaskAction::TaskDeleted {
                request_id: RequestId::new(),
                id: 1,
            })
            .then_state(|state| {
                assert!(state.get(1).is_none());
                assert!(state.current.is_none());
            })
            .run();
    }

    #[test]
    fn test_reset_keeps_in_flight_counter() {
        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_state(TaskState {
                pending: 2,
                error: Some("boom".into()),
                ..loaded()
            })
            .when_action(TaskAction::Reset)
            .then_state(|state| {
                assert!(state.tasks.is_empty());
                assert!(state.last_error().is_none());
                assert_eq!(state.pending, 2);
            })
            .run();
    }
}
