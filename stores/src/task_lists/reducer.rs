//! Task list store reducer.

use super::actions::TaskListAction;
use super::state::TaskListState;
use crate::environment::StoreEnvironment;
use crate::error::DomainError;
use crate::list;
use crate::request::remote;
use cadence_api::TaskList;
use cadence_core::{action::RequestId, effect::Effect, reducer::Reducer, smallvec, SmallVec};

const FETCH_FAILED: &str = "Could not load task lists";
const FETCH_ONE_FAILED: &str = "Could not load task list";
const CREATE_FAILED: &str = "Could not create task list";
const UPDATE_FAILED: &str = "Could not update task list";
const DELETE_FAILED: &str = "Could not delete task list";
const ARCHIVE_FAILED: &str = "Could not archive task list";
const STATS_FAILED: &str = "Could not load statistics";

/// Reducer of the task list store.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskListReducer;

impl TaskListReducer {
    /// Create a new task list reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn failed(
    request_id: RequestId,
    fallback: &'static str,
) -> impl Fn(DomainError) -> TaskListAction + Clone + Send + 'static {
    move |error| TaskListAction::Failed {
        request_id,
        error,
        fallback,
    }
}

impl Reducer for TaskListReducer {
    type State = TaskListState;
    type Action = TaskListAction;
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
            TaskListAction::FetchTaskLists {
                request_id,
                include_archived,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.task_lists().list(include_archived).await },
                    move |task_lists| TaskListAction::TaskListsLoaded {
                        request_id,
                        task_lists,
                    },
                    failed(request_id, FETCH_FAILED),
                )]
            },

            TaskListAction::FetchTaskList {
                request_id,
                id,
                include_completed,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.task_lists().get(id, include_completed).await },
                    move |task_list| TaskListAction::TaskListLoaded {
                        request_id,
                        task_list,
                    },
                    failed(request_id, FETCH_ONE_FAILED),
                )]
            },

            TaskListAction::CreateTaskList { request_id, draft } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.task_lists().create(&draft).await },
                    move |task_list| TaskListAction::TaskListCreated {
                        request_id,
                        task_list,
                    },
                    failed(request_id, CREATE_FAILED),
                )]
            },

            TaskListAction::UpdateTaskList {
                request_id,
                id,
                draft,
            } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.task_lists().update(id, &draft).await },
                    move |task_list| TaskListAction::TaskListUpdated {
                        request_id,
                        task_list,
                    },
                    failed(request_id, UPDATE_FAILED),
                )]
            },

            TaskListAction::DeleteTaskList { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.task_lists().delete(id).await },
                    move |_| TaskListAction::TaskListDeleted { request_id, id },
                    failed(request_id, DELETE_FAILED),
                )]
            },

            TaskListAction::ToggleArchive { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.task_lists().toggle_archive(id).await },
                    move |task_list| TaskListAction::TaskListUpdated {
                        request_id,
                        task_list,
                    },
                    failed(request_id, ARCHIVE_FAILED),
                )]
            },

            TaskListAction::FetchStats { request_id, id } => {
                state.begin_request();
                smallvec![remote(
                    async move { api.task_lists().stats(id).await },
                    move |stats| TaskListAction::StatsLoaded {
                        request_id,
                        id,
                        stats,
                    },
                    failed(request_id, STATS_FAILED),
                )]
            },

            TaskListAction::ClearCurrent => {
                state.current = None;
                smallvec![Effect::None]
            },

            TaskListAction::ClearError => {
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskListAction::Reset => {
                *state = TaskListState {
                    pending: state.pending,
                    ..TaskListState::default()
                };
                smallvec![Effect::None]
            },

            TaskListAction::TaskListsLoaded { task_lists, .. } => {
                state.finish_request();
                state.task_lists = task_lists;
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskListAction::TaskListLoaded { task_list, .. } => {
                state.finish_request();
                // The list view keeps the summary without embedded tasks
                list::replace(
                    &mut state.task_lists,
                    TaskList {
                        tasks: None,
                        ..task_list.clone()
                    },
                );
                state.current = Some(task_list);
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskListAction::TaskListCreated { task_list, .. } => {
                state.finish_request();
                list::prepend(&mut state.task_lists, task_list);
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskListAction::TaskListUpdated { task_list, .. } => {
                state.finish_request();
                if let Some(current) = state.current.as_mut().filter(|c| c.id == task_list.id) {
                    let tasks = current.tasks.take();
                    *current = TaskList {
                        tasks,
                        ..task_list.clone()
                    };
                }
                list::replace(&mut state.task_lists, task_list);
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskListAction::TaskListDeleted { id, .. } => {
                state.finish_request();
                list::remove(&mut state.task_lists, id);
                list::forget_current(&mut state.current, id);
                state.stats.remove(&id);
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskListAction::StatsLoaded { id, stats, .. } => {
                state.finish_request();
                state.stats.insert(id, stats);
                state.clear_error();
                smallvec![Effect::None]
            },

            TaskListAction::Failed {
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
