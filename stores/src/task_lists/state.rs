//! Task list store state.

use cadence_api::{EntityId, TaskList, TaskListStats};
use cadence_macros::State;
use std::collections::BTreeMap;

/// Task list store state.
#[derive(State, Clone, Debug, Default)]
pub struct TaskListState {
    /// Loaded lists: server order, created ones first
    pub task_lists: Vec<TaskList>,
    /// List opened on its own, with its tasks
    pub current: Option<TaskList>,
    /// Statistics per list id
    pub stats: BTreeMap<EntityId, TaskListStats>,
    /// Requests in flight
    #[loading]
    pub pending: usize,
    /// Last failure message
    #[last_error]
    pub error: Option<String>,
}

impl TaskListState {
    /// The list with `id`.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&TaskList> {
        crate::list::find(&self.task_lists, id)
    }

    /// Lists not archived.
    #[must_use]
    pub fn active(&self) -> Vec<&TaskList> {
        self.task_lists.iter().filter(|l| !l.is_archived).collect()
    }

    /// Archived lists.
    #[must_use]
    pub fn archived(&self) -> Vec<&TaskList> {
        self.task_lists.iter().filter(|l| l.is_archived).collect()
    }
}
