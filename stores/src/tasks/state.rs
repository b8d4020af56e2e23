//! Task store state.

use cadence_api::{Dashboard, EntityId, Priority, PriorityInfo, Task, TaskQuery};
use cadence_macros::State;
use chrono::NaiveDateTime;

/// Task store state.
#[derive(State, Clone, Debug, Default)]
pub struct TaskState {
    /// Loaded tasks: server order, created ones first
    pub tasks: Vec<Task>,
    /// Task opened on its own
    pub current: Option<Task>,
    /// Priority table
    pub priorities: Vec<PriorityInfo>,
    /// Dashboard statistics
    pub dashboard: Option<Dashboard>,
    /// Filters of the last list load, reused after bulk operations
    pub query: TaskQuery,
    /// Requests in flight
    #[loading]
    pub pending: usize,
    /// Last failure message
    #[last_error]
    pub error: Option<String>,
}

impl TaskState {
    /// The task with `id`.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Task> {
        crate::list::find(&self.tasks, id)
    }

    /// Completed tasks.
    #[must_use]
    pub fn completed(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.completed).collect()
    }

    /// Tasks still to do.
    #[must_use]
    pub fn open(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| !task.completed).collect()
    }

    /// Open tasks whose due date is before `now`.
    #[must_use]
    pub fn overdue(&self, now: NaiveDateTime) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| is_overdue(task, now))
            .collect()
    }

    /// Tasks of one priority.
    #[must_use]
    pub fn by_priority(&self, priority: Priority) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.priority == priority)
            .collect()
    }

    /// Display metadata of `priority`, from the loaded table or the
    /// built-in one.
    #[must_use]
    pub fn priority_info(&self, priority: Priority) -> Option<PriorityInfo> {
        self.priorities
            .iter()
            .find(|info| info.value == priority)
            .cloned()
            .or_else(|| {
                PriorityInfo::defaults()
                    .into_iter()
                    .find(|info| info.value == priority)
            })
    }

    /// Apply `query` to the loaded tasks without asking the backend.
    ///
    /// `search` matches title and description case-insensitively.
    #[must_use]
    pub fn filtered(&self, query: &TaskQuery, now: NaiveDateTime) -> Vec<&Task> {
        let needle = query.search.as_deref().map(str::to_lowercase);
        self.tasks
            .iter()
            .filter(|task| query.task_list_id.is_none_or(|id| task.task_list_id == Some(id)))
            .filter(|task| query.completed.is_none_or(|done| task.completed == done))
            .filter(|task| query.priority.is_none_or(|p| task.priority == p))
            .filter(|task| !query.overdue_only || is_overdue(task, now))
            .filter(|task| {
                needle.as_deref().is_none_or(|needle| {
                    task.title.to_lowercase().contains(needle)
                        || task
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(needle))
                })
            })
            .collect()
    }
}

fn is_overdue(task: &Task, now: NaiveDateTime) -> bool {
    !task.completed && task.due_date.is_some_and(|due| due < now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap_or_default()
    }

    fn sample() -> TaskState {
        TaskState {
            tasks: vec![
                Task {
                    id: 1,
                    title: "Pay rent".into(),
                    priority: Priority::Urgent,
                    due_date: Some(at(1)),
                    task_list_id: Some(10),
                    ..Task::default()
                },
                Task {
                    id: 2,
                    title: "Buy milk".into(),
                    description: Some("Oat, not cow".into()),
                    completed: true,
                    due_date: Some(at(2)),
                    ..Task::default()
                },
                Task {
                    id: 3,
                    title: "Plan trip".into(),
                    priority: Priority::Low,
                    due_date: Some(at(20)),
                    task_list_id: Some(10),
                    ..Task::default()
                },
            ],
            ..TaskState::default()
        }
    }

    #[test]
    fn test_derived_views() {
        let state = sample();
        let ids = |tasks: Vec<&Task>| tasks.iter().map(|t| t.id).collect::<Vec<_>>();

        assert_eq!(ids(state.completed()), [2]);
        assert_eq!(ids(state.open()), [1, 3]);
        assert_eq!(ids(state.overdue(at(10))), [1]);
        assert_eq!(ids(state.by_priority(Priority::Medium)), [2]);
    }

    #[test]
    fn test_client_side_filter() {
        let state = sample();
        let ids = |tasks: Vec<&Task>| tasks.iter().map(|t| t.id).collect::<Vec<_>>();

        let in_list = TaskQuery {
            task_list_id: Some(10),
            ..TaskQuery::default()
        };
        assert_eq!(ids(state.filtered(&in_list, at(10))), [1, 3]);

        let search = TaskQuery {
            search: Some("OAT".into()),
            ..TaskQuery::default()
        };
        assert_eq!(ids(state.filtered(&search, at(10))), [2]);

        let overdue = TaskQuery {
            overdue_only: true,
            task_list_id: Some(10),
            ..TaskQuery::default()
        };
        assert_eq!(ids(state.filtered(&overdue, at(10))), [1]);
    }

    #[test]
    fn test_priority_info_falls_back_to_defaults() {
        let state = TaskState::default();
        assert_eq!(
            state.priority_info(Priority::High).map(|p| p.label),
            Some("Alta".to_string())
        );
    }
}
