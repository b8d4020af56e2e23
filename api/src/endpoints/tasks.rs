//! `/tasks`

use super::Ack;
use crate::{
    client::RequestOptions,
    types::{Dashboard, EntityId, Priority, PriorityInfo, Task},
    ApiClient, Result,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Server-side filters of the task listing.
///
/// The server orders the result: pending before completed, then by due
/// date, then by priority (most pressing first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct TaskQuery {
    pub task_list_id: Option<EntityId>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    /// Matches title or description
    pub search: Option<String>,
    pub overdue_only: bool,
}

/// Task fields for create and update. Unset fields are not sent.
///
/// On create `title` (max 200 characters) and `task_list_id` are required
/// and `priority` defaults to medium.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct TaskDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_list_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskDraft {
    /// A draft carrying just a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Set the owning list.
    #[must_use]
    pub const fn in_list(mut self, task_list_id: EntityId) -> Self {
        self.task_list_id = Some(task_list_id);
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Operation applied by `POST /tasks/bulk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOperation {
    /// Mark completed
    Complete,
    /// Mark pending
    Incomplete,
    /// Delete
    Delete,
    /// Move into another list
    Move {
        /// Destination list
        target_list_id: EntityId,
    },
}

impl BulkOperation {
    /// Wire name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
            Self::Delete => "delete",
            Self::Move { .. } => "move",
        }
    }
}

#[derive(Serialize)]
struct BulkRequest<'a> {
    task_ids: &'a [EntityId],
    operation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_list_id: Option<EntityId>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct BulkResult {
    affected_count: u64,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TaskListing {
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct TaskEnvelope {
    task: Task,
}

#[derive(Deserialize)]
struct PriorityListing {
    priorities: Vec<PriorityInfo>,
}

/// Handle on the `/tasks` resource.
#[derive(Debug, Clone, Copy)]
pub struct TasksApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl TasksApi<'_> {
    /// `GET /tasks`, in server order.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    pub async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let mut options = RequestOptions::new()
            .query_opt("task_list_id", query.task_list_id)
            .query_opt("completed", query.completed)
            .query_opt("priority", query.priority)
            .query_opt("search", query.search.as_deref());
        if query.overdue_only {
            options = options.query("overdue_only", true);
        }
        let listing: TaskListing = self.client.get("/tasks", options).await?;
        Ok(listing.tasks)
    }

    /// `GET /tasks/:id`
    ///
    /// # Errors
    ///
    /// `Rejected` (404).
    pub async fn get(&self, id: EntityId) -> Result<Task> {
        let envelope: TaskEnvelope = self
            .client
            .get(&format!("/tasks/{id}"), RequestOptions::new())
            .await?;
        Ok(envelope.task)
    }

    /// `POST /tasks`
    ///
    /// # Errors
    ///
    /// `Rejected` (400 / 404) for a missing title, list, or bad priority.
    pub async fn create(&self, draft: &TaskDraft) -> Result<Task> {
        let envelope: TaskEnvelope = self.client.post("/tasks", draft).await?;
        Ok(envelope.task)
    }

    /// `PUT /tasks/:id`
    ///
    /// # Errors
    ///
    /// `Rejected` (400 / 404).
    pub async fn update(&self, id: EntityId, draft: &TaskDraft) -> Result<Task> {
        let envelope: TaskEnvelope = self.client.put(&format!("/tasks/{id}"), draft).await?;
        Ok(envelope.task)
    }

    /// `DELETE /tasks/:id`
    ///
    /// # Errors
    ///
    /// `Rejected` (404).
    pub async fn delete(&self, id: EntityId) -> Result<Ack> {
        self.client.delete(&format!("/tasks/{id}")).await
    }

    /// `PATCH /tasks/:id/toggle`: flips completion.
    ///
    /// # Errors
    ///
    /// `Rejected` (404).
    pub async fn toggle(&self, id: EntityId) -> Result<Task> {
        let envelope: TaskEnvelope = self.client.patch(&format!("/tasks/{id}/toggle")).await?;
        Ok(envelope.task)
    }

    /// `GET /tasks/priorities`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    pub async fn priorities(&self) -> Result<Vec<PriorityInfo>> {
        let listing: PriorityListing = self
            .client
            .get("/tasks/priorities", RequestOptions::new())
            .await?;
        Ok(listing.priorities)
    }

    /// `GET /tasks/dashboard`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    pub async fn dashboard(&self) -> Result<Dashboard> {
        self.client
            .get("/tasks/dashboard", RequestOptions::new())
            .await
    }

    /// `POST /tasks/bulk`, returning the number of affected tasks.
    ///
    /// # Errors
    ///
    /// `Rejected` (400 / 404) if any id or the move target is unknown.
    pub async fn bulk(&self, task_ids: &[EntityId], operation: BulkOperation) -> Result<u64> {
        let target_list_id = match operation {
            BulkOperation::Move { target_list_id } => Some(target_list_id),
            _ => None,
        };
        let result: BulkResult = self
            .client
            .post(
                "/tasks/bulk",
                &BulkRequest {
                    task_ids,
                    operation: operation.as_str(),
                    target_list_id,
                },
            )
            .await?;
        Ok(result.affected_count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_serializes_set_fields_only() {
        let draft = TaskDraft::titled("Pay rent")
            .in_list(3)
            .with_priority(Priority::High);
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"title": "Pay rent", "task_list_id": 3, "priority": "high"})
        );
    }

    #[test]
    fn test_bulk_move_carries_target() {
        let request = BulkRequest {
            task_ids: &[1, 2],
            operation: BulkOperation::Move { target_list_id: 9 }.as_str(),
            target_list_id: Some(9),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"task_ids": [1, 2], "operation": "move", "target_list_id": 9})
        );
    }
}
