//! `/task-lists`

use super::Ack;
use crate::{
    client::RequestOptions,
    types::{EntityId, TaskList, TaskListStats},
    ApiClient, Result,
};
use serde::{Deserialize, Serialize};

/// Task list fields for create and update. Unset fields are not sent;
/// `title` is required on create (max 100 characters, unique per user).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct TaskListDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hex colour, server default `#1976d2`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

impl TaskListDraft {
    /// A draft carrying just a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TaskListListing {
    task_lists: Vec<TaskList>,
}

#[derive(Deserialize)]
struct TaskListEnvelope {
    task_list: TaskList,
}

#[derive(Deserialize)]
struct StatsEnvelope {
    stats: TaskListStats,
}

/// Handle on the `/task-lists` resource.
#[derive(Debug, Clone, Copy)]
pub struct TaskListsApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl TaskListsApi<'_> {
    /// `GET /task-lists`, newest first.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    pub async fn list(&self, include_archived: bool) -> Result<Vec<TaskList>> {
        let listing: TaskListListing = self
            .client
            .get(
                "/task-lists",
                RequestOptions::new().query("include_archived", include_archived),
            )
            .await?;
        Ok(listing.task_lists)
    }

    /// `GET /task-lists/:id` with its tasks embedded.
    ///
    /// # Errors
    ///
    /// `Rejected` (404).
    pub async fn get(&self, id: EntityId, include_completed: bool) -> Result<TaskList> {
        let envelope: TaskListEnvelope = self
            .client
            .get(
                &format!("/task-lists/{id}"),
                RequestOptions::new().query("include_completed", include_completed),
            )
            .await?;
        Ok(envelope.task_list)
    }

    /// `POST /task-lists`
    ///
    /// # Errors
    ///
    /// `Rejected` (400 / 409).
    pub async fn create(&self, draft: &TaskListDraft) -> Result<TaskList> {
        let envelope: TaskListEnvelope = self.client.post("/task-lists", draft).await?;
        Ok(envelope.task_list)
    }

    /// `PUT /task-lists/:id`
    ///
    /// # Errors
    ///
    /// `Rejected` (400 / 404 / 409).
    pub async fn update(&self, id: EntityId, draft: &TaskListDraft) -> Result<TaskList> {
        let envelope: TaskListEnvelope =
            self.client.put(&format!("/task-lists/{id}"), draft).await?;
        Ok(envelope.task_list)
    }

    /// `DELETE /task-lists/:id` (its tasks go with it).
    ///
    /// # Errors
    ///
    /// `Rejected` (404).
    pub async fn delete(&self, id: EntityId) -> Result<Ack> {
        self.client.delete(&format!("/task-lists/{id}")).await
    }

    /// `PATCH /task-lists/:id/archive`: flips the archived flag.
    ///
    /// # Errors
    ///
    /// `Rejected` (400) when archiving the only active list.
    pub async fn toggle_archive(&self, id: EntityId) -> Result<TaskList> {
        let envelope: TaskListEnvelope = self
            .client
            .patch(&format!("/task-lists/{id}/archive"))
            .await?;
        Ok(envelope.task_list)
    }

    /// `GET /task-lists/:id/stats`
    ///
    /// # Errors
    ///
    /// `Rejected` (404).
    pub async fn stats(&self, id: EntityId) -> Result<TaskListStats> {
        let envelope: StatsEnvelope = self
            .client
            .get(&format!("/task-lists/{id}/stats"), RequestOptions::new())
            .await?;
        Ok(envelope.stats)
    }
}
