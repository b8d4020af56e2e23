//! `/users`: administration and profile editing.

use super::Ack;
use crate::{
    client::RequestOptions,
    types::{EntityId, Page, Playlist, Profile, Track},
    ApiClient, Result,
};
use serde::{Deserialize, Serialize};

/// Filters of the user listing (admin only).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// 1-based page
    pub page: Option<u64>,
    /// Page size (server default 10, max 100)
    pub per_page: Option<u64>,
    /// Matches username, e-mail, first or last name
    pub search: Option<String>,
}

/// Profile fields to change. Unset fields are not sent.
///
/// `is_active` and `is_admin` are honoured for administrators only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

#[derive(Deserialize)]
#[serde(default)]
struct UserPage {
    users: Vec<Profile>,
    total: u64,
    pages: u64,
    current_page: u64,
    per_page: u64,
    has_next: bool,
    has_prev: bool,
}

impl Default for UserPage {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            total: 0,
            pages: 0,
            current_page: 1,
            per_page: 10,
            has_next: false,
            has_prev: false,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct OwnedListing<T> {
    #[serde(alias = "uploads")]
    playlists: Vec<T>,
    total: u64,
    current_page: u64,
    per_page: u64,
}

impl<T> OwnedListing<T> {
    fn into_page(self) -> Page<T> {
        let per_page = self.per_page.max(1);
        let pages = self.total.div_ceil(per_page);
        Page {
            items: self.playlists,
            total: self.total,
            pages,
            current_page: self.current_page,
            per_page: self.per_page,
            has_next: self.current_page < pages,
            has_prev: self.current_page > 1,
        }
    }
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: Profile,
}

/// Handle on the `/users` resource.
#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl UsersApi<'_> {
    /// `GET /users`
    ///
    /// # Errors
    ///
    /// `Rejected` (403) for non-administrators.
    pub async fn list(&self, query: &UserQuery) -> Result<Page<Profile>> {
        let options = RequestOptions::new()
            .query_opt("page", query.page)
            .query_opt("per_page", query.per_page)
            .query_opt("search", query.search.as_deref());
        let page: UserPage = self.client.get("/users", options).await?;

        Ok(Page {
            items: page.users,
            total: page.total,
            pages: page.pages,
            current_page: page.current_page,
            per_page: page.per_page,
            has_next: page.has_next,
            has_prev: page.has_prev,
        })
    }

    /// `GET /users/:id`
    ///
    /// # Errors
    ///
    /// `Rejected` (403 / 404).
    pub async fn get(&self, id: EntityId) -> Result<Profile> {
        let envelope: UserEnvelope = self
            .client
            .get(&format!("/users/{id}"), RequestOptions::new())
            .await?;
        Ok(envelope.user)
    }

    /// `PUT /users/:id`, returning the canonical profile.
    ///
    /// # Errors
    ///
    /// `Rejected` (400 / 403 / 404 / 409).
    pub async fn update(&self, id: EntityId, update: &ProfileUpdate) -> Result<Profile> {
        let envelope: UserEnvelope = self.client.put(&format!("/users/{id}"), update).await?;
        Ok(envelope.user)
    }

    /// `DELETE /users/:id` (the backend deactivates the account).
    ///
    /// # Errors
    ///
    /// `Rejected` (400 when removing the last administrator).
    pub async fn delete(&self, id: EntityId) -> Result<Ack> {
        self.client.delete(&format!("/users/{id}")).await
    }

    /// `GET /users/:id/playlists`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    pub async fn playlists(&self, id: EntityId, page: u64) -> Result<Page<Playlist>> {
        let listing: OwnedListing<Playlist> = self
            .client
            .get(
                &format!("/users/{id}/playlists"),
                RequestOptions::new().query("page", page),
            )
            .await?;
        Ok(listing.into_page())
    }

    /// `GET /users/:id/uploads`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    pub async fn uploads(&self, id: EntityId, page: u64) -> Result<Page<Track>> {
        let listing: OwnedListing<Track> = self
            .client
            .get(
                &format!("/users/{id}/uploads"),
                RequestOptions::new().query("page", page),
            )
            .await?;
        Ok(listing.into_page())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_sends_only_set_fields() {
        let update = ProfileUpdate {
            first_name: Some("Ada".into()),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"first_name": "Ada"})
        );
    }

    #[test]
    fn test_owned_listing_derives_page_flags() {
        let listing: OwnedListing<Track> = serde_json::from_str(
            r#"{"uploads":[{"id":1,"title":"A"}],"total":25,"current_page":2,"per_page":10}"#,
        )
        .unwrap();
        let page = listing.into_page();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pages, 3);
        assert!(page.has_next);
        assert!(page.has_prev);
    }
}
