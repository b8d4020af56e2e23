//! `/auth`: login, registration, token refresh and password change.

use super::Ack;
use crate::{client::RequestOptions, types::Profile, ApiClient, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login credentials. `login` is a username or an e-mail address.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Username or e-mail
    pub login: String,
    /// Plain-text password
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account registration. Every field is required by the backend.
#[derive(Clone, PartialEq, Eq, Default, Serialize)]
#[allow(missing_docs)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Tokens and profile granted by login, registration or refresh.
///
/// Refresh responses carry no new refresh token.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthGrant {
    /// Authenticated profile
    pub user: Profile,
    /// New bearer token
    pub access_token: String,
    /// New refresh token (login and registration only)
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGrant")
            .field("user", &self.user.username)
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

#[derive(Serialize)]
struct PasswordChange<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: Profile,
}

/// Handle on the `/auth` resource.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl AuthApi<'_> {
    /// `POST /auth/login`
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`](crate::ApiError::Unauthorized) for bad
    /// credentials, `Rejected` (403) for a deactivated account.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        self.client.post("/auth/login", credentials).await
    }

    /// `POST /auth/register`
    ///
    /// # Errors
    ///
    /// `Rejected` (400 / 409) for invalid or duplicate fields.
    pub async fn register(&self, registration: &Registration) -> Result<AuthGrant> {
        self.client.post("/auth/register", registration).await
    }

    /// `POST /auth/logout`, revoking the stored bearer token.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    pub async fn logout(&self) -> Result<Ack> {
        self.client.post("/auth/logout", &serde_json::json!({})).await
    }

    /// `GET /auth/me`
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    pub async fn me(&self) -> Result<Profile> {
        let envelope: UserEnvelope = self.client.get("/auth/me", RequestOptions::new()).await?;
        Ok(envelope.user)
    }

    /// `POST /auth/refresh`, authenticated with the refresh token.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthGrant> {
        self.client
            .send_json(
                reqwest::Method::POST,
                "/auth/refresh",
                crate::client::Body::Empty,
                RequestOptions::new().bearer(refresh_token),
            )
            .await
    }

    /// `POST /auth/change-password`
    ///
    /// # Errors
    ///
    /// `Rejected` (400) if the current password is wrong.
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<Ack> {
        self.client
            .post(
                "/auth/change-password",
                &PasswordChange {
                    current_password,
                    new_password,
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new("ada", "hunter2");
        assert!(!format!("{credentials:?}").contains("hunter2"));

        let registration = Registration {
            password: "hunter2".into(),
            ..Registration::default()
        };
        assert!(!format!("{registration:?}").contains("hunter2"));
    }
}
