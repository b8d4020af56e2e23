//! Session reducer.
//!
//! Storage writes happen inside effects, before the result event is fed
//! back: a success event means the tokens are already persisted, a failure
//! event means storage is already cleared. The reducer mirrors that outcome
//! in memory.

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::error::SessionError;
use crate::state::{Notice, Phase, SessionState};
use cadence_api::{ApiClient, AuthGrant, TokenStorage};
use cadence_core::{action::RequestId, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::future::Future;

const SIGN_IN_FAILED: &str = "Authentication failed";
const PROFILE_FETCH_FAILED: &str = "Could not load profile";
const PROFILE_UPDATE_FAILED: &str = "Could not update profile";
const REFRESH_FAILED: &str = "Session expired, please log in again";
const PASSWORD_CHANGE_FAILED: &str = "Could not change password";

/// Reducer of the session state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionReducer;

impl SessionReducer {
    /// Create a new session reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per transition
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Login / registration
            // ═══════════════════════════════════════════════════════════
            SessionAction::Login {
                request_id,
                credentials,
            } => {
                start(state);
                state.phase = Phase::Authenticating;
                smallvec![sign_in(
                    env,
                    request_id,
                    move |api| async move { api.auth().login(&credentials).await },
                    |name| Notice::Welcome { name },
                )]
            },

            SessionAction::Register {
                request_id,
                registration,
            } => {
                start(state);
                state.phase = Phase::Authenticating;
                smallvec![sign_in(
                    env,
                    request_id,
                    move |api| async move { api.auth().register(&registration).await },
                    |name| Notice::AccountCreated { name },
                )]
            },

            SessionAction::SignedIn { grant, notice, .. } => {
                state.finish_request();
                tracing::info!(user = %grant.user.username, "Session established");
                state.establish(grant);
                state.notice = Some(notice);
                smallvec![Effect::None]
            },

            SessionAction::SignInFailed { error, .. } => {
                state.finish_request();
                tracing::warn!(%error, "Sign-in failed");
                state.teardown(Phase::Anonymous);
                state.record_error(error.display_message(SIGN_IN_FAILED));
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Logout
            // ═══════════════════════════════════════════════════════════
            SessionAction::Logout { request_id } => {
                start(state);
                let remote = state.token.is_some();
                let api = env.api.clone();
                let storage = env.storage();

                smallvec![Effect::guarded(
                    async move {
                        if remote {
                            if let Err(error) = api.auth().logout().await {
                                tracing::warn!(%error, "Remote logout failed, clearing locally");
                            }
                        }
                        wipe(storage.as_ref());
                        SessionAction::LoggedOut { request_id }
                    },
                    move || SessionAction::LoggedOut { request_id },
                )]
            },

            SessionAction::LoggedOut { .. } => {
                state.finish_request();
                tracing::info!("Logged out");
                state.teardown(Phase::Anonymous);
                state.notice = Some(Notice::LoggedOut);
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Profile
            // ═══════════════════════════════════════════════════════════
            SessionAction::FetchProfile { request_id } => {
                start(state);
                let has_token = state.token.is_some();
                let api = env.api.clone();
                let storage = env.storage();

                smallvec![Effect::guarded(
                    async move {
                        let result = if has_token {
                            api.auth().me().await.map_err(SessionError::from)
                        } else {
                            Err(SessionError::MissingToken)
                        };
                        match result {
                            Ok(user) => SessionAction::ProfileFetched { request_id, user },
                            Err(error) => {
                                wipe(storage.as_ref());
                                SessionAction::ProfileFetchFailed { request_id, error }
                            },
                        }
                    },
                    move || SessionAction::ProfileFetchFailed {
                        request_id,
                        error: SessionError::Interrupted,
                    },
                )]
            },

            SessionAction::ProfileFetched { user, .. } => {
                state.finish_request();
                if state.token.is_some() {
                    tracing::debug!(user = %user.username, "Profile verified");
                    state.user = Some(user);
                    state.phase = Phase::Authenticated;
                } else {
                    tracing::debug!("Dropping profile of a session torn down meanwhile");
                }
                smallvec![Effect::None]
            },

            SessionAction::ProfileFetchFailed { error, .. } => {
                state.finish_request();
                tracing::warn!(%error, "Profile fetch failed, logging out");
                state.teardown(Phase::Anonymous);
                state.record_error(error.display_message(PROFILE_FETCH_FAILED));
                smallvec![Effect::None]
            },

            SessionAction::UpdateProfile { request_id, update } => {
                start(state);
                let user_id = state.user.as_ref().map(|user| user.id);
                let api = env.api.clone();

                smallvec![Effect::guarded(
                    async move {
                        let Some(user_id) = user_id else {
                            return SessionAction::ProfileUpdateFailed {
                                request_id,
                                error: SessionError::MissingProfile,
                            };
                        };
                        match api.users().update(user_id, &update).await {
                            Ok(user) => SessionAction::ProfileUpdated { request_id, user },
                            Err(error) => SessionAction::ProfileUpdateFailed {
                                request_id,
                                error: error.into(),
                            },
                        }
                    },
                    move || SessionAction::ProfileUpdateFailed {
                        request_id,
                        error: SessionError::Interrupted,
                    },
                )]
            },

            SessionAction::ProfileUpdated { user, .. } => {
                state.finish_request();
                if state.user.is_some() {
                    state.user = Some(user);
                    state.notice = Some(Notice::ProfileUpdated);
                }
                smallvec![Effect::None]
            },

            SessionAction::ProfileUpdateFailed { error, .. } => {
                state.finish_request();
                tracing::warn!(%error, "Profile update failed");
                state.record_error(error.display_message(PROFILE_UPDATE_FAILED));
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Token refresh
            // ═══════════════════════════════════════════════════════════
            SessionAction::RefreshToken { request_id } => {
                start(state);
                let refresh_token = state.refresh_token.clone();
                let api = env.api.clone();
                let storage = env.storage();

                smallvec![Effect::guarded(
                    async move {
                        let result = match refresh_token {
                            Some(refresh_token) => {
                                match api.auth().refresh(&refresh_token).await {
                                    Ok(grant) => storage
                                        .save(&grant.access_token, None)
                                        .map(|()| grant)
                                        .map_err(SessionError::from),
                                    Err(error) => Err(error.into()),
                                }
                            },
                            None => Err(SessionError::MissingRefreshToken),
                        };
                        match result {
                            Ok(grant) => SessionAction::TokenRefreshed { request_id, grant },
                            Err(error) => {
                                wipe(storage.as_ref());
                                SessionAction::RefreshFailed { request_id, error }
                            },
                        }
                    },
                    move || SessionAction::RefreshFailed {
                        request_id,
                        error: SessionError::Interrupted,
                    },
                )]
            },

            SessionAction::TokenRefreshed { grant, .. } => {
                state.finish_request();
                tracing::info!("Access token refreshed");
                state.renew(grant);
                smallvec![Effect::None]
            },

            SessionAction::RefreshFailed { error, .. } => {
                state.finish_request();
                tracing::warn!(%error, "Token refresh failed, session torn down");
                state.teardown(Phase::RefreshFailed);
                state.record_error(error.display_message(REFRESH_FAILED));
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Password
            // ═══════════════════════════════════════════════════════════
            SessionAction::ChangePassword {
                request_id,
                current_password,
                new_password,
            } => {
                start(state);
                let api = env.api.clone();

                smallvec![Effect::guarded(
                    async move {
                        match api
                            .auth()
                            .change_password(current_password.expose(), new_password.expose())
                            .await
                        {
                            Ok(_) => SessionAction::PasswordChanged { request_id },
                            Err(error) => SessionAction::PasswordChangeFailed {
                                request_id,
                                error: error.into(),
                            },
                        }
                    },
                    move || SessionAction::PasswordChangeFailed {
                        request_id,
                        error: SessionError::Interrupted,
                    },
                )]
            },

            SessionAction::PasswordChanged { .. } => {
                state.finish_request();
                state.notice = Some(Notice::PasswordChanged);
                smallvec![Effect::None]
            },

            SessionAction::PasswordChangeFailed { error, .. } => {
                state.finish_request();
                tracing::warn!(%error, "Password change failed");
                state.record_error(error.display_message(PASSWORD_CHANGE_FAILED));
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Housekeeping
            // ═══════════════════════════════════════════════════════════
            SessionAction::Invalidated => {
                tracing::warn!("Session invalidated by the server");
                state.teardown(Phase::Anonymous);
                smallvec![Effect::None]
            },

            SessionAction::DismissNotice => {
                state.notice = None;
                smallvec![Effect::None]
            },

            SessionAction::ClearError => {
                state.clear_error();
                smallvec![Effect::None]
            },
        }
    }
}

fn start(state: &mut SessionState) {
    state.begin_request();
    state.clear_error();
}

/// Effect of login and registration: call, persist, report.
fn sign_in<F, Fut>(
    env: &SessionEnvironment,
    request_id: RequestId,
    call: F,
    notice: fn(String) -> Notice,
) -> Effect<SessionAction>
where
    F: FnOnce(ApiClient) -> Fut + Send + 'static,
    Fut: Future<Output = cadence_api::Result<AuthGrant>> + Send,
{
    let api = env.api.clone();
    let storage = env.storage();

    Effect::guarded(
        async move {
            let result = match call(api).await {
                Ok(grant) => persist(storage.as_ref(), &grant).map(|()| grant),
                Err(error) => Err(SessionError::from(error)),
            };
            match result {
                Ok(grant) => {
                    let name = grant.user.first_name.clone();
                    SessionAction::SignedIn {
                        request_id,
                        grant,
                        notice: notice(name),
                    }
                },
                Err(error) => {
                    wipe(storage.as_ref());
                    SessionAction::SignInFailed { request_id, error }
                },
            }
        },
        move || SessionAction::SignInFailed {
            request_id,
            error: SessionError::Interrupted,
        },
    )
}

/// Store a sign-in grant. A grant without a refresh token drops the old one.
fn persist(storage: &dyn TokenStorage, grant: &AuthGrant) -> Result<(), SessionError> {
    let cleared = match grant.refresh_token {
        Some(_) => Ok(()),
        None => storage.clear().map(|_| ()),
    };
    cleared
        .and_then(|()| storage.save(&grant.access_token, grant.refresh_token.as_deref()))
        .map_err(|error| {
            tracing::error!(%error, "Failed to persist tokens");
            SessionError::from(error)
        })
}

fn wipe(storage: &dyn TokenStorage) {
    if let Err(error) = storage.clear() {
        tracing::error!(%error, "Failed to clear token storage");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cadence_api::{ApiConfig, ApiError, MemoryTokenStorage, Profile};
    use std::sync::Arc;
    use cadence_testing::{assertions, ReducerTest};

    fn test_env() -> SessionEnvironment {
        let api = ApiClient::new(
            ApiConfig::new("http://127.0.0.1:9"),
            Arc::new(MemoryTokenStorage::new()),
        )
        .unwrap();
        SessionEnvironment::new(api)
    }

    fn ada() -> Profile {
        Profile {
            id: 1,
            username: "ada".into(),
            first_name: "Ada".into(),
            ..Profile::default()
        }
    }

    fn grant() -> AuthGrant {
        serde_json::from_value(serde_json::json!({
            "user": {"id": 1, "username": "ada", "first_name": "Ada"},
            "access_token": "access-1",
            "refresh_token": "refresh-1"
        }))
        .unwrap()
    }

    fn signed_in() -> SessionState {
        SessionState {
            phase: Phase::Authenticated,
            token: Some("access-1".into()),
            refresh_token: Some("refresh-1".into()),
            user: Some(ada()),
            ..SessionState::default()
        }
    }

    #[test]
    fn test_login_enters_authenticating() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState::default())
            .when_action(SessionAction::Login {
                request_id: RequestId::new(),
                credentials: cadence_api::Credentials::new("ada", "pw"),
            })
            .then_state(|state| {
                assert_eq!(state.phase, Phase::Authenticating);
                assert!(state.is_loading());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_signed_in_establishes_session() {
        let id = RequestId::new();
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState {
                phase: Phase::Authenticating,
                pending: 1,
                ..SessionState::default()
            })
            .when_action(SessionAction::SignedIn {
                request_id: id,
                grant: grant(),
                notice: Notice::Welcome { name: "Ada".into() },
            })
            .then_state(|state| {
                assert!(state.is_authenticated());
                assert_eq!(state.phase, Phase::Authenticated);
                assert_eq!(state.refresh_token.as_deref(), Some("refresh-1"));
                assert_eq!(state.notice, Some(Notice::Welcome { name: "Ada".into() }));
                assert!(!state.is_loading());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_sign_in_without_refresh_token_drops_the_old_one() {
        let fresh: AuthGrant = serde_json::from_value(serde_json::json!({
            "user": {"id": 1, "username": "ada"},
            "access_token": "access-2"
        }))
        .unwrap();

        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState {
                phase: Phase::Authenticating,
                pending: 1,
                ..signed_in()
            })
            .when_action(SessionAction::SignedIn {
                request_id: RequestId::new(),
                grant: fresh,
                notice: Notice::Welcome { name: "Ada".into() },
            })
            .then_state(|state| {
                assert_eq!(state.token.as_deref(), Some("access-2"));
                assert!(state.refresh_token.is_none());
            })
            .run();
    }

    #[test]
    fn test_sign_in_failure_clears_everything() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState {
                phase: Phase::Authenticating,
                pending: 1,
                ..signed_in()
            })
            .when_action(SessionAction::SignInFailed {
                request_id: RequestId::new(),
                error: ApiError::from_status(401, Some("Credenciais inválidas".into())).into(),
            })
            .then_state(|state| {
                assert_eq!(state.phase, Phase::Anonymous);
                assert!(state.token.is_none());
                assert!(state.user.is_none());
                assert_eq!(state.last_error(), Some("Credenciais inválidas"));
                assert!(!state.is_loading());
            })
            .run();
    }

    #[test]
    fn test_refresh_failure_lands_in_refresh_failed() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(signed_in())
            .when_action(SessionAction::RefreshFailed {
                request_id: RequestId::new(),
                error: SessionError::MissingRefreshToken,
            })
            .then_state(|state| {
                assert_eq!(state.phase, Phase::RefreshFailed);
                assert!(!state.is_authenticated());
                assert!(state.refresh_token.is_none());
                assert_eq!(state.last_error(), Some(REFRESH_FAILED));
            })
            .run();
    }

    #[test]
    fn test_token_refreshed_keeps_refresh_token() {
        let refreshed: AuthGrant = serde_json::from_value(serde_json::json!({
            "user": {"id": 1, "username": "ada"},
            "access_token": "access-2"
        }))
        .unwrap();

        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(signed_in())
            .when_action(SessionAction::TokenRefreshed {
                request_id: RequestId::new(),
                grant: refreshed,
            })
            .then_state(|state| {
                assert_eq!(state.token.as_deref(), Some("access-2"));
                assert_eq!(state.refresh_token.as_deref(), Some("refresh-1"));
            })
            .run();
    }

    #[test]
    fn test_late_profile_after_teardown_is_dropped() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState::default())
            .when_action(SessionAction::ProfileFetched {
                request_id: RequestId::new(),
                user: ada(),
            })
            .then_state(|state| {
                assert!(state.user.is_none());
                assert!(!state.is_authenticated());
            })
            .run();
    }

    #[test]
    fn test_password_change_failure_keeps_session() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(signed_in())
            .when_action(SessionAction::PasswordChangeFailed {
                request_id: RequestId::new(),
                error: ApiError::from_status(400, Some("Senha atual incorreta".into())).into(),
            })
            .then_state(|state| {
                assert!(state.is_authenticated());
                assert_eq!(state.last_error(), Some("Senha atual incorreta"));
            })
            .run();
    }

    #[test]
    fn test_invalidated_and_notices() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState {
                notice: Some(Notice::PasswordChanged),
                ..signed_in()
            })
            .when_actions([SessionAction::DismissNotice, SessionAction::Invalidated])
            .then_state(|state| {
                assert_eq!(state.phase, Phase::Anonymous);
                assert!(state.notice.is_none());
                assert!(!state.is_authenticated());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
