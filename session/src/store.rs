//! Session façade.
//!
//! [`SessionStore`] wraps the runtime [`Store`] and turns every operation
//! into a command action plus a wait for its result event. It also installs
//! the client's unauthorized hook, so a 401 on any call tears the session
//! down through the same reducer.

use crate::actions::{Secret, SessionAction};
use crate::config::SessionConfig;
use crate::environment::SessionEnvironment;
use crate::error::{Result, SessionError};
use crate::reducer::SessionReducer;
use crate::state::{Notice, Phase, SessionState};
use cadence_api::{
    ApiClient, Credentials, Profile, ProfileUpdate, Registration, TokenStorage, UnauthorizedHook,
};
use cadence_core::action::{Correlated, RequestId};
use cadence_runtime::Store;
use futures::future::{BoxFuture, FutureExt};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

type SessionRuntime = Store<SessionState, SessionAction, SessionEnvironment, SessionReducer>;

/// Client-side session: tokens, profile and the operations that change them.
///
/// Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<SessionRuntime>,
    config: SessionConfig,
    profile_gate: Arc<Mutex<()>>,
}

impl SessionStore {
    /// Create the session of `api`.
    ///
    /// The initial state is restored from the client's token storage: a
    /// stored token starts the session authenticated with the profile still
    /// to be verified (see [`SessionStore::initialize`]).
    #[must_use]
    pub fn new(api: ApiClient, config: SessionConfig) -> Self {
        let storage = Arc::clone(api.storage());
        let initial = SessionState::restore(storage.access_token(), storage.refresh_token());
        tracing::debug!(phase = ?initial.phase, "Session restored from storage");

        let store = Arc::new(Store::new(
            initial,
            SessionReducer::new(),
            SessionEnvironment::new(api.clone()),
        ));

        let hook = SessionInvalidator {
            store: Arc::downgrade(&store),
            storage,
        };
        if !api.install_unauthorized_hook(Arc::new(hook)) {
            tracing::warn!("Client already has an unauthorized hook; 401 teardowns bypass this session");
        }

        Self {
            store,
            config,
            profile_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Verify a token restored at startup by fetching its profile.
    ///
    /// A failed fetch leaves the session anonymous and is not an error;
    /// only an unavailable store is.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Runtime`] if the store did not answer.
    pub async fn initialize(&self) -> Result<()> {
        match self.ensure_profile().await {
            Ok(_) => Ok(()),
            Err(SessionError::Runtime(error)) => Err(SessionError::Runtime(error)),
            Err(error) => {
                tracing::warn!(%error, "Stored session could not be verified");
                Ok(())
            },
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Operations
    // ═══════════════════════════════════════════════════════════

    /// Log in and persist both tokens.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection, or [`SessionError::Storage`] if the
    /// tokens could not be persisted. The session is anonymous afterwards.
    pub async fn login(&self, credentials: Credentials) -> Result<Profile> {
        match self
            .request(|request_id| SessionAction::Login {
                request_id,
                credentials,
            })
            .await?
        {
            SessionAction::SignedIn { grant, .. } => Ok(grant.user),
            SessionAction::SignInFailed { error, .. } => Err(error),
            other => Err(unexpected(&other)),
        }
    }

    /// Create an account and start its session.
    ///
    /// # Errors
    ///
    /// Same as [`SessionStore::login`].
    pub async fn register(&self, registration: Registration) -> Result<Profile> {
        match self
            .request(|request_id| SessionAction::Register {
                request_id,
                registration,
            })
            .await?
        {
            SessionAction::SignedIn { grant, .. } => Ok(grant.user),
            SessionAction::SignInFailed { error, .. } => Err(error),
            other => Err(unexpected(&other)),
        }
    }

    /// End the session. Local teardown always happens; a failing remote
    /// logout is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Runtime`] if the store did not answer.
    pub async fn logout(&self) -> Result<()> {
        match self
            .request(|request_id| SessionAction::Logout { request_id })
            .await?
        {
            SessionAction::LoggedOut { .. } => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    /// Refetch the profile of the held token. Failure logs the session out.
    ///
    /// # Errors
    ///
    /// [`SessionError::MissingToken`] without a token, otherwise the
    /// backend's error.
    pub async fn get_current_user(&self) -> Result<Profile> {
        match self
            .request(|request_id| SessionAction::FetchProfile { request_id })
            .await?
        {
            SessionAction::ProfileFetched { user, .. } => Ok(user),
            SessionAction::ProfileFetchFailed { error, .. } => Err(error),
            other => Err(unexpected(&other)),
        }
    }

    /// Fetch the profile only if a token is held without one.
    ///
    /// Concurrent callers share a single fetch: the condition is re-checked
    /// once the gate is acquired.
    ///
    /// # Errors
    ///
    /// Same as [`SessionStore::get_current_user`].
    pub async fn ensure_profile(&self) -> Result<Option<Profile>> {
        let _gate = self.profile_gate.lock().await;
        if self.store.state(SessionState::needs_profile).await {
            self.get_current_user().await.map(Some)
        } else {
            Ok(self.user().await)
        }
    }

    /// Exchange the refresh token for a new bearer token.
    ///
    /// # Errors
    ///
    /// [`SessionError::MissingRefreshToken`] or the backend's error. Either
    /// way the session is torn down into [`Phase::RefreshFailed`].
    pub async fn refresh_access_token(&self) -> Result<()> {
        match self
            .request(|request_id| SessionAction::RefreshToken { request_id })
            .await?
        {
            SessionAction::TokenRefreshed { .. } => Ok(()),
            SessionAction::RefreshFailed { error, .. } => Err(error),
            other => Err(unexpected(&other)),
        }
    }

    /// Change the account password. Session fields are untouched.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (e.g. a wrong current password).
    pub async fn change_password(
        &self,
        current_password: impl Into<String>,
        new_password: impl Into<String>,
    ) -> Result<()> {
        let current_password = Secret::new(current_password);
        let new_password = Secret::new(new_password);
        match self
            .request(|request_id| SessionAction::ChangePassword {
                request_id,
                current_password,
                new_password,
            })
            .await?
        {
            SessionAction::PasswordChanged { .. } => Ok(()),
            SessionAction::PasswordChangeFailed { error, .. } => Err(error),
            other => Err(unexpected(&other)),
        }
    }

    /// Change profile fields; the stored profile becomes the server's answer.
    ///
    /// # Errors
    ///
    /// [`SessionError::MissingProfile`] when anonymous, otherwise the
    /// backend's error.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile> {
        match self
            .request(|request_id| SessionAction::UpdateProfile { request_id, update })
            .await?
        {
            SessionAction::ProfileUpdated { user, .. } => Ok(user),
            SessionAction::ProfileUpdateFailed { error, .. } => Err(error),
            other => Err(unexpected(&other)),
        }
    }

    /// Forget the current notice.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Runtime`] if the store is shutting down.
    pub async fn dismiss_notice(&self) -> Result<()> {
        self.store.send(SessionAction::DismissNotice).await?;
        Ok(())
    }

    /// Forget the last error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Runtime`] if the store is shutting down.
    pub async fn clear_error(&self) -> Result<()> {
        self.store.send(SessionAction::ClearError).await?;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════
    // Getters
    // ═══════════════════════════════════════════════════════════

    /// Read the state through a closure.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&SessionState) -> T,
    {
        self.store.state(f).await
    }

    /// Token and profile are both held.
    pub async fn is_authenticated(&self) -> bool {
        self.state(SessionState::is_authenticated).await
    }

    /// The profile carries the administrator flag.
    pub async fn is_admin(&self) -> bool {
        self.state(SessionState::is_admin).await
    }

    /// "First Last", empty when anonymous.
    pub async fn full_name(&self) -> String {
        self.state(SessionState::full_name).await
    }

    /// A token is held but its profile is still unverified.
    pub async fn needs_profile(&self) -> bool {
        self.state(SessionState::needs_profile).await
    }

    /// Current profile.
    pub async fn user(&self) -> Option<Profile> {
        self.state(|s| s.user.clone()).await
    }

    /// Lifecycle phase.
    pub async fn phase(&self) -> Phase {
        self.state(|s| s.phase).await
    }

    /// Whether a session request is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state(SessionState::is_loading).await
    }

    /// Last recorded failure message.
    pub async fn last_error(&self) -> Option<String> {
        self.state(|s| s.last_error().map(str::to_string)).await
    }

    /// Pending acknowledgment.
    pub async fn notice(&self) -> Option<Notice> {
        self.state(|s| s.notice.clone()).await
    }

    /// Observe every reduced session action.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<SessionAction> {
        self.store.subscribe_actions()
    }

    /// The client this session authenticates.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.store.environment().api
    }

    /// Stop accepting operations and wait for running ones.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Runtime`] if requests are still running at
    /// the deadline.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }

    async fn request<F>(&self, command: F) -> Result<SessionAction>
    where
        F: FnOnce(RequestId) -> SessionAction,
    {
        let request_id = RequestId::new();
        let answer = self
            .store
            .send_and_wait_for(
                command(request_id),
                move |action| action.is_event() && action.answers(request_id),
                self.config.request_timeout,
            )
            .await?;
        Ok(answer)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn unexpected(action: &SessionAction) -> SessionError {
    tracing::error!(?action, "Request answered by an unrelated event");
    SessionError::Interrupted
}

/// Unauthorized hook tearing the session down after a 401.
///
/// Holds the store weakly: the store's environment owns the client, which
/// owns this hook.
struct SessionInvalidator {
    store: Weak<SessionRuntime>,
    storage: Arc<dyn TokenStorage>,
}

impl UnauthorizedHook for SessionInvalidator {
    fn on_unauthorized(&self) -> BoxFuture<'_, bool> {
        async move {
            let cleared = self.storage.clear().unwrap_or_else(|error| {
                tracing::error!(%error, "Failed to clear token storage after 401");
                true
            });
            if !cleared {
                return false;
            }

            if let Some(store) = self.store.upgrade() {
                if let Err(error) = store.send(SessionAction::Invalidated).await {
                    tracing::warn!(%error, "Session store rejected invalidation");
                }
            }
            true
        }
        .boxed()
    }
}
