//! Session actions.
//!
//! Commands come from the [`SessionStore`](crate::SessionStore) façade; events
//! are fed back by effects once the backend answered. A command and its
//! result event share a `request_id`.

use crate::error::SessionError;
use crate::state::Notice;
use cadence_api::{AuthGrant, Credentials, Profile, ProfileUpdate, Registration};
use cadence_core::action::RequestId;
use cadence_macros::Action;
use std::fmt;

/// A string that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The wrapped value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Session action.
#[derive(Action, Clone, Debug)]
pub enum SessionAction {
    // ═══════════════════════════════════════════════════════════
    // Login / registration
    // ═══════════════════════════════════════════════════════════

    /// Exchange credentials for a session.
    #[command]
    Login {
        /// Correlation id
        request_id: RequestId,
        /// Username or e-mail plus password
        credentials: Credentials,
    },

    /// Create an account and start its session.
    #[command]
    Register {
        /// Correlation id
        request_id: RequestId,
        /// Account fields
        registration: Registration,
    },

    /// Login or registration succeeded; tokens are already persisted.
    #[event]
    SignedIn {
        /// Correlation id
        request_id: RequestId,
        /// Granted tokens and profile
        grant: AuthGrant,
        /// Acknowledgment to surface
        notice: Notice,
    },

    /// Login or registration failed; storage is already cleared.
    #[event]
    SignInFailed {
        /// Correlation id
        request_id: RequestId,
        /// Cause
        error: SessionError,
    },

    // ═══════════════════════════════════════════════════════════
    // Logout
    // ═══════════════════════════════════════════════════════════

    /// End the session, remotely when a token is held.
    #[command]
    Logout {
        /// Correlation id
        request_id: RequestId,
    },

    /// Storage is cleared; the remote outcome is irrelevant.
    #[event]
    LoggedOut {
        /// Correlation id
        request_id: RequestId,
    },

    // ═══════════════════════════════════════════════════════════
    // Profile
    // ═══════════════════════════════════════════════════════════

    /// Refetch the profile of the held token.
    #[command]
    FetchProfile {
        /// Correlation id
        request_id: RequestId,
    },

    /// Fresh profile.
    #[event]
    ProfileFetched {
        /// Correlation id
        request_id: RequestId,
        /// Canonical profile
        user: Profile,
    },

    /// The profile could not be fetched; the session is torn down.
    #[event]
    ProfileFetchFailed {
        /// Correlation id
        request_id: RequestId,
        /// Cause
        error: SessionError,
    },

    /// Change profile fields.
    #[command]
    UpdateProfile {
        /// Correlation id
        request_id: RequestId,
        /// Fields to change
        update: ProfileUpdate,
    },

    /// The server accepted the change.
    #[event]
    ProfileUpdated {
        /// Correlation id
        request_id: RequestId,
        /// Canonical profile after the change
        user: Profile,
    },

    /// The change was rejected; the session is untouched.
    #[event]
    ProfileUpdateFailed {
        /// Correlation id
        request_id: RequestId,
        /// Cause
        error: SessionError,
    },

    // ═══════════════════════════════════════════════════════════
    // Token refresh
    // ═══════════════════════════════════════════════════════════

    /// Exchange the refresh token for a new bearer token.
    #[command]
    RefreshToken {
        /// Correlation id
        request_id: RequestId,
    },

    /// New bearer token persisted.
    #[event]
    TokenRefreshed {
        /// Correlation id
        request_id: RequestId,
        /// New bearer token and profile
        grant: AuthGrant,
    },

    /// The refresh failed; storage is cleared.
    #[event]
    RefreshFailed {
        /// Correlation id
        request_id: RequestId,
        /// Cause
        error: SessionError,
    },

    // ═══════════════════════════════════════════════════════════
    // Password
    // ═══════════════════════════════════════════════════════════

    /// Change the account password.
    #[command]
    ChangePassword {
        /// Correlation id
        request_id: RequestId,
        /// Current password
        current_password: Secret,
        /// Replacement password
        new_password: Secret,
    },

    /// Password changed.
    #[event]
    PasswordChanged {
        /// Correlation id
        request_id: RequestId,
    },

    /// Password change rejected.
    #[event]
    PasswordChangeFailed {
        /// Correlation id
        request_id: RequestId,
        /// Cause
        error: SessionError,
    },

    // ═══════════════════════════════════════════════════════════
    // Housekeeping
    // ═══════════════════════════════════════════════════════════

    /// The backend answered 401 and storage was cleared by the client hook.
    #[event]
    Invalidated,

    /// Forget the current notice.
    #[command]
    DismissNotice,

    /// Forget the last error.
    #[command]
    ClearError,
}
