//! Session state.

use cadence_api::{AuthGrant, Profile};
use cadence_macros::State;
use std::fmt;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No credentials held.
    #[default]
    Anonymous,
    /// A login or registration is in flight.
    Authenticating,
    /// Credentials held. The profile may still be pending verification
    /// right after a restart.
    Authenticated,
    /// The last refresh failed and the session was torn down. Anonymous for
    /// every purpose.
    RefreshFailed,
}

/// Acknowledgment shown to the user after a session transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Logged in.
    Welcome {
        /// Greeting name (the profile's first name)
        name: String,
    },
    /// Registered and logged in.
    AccountCreated {
        /// Greeting name (the profile's first name)
        name: String,
    },
    /// Logged out.
    LoggedOut,
    /// Password changed.
    PasswordChanged,
    /// Profile updated.
    ProfileUpdated,
}

/// Session state.
///
/// `is_authenticated()` holds exactly when both a token and a profile are
/// present. Every teardown clears token, refresh token and profile together.
#[derive(State, Clone, Default)]
pub struct SessionState {
    /// Lifecycle phase
    pub phase: Phase,
    /// Bearer token
    pub token: Option<String>,
    /// Refresh token
    pub refresh_token: Option<String>,
    /// Authenticated profile
    pub user: Option<Profile>,
    /// Last acknowledgment, until dismissed
    pub notice: Option<Notice>,
    /// Requests in flight
    #[loading]
    pub pending: usize,
    /// Last failure message
    #[last_error]
    pub error: Option<String>,
}

impl SessionState {
    /// State at process start, from whatever durable storage holds.
    ///
    /// A stored token starts the session optimistically authenticated with
    /// the profile still to be fetched.
    #[must_use]
    pub fn restore(token: Option<String>, refresh_token: Option<String>) -> Self {
        let phase = if token.is_some() {
            Phase::Authenticated
        } else {
            Phase::Anonymous
        };
        Self {
            phase,
            token,
            refresh_token,
            ..Self::default()
        }
    }

    /// Token and profile are both present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// The profile carries the administrator flag.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_admin)
    }

    /// "First Last" of the profile, empty when anonymous.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.user.as_ref().map(Profile::full_name).unwrap_or_default()
    }

    /// A token is held but its profile has not been fetched yet.
    #[must_use]
    pub const fn needs_profile(&self) -> bool {
        self.token.is_some() && self.user.is_none()
    }

    /// Sign-in: the grant replaces both tokens.
    pub(crate) fn establish(&mut self, grant: AuthGrant) {
        self.token = Some(grant.access_token);
        self.refresh_token = grant.refresh_token;
        self.user = Some(grant.user);
        self.phase = Phase::Authenticated;
    }

    /// Refresh: a grant without a refresh token keeps the current one.
    pub(crate) fn renew(&mut self, grant: AuthGrant) {
        let kept = self.refresh_token.take();
        self.establish(grant);
        if self.refresh_token.is_none() {
            self.refresh_token = kept;
        }
    }

    pub(crate) fn teardown(&mut self, phase: Phase) {
        self.token = None;
        self.refresh_token = None;
        self.user = None;
        self.phase = phase;
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("phase", &self.phase)
            .field("has_token", &self.token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("user", &self.user.as_ref().map(|u| &u.username))
            .field("notice", &self.notice)
            .field("pending", &self.pending)
            .field("error", &self.error)
            .finish()
    }
}
