//! Navigation guard.
//!
//! Rules, first match wins:
//!
//! 1. a session holding a token but no profile fetches the profile first;
//!    if that fails the session is logged out and treated as anonymous
//! 2. routes needing authentication send anonymous sessions to the login
//!    route, carrying the original path as `redirect`
//! 3. guest routes send authenticated sessions home
//! 4. admin routes send non-admins home
//! 5. everything else is allowed

use crate::config::GuardConfig;
use crate::location::login_redirect;
use crate::route::{Access, Route};
use cadence_session::SessionStore;
use std::future::Future;

/// The session facts the guard decides on.
pub trait SessionGate: Send + Sync {
    /// Make sure a held token has its profile loaded.
    ///
    /// Concurrent callers share one fetch. If the fetch fails the session is
    /// torn down; the guard then sees an anonymous session.
    fn resolve_profile(&self) -> impl Future<Output = ()> + Send;

    /// Whether the session holds a token and a profile.
    fn is_authenticated(&self) -> impl Future<Output = bool> + Send;

    /// Whether the profile has the admin flag.
    fn is_admin(&self) -> impl Future<Output = bool> + Send;
}

impl SessionGate for SessionStore {
    async fn resolve_profile(&self) {
        if let Err(error) = self.ensure_profile().await {
            tracing::warn!(%error, "Profile fetch failed, continuing as anonymous");
            if let Err(error) = self.logout().await {
                tracing::warn!(%error, "Logout after profile failure did not complete");
            }
        }
    }

    async fn is_authenticated(&self) -> bool {
        Self::is_authenticated(self).await
    }

    async fn is_admin(&self) -> bool {
        Self::is_admin(self).await
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Enter the route.
    Allow,
    /// Navigate here instead.
    Redirect(String),
}

/// Decides whether the session may enter a route.
#[derive(Debug, Clone)]
pub struct Guard<G> {
    gate: G,
    config: GuardConfig,
}

impl<G: SessionGate> Guard<G> {
    /// Guard on `gate`.
    #[must_use]
    pub const fn new(gate: G, config: GuardConfig) -> Self {
        Self { gate, config }
    }

    /// Decide whether the session may enter `route`, reached through
    /// `full_path`.
    pub async fn check(&self, route: &Route, full_path: &str) -> Decision {
        self.gate.resolve_profile().await;
        let authenticated = self.gate.is_authenticated().await;

        match route.access {
            access if access.requires_auth() && !authenticated => {
                Decision::Redirect(login_redirect(&self.config.login_route, full_path))
            },
            Access::Guest if authenticated => Decision::Redirect(self.config.home_route.clone()),
            Access::Admin if !self.gate.is_admin().await => {
                Decision::Redirect(self.config.home_route.clone())
            },
            _ => Decision::Allow,
        }
    }

    /// The session behind the guard.
    pub const fn gate(&self) -> &G {
        &self.gate
    }

    /// Guard configuration.
    pub const fn config(&self) -> &GuardConfig {
        &self.config
    }
}
