//! Navigator: resolves targets, runs the guard, commits locations.
//!
//! Every navigation takes a generation number. Only the latest navigation
//! may commit, so a slow guard check (a profile fetch) that finishes after
//! the user has moved on is dropped instead of overwriting the newer
//! location.

use crate::config::GuardConfig;
use crate::error::{NavigationError, Result};
use crate::guard::{Decision, Guard, SessionGate};
use crate::location::{split_target, Location};
use crate::route::RouteTable;
use cadence_api::Redirect;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// Outcome of [`Navigator::navigate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The location was entered (possibly after redirects).
    Committed(Location),
    /// A later navigation started before this one finished.
    Superseded,
}

struct Inner<G> {
    routes: RouteTable,
    guard: Guard<G>,
    generation: AtomicU64,
    location: watch::Sender<Option<Location>>,
}

/// Guarded navigation over a route table.
///
/// Cheap to clone; clones share the current location.
pub struct Navigator<G> {
    inner: Arc<Inner<G>>,
}

impl<G> Clone for Navigator<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: SessionGate> Navigator<G> {
    /// Navigator over the application's default routes.
    #[must_use]
    pub fn new(gate: G, config: GuardConfig) -> Self {
        Self::with_routes(RouteTable::default(), gate, config)
    }

    /// Navigator over `routes`.
    #[must_use]
    pub fn with_routes(routes: RouteTable, gate: G, config: GuardConfig) -> Self {
        let (location, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                routes,
                guard: Guard::new(gate, config),
                generation: AtomicU64::new(0),
                location,
            }),
        }
    }

    /// Navigate to `target` (a path with an optional query string).
    ///
    /// Guard redirects are followed until a route admits the session.
    ///
    /// # Errors
    ///
    /// - [`NavigationError::UnknownRoute`] if a target matches no route
    /// - [`NavigationError::RedirectLoop`] if the guard redirects more than
    ///   the configured maximum
    pub async fn navigate(&self, target: &str) -> Result<Navigation> {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let max_redirects = self.inner.guard.config().max_redirects;
        let mut current = target.to_string();

        for _ in 0..=max_redirects {
            let (path, query) = split_target(&current);
            let matched = self
                .inner
                .routes
                .resolve(path)
                .ok_or_else(|| NavigationError::UnknownRoute(path.to_string()))?;

            let decision = self.inner.guard.check(&matched.route, &current).await;
            if self.is_stale(generation) {
                tracing::debug!(path = %current, "Navigation superseded");
                return Ok(Navigation::Superseded);
            }

            match decision {
                Decision::Allow => {
                    let location = Location::new(path, query, matched);
                    tracing::info!(
                        path = %location.full_path(),
                        route = location.route,
                        "Navigated"
                    );
                    self.inner.location.send_replace(Some(location.clone()));
                    return Ok(Navigation::Committed(location));
                },
                Decision::Redirect(next) => {
                    tracing::debug!(from = %current, to = %next, "Guard redirected");
                    current = next;
                },
            }
        }

        tracing::warn!(path = %target, last = %current, max_redirects, "Redirect loop");
        Err(NavigationError::RedirectLoop {
            target: target.to_string(),
            last: current,
        })
    }

    /// After login: the current location's `redirect` value, or home.
    ///
    /// Only same-origin paths are honoured; `//host` and `/\host` are not.
    #[must_use]
    pub fn redirect_target(&self) -> String {
        self.current()
            .and_then(|location| location.query_value("redirect"))
            .filter(|target| {
                target.starts_with('/')
                    && !target.starts_with("//")
                    && !target.starts_with("/\\")
            })
            .unwrap_or_else(|| self.inner.guard.config().home_route.clone())
    }

    /// Follow client redirects (the login redirect after a 401 teardown)
    /// until the channel closes.
    pub fn follow_redirects(&self, mut redirects: broadcast::Receiver<Redirect>) -> JoinHandle<()>
    where
        G: 'static,
    {
        let navigator = self.clone();
        tokio::spawn(async move {
            loop {
                match redirects.recv().await {
                    Ok(Redirect { to }) => {
                        if let Err(error) = navigator.navigate(&to).await {
                            tracing::warn!(%error, %to, "Client redirect failed");
                        }
                    },
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Redirect listener lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// The committed location, if any.
    #[must_use]
    pub fn current(&self) -> Option<Location> {
        self.inner.location.borrow().clone()
    }

    /// Watch committed locations.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Location>> {
        self.inner.location.subscribe()
    }

    /// Route table in use.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    /// Session behind the guard.
    #[must_use]
    pub fn gate(&self) -> &G {
        self.inner.guard.gate()
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) != generation
    }
}

impl<G> std::fmt::Debug for Navigator<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("generation", &self.inner.generation.load(Ordering::SeqCst))
            .field("location", &*self.inner.location.borrow())
            .finish_non_exhaustive()
    }
}
