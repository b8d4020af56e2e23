//! Route table.
//!
//! Patterns are `/`-separated segments; a `:name` segment captures one path
//! segment and `*` matches any remaining path. Routes are tried in order, so
//! a catch-all goes last.

use std::collections::BTreeMap;

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Anyone.
    Public,
    /// Only sessions without a user (login, register).
    Guest,
    /// Authenticated sessions.
    Authenticated,
    /// Authenticated sessions whose profile has the admin flag.
    Admin,
}

impl Access {
    /// Whether the route needs an authenticated session.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::Authenticated | Self::Admin)
    }
}

/// One entry of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Route name, e.g. `"TaskListDetail"`
    pub name: &'static str,
    /// Path pattern, e.g. `"/task-lists/:id"`
    pub pattern: &'static str,
    /// Who may enter
    pub access: Access,
}

impl Route {
    /// A route named `name` on `pattern`.
    #[must_use]
    pub const fn new(name: &'static str, pattern: &'static str, access: Access) -> Self {
        Self {
            name,
            pattern,
            access,
        }
    }

    /// Match `path` (no query string), returning the captured parameters.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        let mut remaining = segments(path);

        for expected in segments(self.pattern) {
            if expected == "*" {
                return Some(params);
            }
            let actual = remaining.next()?;
            if let Some(name) = expected.strip_prefix(':') {
                params.insert(name.to_string(), actual.to_string());
            } else if expected != actual {
                return None;
            }
        }

        remaining.next().is_none().then_some(params)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// A route matched against a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// The matching route
    pub route: Route,
    /// Captured `:name` segments
    pub params: BTreeMap<String, String>,
}

/// Ordered set of routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// A table of `routes`, tried in order.
    #[must_use]
    pub const fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The first route matching `path`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        self.routes.iter().find_map(|route| {
            route.matches(path).map(|params| RouteMatch {
                route: *route,
                params,
            })
        })
    }

    /// The route named `name`.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// All routes, in match order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Default for RouteTable {
    /// The application's routes, ending with a public catch-all.
    fn default() -> Self {
        use Access::{Admin, Authenticated, Guest, Public};

        Self::new(vec![
            Route::new("Home", "/", Authenticated),
            Route::new("Login", "/login", Guest),
            Route::new("Register", "/register", Guest),
            Route::new("TaskLists", "/task-lists", Authenticated),
            Route::new("TaskListDetail", "/task-lists/:id", Authenticated),
            Route::new("Tasks", "/tasks", Authenticated),
            Route::new("Dashboard", "/dashboard", Authenticated),
            Route::new("Music", "/music", Authenticated),
            Route::new("MusicSearch", "/music/search", Authenticated),
            Route::new("MusicUpload", "/music/upload", Authenticated),
            Route::new("Playlists", "/playlists", Authenticated),
            Route::new("PlaylistDetail", "/playlists/:id", Authenticated),
            Route::new("Profile", "/profile", Authenticated),
            Route::new("Users", "/users", Admin),
            Route::new("NotFound", "/*", Public),
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_static_routes_resolve_by_name() {
        let table = RouteTable::default();

        assert_eq!(table.resolve("/").unwrap().route.name, "Home");
        assert_eq!(table.resolve("/music/search").unwrap().route.name, "MusicSearch");
        assert_eq!(table.resolve("/users").unwrap().route.access, Access::Admin);
        assert_eq!(table.resolve("/login/").unwrap().route.name, "Login");
    }

    #[test]
    fn test_parameters_are_captured() {
        let matched = RouteTable::default().resolve("/playlists/42").unwrap();

        assert_eq!(matched.route.name, "PlaylistDetail");
        assert_eq!(matched.params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_unknown_paths_hit_the_catch_all() {
        let table = RouteTable::default();

        let matched = table.resolve("/playlists/42/extra").unwrap();
        assert_eq!(matched.route.name, "NotFound");
        assert_eq!(matched.route.access, Access::Public);
        assert_eq!(table.resolve("/nope").unwrap().route.name, "NotFound");
    }

    #[test]
    fn test_table_without_catch_all_can_miss() {
        let table = RouteTable::new(vec![Route::new("Home", "/", Access::Public)]);

        assert!(table.resolve("/elsewhere").is_none());
        assert!(table.named("Home").is_some());
    }
}
