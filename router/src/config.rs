//! Guard configuration.

/// Default cap on redirects followed by one navigation.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Where the guard sends sessions it turns away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Login route; unauthenticated sessions land here with a `redirect`
    /// query value.
    ///
    /// Default: `/login`
    pub login_route: String,

    /// Home route; authenticated sessions leaving guest routes and
    /// non-admins leaving admin routes land here.
    ///
    /// Default: `/`
    pub home_route: String,

    /// Redirects one navigation may follow before giving up.
    ///
    /// Default: 5
    pub max_redirects: usize,
}

impl GuardConfig {
    /// Configuration with the default routes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            login_route: "/login".to_string(),
            home_route: "/".to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Set the login route.
    #[must_use]
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    /// Set the home route.
    #[must_use]
    pub fn with_home_route(mut self, route: impl Into<String>) -> Self {
        self.home_route = route.into();
        self
    }

    /// Set the redirect cap.
    #[must_use]
    pub const fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::new()
    }
}
