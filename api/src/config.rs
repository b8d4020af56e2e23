//! REST adapter configuration.

use std::time::Duration;

/// Environment variable holding the API base URL.
pub const API_URL_VAR: &str = "CADENCE_API_URL";

/// Environment variable holding the request timeout in seconds.
pub const API_TIMEOUT_VAR: &str = "CADENCE_API_TIMEOUT_SECS";

/// Base URL used when [`API_URL_VAR`] is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration of the [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every request path is appended to (no trailing slash).
    ///
    /// Default: `http://localhost:5000/api`
    pub base_url: String,

    /// Per-request timeout.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// Route published on the redirect channel after a 401 tore the
    /// session down.
    ///
    /// Default: `/login`
    pub login_path: String,
}

impl ApiConfig {
    /// Create a configuration for `base_url` with default timeout and login path.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(base_url.into()),
            ..Self::default()
        }
    }

    /// Read `CADENCE_API_URL` and `CADENCE_API_TIMEOUT_SECS`, falling back to
    /// the defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(API_URL_VAR) {
            if !url.trim().is_empty() {
                config.base_url = normalize(url);
            }
        }

        match std::env::var(API_TIMEOUT_VAR).map(|raw| raw.trim().parse::<u64>()) {
            Ok(Ok(secs)) if secs > 0 => config.timeout = Duration::from_secs(secs),
            Ok(_) => tracing::warn!(var = API_TIMEOUT_VAR, "Ignoring invalid timeout"),
            Err(_) => {},
        }

        config
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the route published after a 401.
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Join `path` onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            login_path: "/login".to_string(),
        }
    }
}

fn normalize(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.login_path, "/login");
    }

    #[test]
    fn test_url_joining() {
        let config = ApiConfig::new("http://example.test/api/");
        assert_eq!(config.url("/tasks"), "http://example.test/api/tasks");
        assert_eq!(config.url("tasks/7"), "http://example.test/api/tasks/7");
    }

    #[test]
    fn test_builders() {
        let config = ApiConfig::new("http://example.test")
            .with_timeout(Duration::from_secs(5))
            .with_login_path("/entrar");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.login_path, "/entrar");
    }
}
