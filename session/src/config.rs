//! Session store configuration.

use std::time::Duration;

/// Default wait for a session request's result action.
///
/// Longer than the HTTP client's 30 second timeout, so the client always
/// reports first.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(35);

/// Configuration of the [`SessionStore`](crate::SessionStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long a façade call waits for its result action.
    ///
    /// Default: 35 seconds
    pub request_timeout: Duration,
}

impl SessionConfig {
    /// Configuration with the default timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the result wait timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
