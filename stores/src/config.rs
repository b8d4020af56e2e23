//! Domain store configuration.

use std::time::Duration;

/// Default wait for a store request's result action.
///
/// Longer than the HTTP client's 30 second timeout, so the client always
/// reports first.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(35);

/// What a store does when a catalog read fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Record the failure and return it to the caller.
    #[default]
    Surface,
    /// Serve built-in fixture data instead (demo mode). Only the music
    /// catalog and search honour this.
    Fixtures,
}

/// Configuration shared by the domain stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// How long a façade call waits for its result action.
    ///
    /// Default: 35 seconds
    pub request_timeout: Duration,

    /// Failure handling of catalog reads.
    ///
    /// Default: [`FallbackPolicy::Surface`]
    pub fallback: FallbackPolicy,
}

impl StoreConfig {
    /// Configuration with default timeout and fallback policy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            fallback: FallbackPolicy::Surface,
        }
    }

    /// Set the result wait timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the fallback policy.
    #[must_use]
    pub const fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let config = StoreConfig::new()
            .with_request_timeout(Duration::from_secs(5))
            .with_fallback(FallbackPolicy::Fixtures);

        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.fallback, FallbackPolicy::Fixtures);
        assert_eq!(StoreConfig::default().fallback, FallbackPolicy::Surface);
    }
}
