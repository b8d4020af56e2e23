//! Domain store environment.

use crate::config::FallbackPolicy;
use cadence_api::ApiClient;
use cadence_core::environment::{Clock, SystemClock};
use std::fmt;
use std::sync::Arc;

/// Dependencies shared by every domain reducer.
#[derive(Clone)]
pub struct StoreEnvironment {
    /// REST client
    pub api: ApiClient,
    /// Time source for derived views (e.g. overdue tasks)
    pub clock: Arc<dyn Clock>,
    /// Failure handling of catalog reads
    pub fallback: FallbackPolicy,
}

impl StoreEnvironment {
    /// Environment on the system clock with [`FallbackPolicy::Surface`].
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            clock: Arc::new(SystemClock),
            fallback: FallbackPolicy::Surface,
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the fallback policy.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

impl fmt::Debug for StoreEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreEnvironment")
            .field("api", &self.api)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
