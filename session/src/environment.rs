//! Session environment.

use cadence_api::{ApiClient, TokenStorage};
use std::sync::Arc;

/// Dependencies of the session reducer.
#[derive(Clone, Debug)]
pub struct SessionEnvironment {
    /// REST client; its token storage is the one the session writes
    pub api: ApiClient,
}

impl SessionEnvironment {
    /// Create an environment around `api`.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Durable token storage shared with the client.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn TokenStorage> {
        Arc::clone(self.api.storage())
    }
}
