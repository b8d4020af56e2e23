//! Error types for domain store operations.

use cadence_api::ApiError;
use cadence_runtime::StoreError;
use thiserror::Error;

/// Result type alias for domain store operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Why a domain store operation failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The backend rejected the call or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The store did not answer (timeout, shutdown).
    #[error("Store unavailable: {0}")]
    Runtime(#[from] StoreError),

    /// The request's effect panicked before producing a result.
    #[error("Request interrupted")]
    Interrupted,
}

impl DomainError {
    /// Message suitable for display: the backend's `error` text when it
    /// sent one, otherwise `fallback`.
    #[must_use]
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(error) => error.server_message().unwrap_or(fallback).to_string(),
            Self::Runtime(_) | Self::Interrupted => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_message_prefers_server_text() {
        let rejected = DomainError::from(ApiError::from_status(404, Some("Tarefa não encontrada".into())));
        assert_eq!(rejected.display_message("Could not delete task"), "Tarefa não encontrada");

        let server = DomainError::from(ApiError::from_status(500, None));
        assert_eq!(server.display_message("Could not delete task"), "Could not delete task");
        assert_eq!(
            DomainError::Interrupted.display_message("Could not load tasks"),
            "Could not load tasks"
        );
    }
}
