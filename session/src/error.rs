//! Error types for session operations.

use cadence_api::{ApiError, StorageError};
use cadence_runtime::StoreError;
use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Why a session operation failed.
///
/// Every variant except [`SessionError::Runtime`] is delivered through the
/// session's result actions, so the type stays `Clone`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    // ═══════════════════════════════════════════════════════════
    // Remote
    // ═══════════════════════════════════════════════════════════

    /// The backend rejected the call or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),

    // ═══════════════════════════════════════════════════════════
    // Local preconditions
    // ═══════════════════════════════════════════════════════════

    /// The operation needs a bearer token and none is held.
    #[error("No access token held")]
    MissingToken,

    /// A refresh was requested without a refresh token.
    #[error("No refresh token held")]
    MissingRefreshToken,

    /// The operation needs the user's profile and none is loaded.
    #[error("No profile loaded")]
    MissingProfile,

    // ═══════════════════════════════════════════════════════════
    // Infrastructure
    // ═══════════════════════════════════════════════════════════

    /// Durable token storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The session store did not answer (timeout, shutdown).
    #[error("Session store unavailable: {0}")]
    Runtime(#[from] StoreError),

    /// The request's effect panicked before producing a result.
    #[error("Session request interrupted")]
    Interrupted,
}

impl SessionError {
    /// Message suitable for display: the backend's `error` text when it
    /// sent one, otherwise `fallback`.
    #[must_use]
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(error) => error.server_message().unwrap_or(fallback).to_string(),
            _ => fallback.to_string(),
        }
    }
}
