//! Error types for the Cadence REST adapter

use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::ApiClient) calls.
///
/// Every non-success status is classified here and passed through to the
/// caller. A 401 is additionally handled globally by the client (session
/// teardown and redirect) before being returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    // ═══════════════════════════════════════════════════════════
    // Transport
    // ═══════════════════════════════════════════════════════════

    /// The request never produced a response (DNS, connection, TLS, ...).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    // ═══════════════════════════════════════════════════════════
    // Status errors
    // ═══════════════════════════════════════════════════════════

    /// 401 - missing, expired or invalid credentials.
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("no message"))]
    Unauthorized {
        /// `error` field of the response envelope
        message: Option<String>,
    },

    /// Any other 4xx - validation failure, not found, conflict, ...
    #[error("Request rejected (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// HTTP status code
        status: u16,
        /// `error` field of the response envelope
        message: Option<String>,
    },

    /// 5xx - the backend failed.
    #[error("Server error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        /// HTTP status code
        status: u16,
        /// `error` field of the response envelope
        message: Option<String>,
    },

    // ═══════════════════════════════════════════════════════════
    // Client-side
    // ═══════════════════════════════════════════════════════════

    /// The response body did not match the expected envelope.
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// The request could not be built (bad body, bad multipart part, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Classify a non-success HTTP status.
    #[must_use]
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => Self::Unauthorized { message },
            500..=599 => Self::Server { status, message },
            _ => Self::Rejected { status, message },
        }
    }

    /// The backend's human-readable error message, when it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message }
            | Self::Rejected { message, .. }
            | Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Rejected { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is an authorization failure.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else if error.is_builder() {
            Self::InvalidRequest(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

/// Errors raised by durable token storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Token storage I/O failed: {0}")]
    Io(String),

    /// The backing file exists but is not a valid token document.
    #[error("Token storage is corrupt: {0}")]
    Corrupt(String),
}
