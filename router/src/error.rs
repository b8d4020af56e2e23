//! Error types for navigation.

use thiserror::Error;

/// Result type alias for navigation.
pub type Result<T> = std::result::Result<T, NavigationError>;

/// Why a navigation was not committed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The guard kept redirecting past the configured cap.
    #[error("Too many redirects navigating to {target} (last: {last})")]
    RedirectLoop {
        /// Original target
        target: String,
        /// Last redirect target
        last: String,
    },

    /// No route matches the path.
    #[error("No route matches {0}")]
    UnknownRoute(String),
}
