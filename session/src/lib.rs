//! # Cadence Session
//!
//! The client-side session: bearer token, refresh token and the profile they
//! belong to, driven by a reducer.
//!
//! ```text
//!   Anonymous ──login/register──▶ Authenticating ──ok──▶ Authenticated
//!       ▲                                │ err                 │
//!       └────────────────────────────────┘                     │
//!       ▲                                                      │
//!       ├──────────── logout / profile failure / 401 ──────────┤
//!       │                                                      │
//!   RefreshFailed ◀────────────── refresh failure ─────────────┘
//! ```
//!
//! The session is the only writer of token storage. It installs itself as
//! the [`ApiClient`](cadence_api::ApiClient)'s unauthorized hook, so a 401
//! on any call tears it down before the client publishes its redirect.
//!
//! ## Example
//!
//! ```ignore
//! use cadence_api::{ApiClient, Credentials, FileTokenStorage};
//! use cadence_session::{SessionConfig, SessionStore};
//!
//! let api = ApiClient::from_env(Arc::new(FileTokenStorage::new("tokens.json")))?;
//! let session = SessionStore::new(api, SessionConfig::default());
//! session.initialize().await?;
//!
//! if !session.is_authenticated().await {
//!     session.login(Credentials::new("ada", "secret")).await?;
//! }
//! ```

pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod reducer;
pub mod state;
pub mod store;

pub use actions::{Secret, SessionAction};
pub use config::SessionConfig;
pub use environment::SessionEnvironment;
pub use error::{Result, SessionError};
pub use reducer::SessionReducer;
pub use state::{Notice, Phase, SessionState};
pub use store::SessionStore;
