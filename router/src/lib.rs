//! # Cadence Router
//!
//! Route table, session guard and navigator of the Cadence client.
//!
//! Every navigation resolves its target against the [`RouteTable`], asks the
//! [`Guard`] whether the session may enter, and follows redirects until a
//! route admits it:
//!
//! - anonymous sessions are sent to `/login?redirect=<original path>`
//! - authenticated sessions are sent home from the guest routes
//! - non-admins are sent home from admin routes
//!
//! A session that holds a token but no profile fetches the profile before
//! the decision. [`Navigator::follow_redirects`] also routes the client's
//! login redirect published after a 401 teardown.
//!
//! # Example
//!
//! ```ignore
//! use cadence_router::{GuardConfig, Navigation, Navigator};
//!
//! let navigator = Navigator::new(session.clone(), GuardConfig::default());
//! let _listener = navigator.follow_redirects(session.api().subscribe_redirects());
//!
//! if let Navigation::Committed(location) = navigator.navigate("/dashboard").await? {
//!     println!("now at {}", location.full_path());
//! }
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod location;
pub mod navigator;
pub mod route;

pub use config::GuardConfig;
pub use error::{NavigationError, Result};
pub use guard::{Decision, Guard, SessionGate};
pub use location::Location;
pub use navigator::{Navigation, Navigator};
pub use route::{Access, Route, RouteMatch, RouteTable};
