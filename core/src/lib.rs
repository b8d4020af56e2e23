//! # Cadence Core
//!
//! Core traits and types for the Cadence client state architecture.
//!
//! Every client-side state container in Cadence (the session, the music
//! catalog, playlists, tasks, task lists) is built from the same pieces:
//!
//! - **State**: plain owned data for one feature
//! - **Action**: every input to a reducer (commands from callers, results fed
//!   back from effects)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of async work, never its execution
//! - **Environment**: injected dependencies (HTTP client, token storage, clock)
//!
//! The `cadence-runtime` crate owns the `Store` that executes effects and
//! feeds their result actions back into the reducer.
//!
//! ## Example
//!
//! ```ignore
//! use cadence_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = CounterEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &CounterEnvironment,
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Action module - correlation between commands and their results
///
/// A store command (e.g. "create this task") and the action its effect feeds
/// back (e.g. "task created" / "task creation failed") share a [`RequestId`].
/// Façades use it to wait for exactly the result of their own request, even
/// when several requests of the same kind are in flight.
pub mod action {
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use uuid::Uuid;

    /// Correlation id tying a command action to its result action.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RequestId(Uuid);

    impl RequestId {
        /// Generate a fresh, random request id.
        #[must_use]
        pub fn new() -> Self {
            Self(Uuid::new_v4())
        }

        /// Wrap an existing UUID.
        #[must_use]
        pub const fn from_uuid(uuid: Uuid) -> Self {
            Self(uuid)
        }

        /// The underlying UUID.
        #[must_use]
        pub const fn as_uuid(&self) -> Uuid {
            self.0
        }
    }

    impl Default for RequestId {
        fn default() -> Self {
            Self::new()
        }
    }

    impl fmt::Display for RequestId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fmt(f)
        }
    }

    /// Actions that carry a request correlation id.
    ///
    /// Usually implemented through `#[derive(Action)]` from `cadence-macros`,
    /// which reads the `request_id` field of each variant.
    pub trait Correlated {
        /// Correlation id of this action, if the variant carries one.
        fn request_id(&self) -> Option<RequestId>;

        /// Whether this action answers the request `id`.
        fn answers(&self, id: RequestId) -> bool {
            self.request_id() == Some(id)
        }
    }
}

/// Reducer module - the core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They never perform I/O themselves; anything asynchronous is returned as an
/// [`Effect`](crate::effect::Effect) and executed by the runtime.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates `state` in place and returns the effects the runtime must
        /// execute. Most actions produce zero or one effect, hence the inline
        /// capacity of four.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe work to be performed by the runtime. They are values
/// returned from reducers, not execution.
pub mod effect {
    use futures::FutureExt;
    use std::future::Future;
    use std::panic::AssertUnwindSafe;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action: Send + 'static> Effect<Action> {
        /// Box an async computation that always produces an action.
        pub fn task<F>(future: F) -> Effect<Action>
        where
            F: Future<Output = Action> + Send + 'static,
        {
            Effect::Future(Box::pin(future.map(Some)))
        }

        /// Box an async computation whose panic is turned into an action.
        ///
        /// Request/response effects use this so that a panicking request still
        /// feeds a result action back, letting the reducer settle its
        /// bookkeeping (loading counters, pending waiters).
        pub fn guarded<F, P>(future: F, on_panic: P) -> Effect<Action>
        where
            F: Future<Output = Action> + Send + 'static,
            P: FnOnce() -> Action + Send + 'static,
        {
            Effect::Future(Box::pin(async move {
                match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(action) => Some(action),
                    Err(_) => Some(on_panic()),
                }
            }))
        }
    }
}

/// Environment module - dependency injection traits
///
/// External dependencies are abstracted behind traits and injected via the
/// reducer's Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::action::{Correlated, RequestId};
    use super::effect::Effect;
    use super::environment::{Clock, SystemClock};

    #[derive(Debug, Clone, PartialEq)]
    enum Lookup {
        Done(RequestId),
        Failed(RequestId),
        Plain,
    }

    impl Correlated for Lookup {
        fn request_id(&self) -> Option<RequestId> {
            match self {
                Self::Done(id) | Self::Failed(id) => Some(*id),
                Self::Plain => None,
            }
        }
    }

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn answers_matches_only_its_own_request() {
        let mine = RequestId::new();
        let other = RequestId::new();

        assert!(Lookup::Done(mine).answers(mine));
        assert!(!Lookup::Failed(other).answers(mine));
        assert!(!Lookup::Plain.answers(mine));
    }

    #[test]
    fn effect_debug_hides_the_future() {
        let effect: Effect<Lookup> = Effect::task(async { Lookup::Plain });
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
        assert_eq!(format!("{:?}", Effect::<Lookup>::None), "Effect::None");
    }

    #[tokio::test]
    async fn guarded_effect_converts_panic_into_action() {
        let id = RequestId::new();

        let explode = true;
        #[allow(clippy::panic)]
        let effect: Effect<Lookup> = Effect::guarded(
            async move {
                if explode {
                    panic!("request blew up");
                }
                Lookup::Plain
            },
            move || Lookup::Failed(id),
        );

        let Effect::Future(fut) = effect else {
            unreachable!("guarded always builds a future effect");
        };
        assert_eq!(fut.await, Some(Lookup::Failed(id)));
    }

    #[tokio::test]
    async fn task_effect_yields_action() {
        let Effect::Future(fut) = Effect::task(async { Lookup::Plain }) else {
            unreachable!("task always builds a future effect");
        };
        assert_eq!(fut.await, Some(Lookup::Plain));
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
