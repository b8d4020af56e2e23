//! Given/when/then harness for reducers.
//!
//! Reducers are run synchronously against a fixed state and environment;
//! nothing is spawned. Effects can be inspected as values, or, when they are
//! local (no I/O), driven to completion to see the actions they feed back.

#![allow(clippy::module_name_repetitions)]

use cadence_core::{effect::Effect, reducer::Reducer};

type StateCheck<S> = Box<dyn FnOnce(&S)>;
type EffectCheck<A> = Box<dyn FnOnce(&[Effect<A>])>;
type FeedbackCheck<A> = Box<dyn FnOnce(Vec<A>)>;

/// Fluent reducer test.
///
/// Several `when_action` calls are reduced in order; effect and feedback
/// checks see the effects of the last action only.
///
/// # Example
///
/// ```ignore
/// use cadence_testing::{assertions, ReducerTest};
///
/// ReducerTest::new(TaskReducer)
///     .with_env(test_environment())
///     .given_state(TaskState::default())
///     .when_action(TaskAction::ClearError)
///     .then_state(|state| assert!(state.last_error().is_none()))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    env: Option<E>,
    given: Option<S>,
    when: Vec<A>,
    state_checks: Vec<StateCheck<S>>,
    effect_checks: Vec<EffectCheck<A>>,
    feedback_check: Option<FeedbackCheck<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Test `reducer`.
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            env: None,
            given: None,
            when: Vec::new(),
            state_checks: Vec::new(),
            effect_checks: Vec::new(),
            feedback_check: None,
        }
    }

    /// Environment handed to the reducer.
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.env = Some(env);
        self
    }

    /// Starting state.
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.given = Some(state);
        self
    }

    /// Reduce `action` next.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.when.push(action);
        self
    }

    /// Reduce `actions` next, in order.
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.when.extend(actions);
        self
    }

    /// Check the final state.
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_checks.push(Box::new(check));
        self
    }

    /// Check the effects of the last action.
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_checks.push(Box::new(check));
        self
    }

    /// Drive the effects of the last action and check the actions they feed
    /// back (see [`assertions::feedback`]). Only for effects without I/O.
    #[must_use]
    pub fn then_feedback<F>(mut self, check: F) -> Self
    where
        F: FnOnce(Vec<A>) + 'static,
    {
        self.feedback_check = Some(Box::new(check));
        self
    }

    /// Reduce the actions and run every check.
    ///
    /// # Panics
    ///
    /// Panics if the state, environment or actions are missing, or if a
    /// check fails.
    #[allow(clippy::panic, clippy::expect_used)]
    pub fn run(self) {
        let mut state = self.given.expect("given_state() was not called");
        let env = self.env.expect("with_env() was not called");
        assert!(!self.when.is_empty(), "when_action() was not called");

        let mut effects = Vec::new();
        for action in self.when {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for check in self.state_checks {
            check(&state);
        }
        for check in self.effect_checks {
            check(&effects);
        }
        if let Some(check) = self.feedback_check {
            check(assertions::feedback(effects));
        }
    }
}

/// Effect checks.
pub mod assertions {
    use cadence_core::effect::Effect;

    /// Assert that nothing but [`Effect::None`] was returned.
    ///
    /// # Panics
    ///
    /// Panics on any other effect.
    #[allow(clippy::panic)]
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(|effect| matches!(effect, Effect::None)),
            "expected no effects, got {effects:?}"
        );
    }

    /// Assert the number of effects.
    ///
    /// # Panics
    ///
    /// Panics if the count differs.
    #[allow(clippy::panic)]
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(effects.len(), expected, "unexpected number of effects");
    }

    /// Assert that some async work was returned (a request, usually).
    ///
    /// # Panics
    ///
    /// Panics if no [`Effect::Future`] is present at the top level.
    #[allow(clippy::panic)]
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|effect| matches!(effect, Effect::Future(_))),
            "expected a future effect"
        );
    }

    /// Run `effects` to completion on the current thread and collect the
    /// actions they feed back, in declaration order.
    ///
    /// Effects that perform I/O would block on the network here; use this
    /// for local effects only.
    #[must_use]
    pub fn feedback<A>(effects: Vec<Effect<A>>) -> Vec<A> {
        effects
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::None => None,
                Effect::Future(future) => futures::executor::block_on(future),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{smallvec, SmallVec};

    #[derive(Debug, Default)]
    struct Inbox {
        unread: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum InboxAction {
        Receive,
        Read,
        Poll,
        Refresh,
    }

    struct InboxReducer;

    impl Reducer for InboxReducer {
        type State = Inbox;
        type Action = InboxAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Inbox,
            action: InboxAction,
            _env: &(),
        ) -> SmallVec<[Effect<InboxAction>; 4]> {
            match action {
                InboxAction::Receive => {
                    state.unread += 1;
                    smallvec![Effect::None]
                },
                InboxAction::Read => {
                    state.unread = state.unread.saturating_sub(1);
                    smallvec![Effect::None]
                },
                InboxAction::Poll => smallvec![Effect::task(async { InboxAction::Receive })],
                InboxAction::Refresh => smallvec![
                    Effect::task(async { InboxAction::Read }),
                    Effect::None,
                    Effect::task(async { InboxAction::Poll }),
                ],
            }
        }
    }

    #[test]
    fn test_state_after_single_action() {
        ReducerTest::new(InboxReducer)
            .with_env(())
            .given_state(Inbox::default())
            .when_action(InboxAction::Receive)
            .then_state(|inbox| assert_eq!(inbox.unread, 1))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_actions_reduce_in_order() {
        ReducerTest::new(InboxReducer)
            .with_env(())
            .given_state(Inbox { unread: 3 })
            .when_actions([InboxAction::Read, InboxAction::Read, InboxAction::Poll])
            .then_state(|inbox| assert_eq!(inbox.unread, 1))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .then_feedback(|actions| assert_eq!(actions, vec![InboxAction::Receive]))
            .run();
    }

    #[test]
    fn test_feedback_keeps_declaration_order() {
        ReducerTest::new(InboxReducer)
            .with_env(())
            .given_state(Inbox::default())
            .when_action(InboxAction::Refresh)
            .then_feedback(|actions| {
                assert_eq!(actions, vec![InboxAction::Read, InboxAction::Poll]);
            })
            .run();
    }
}
