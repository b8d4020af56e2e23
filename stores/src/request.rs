//! Request plumbing shared by the domain stores.
//!
//! A façade call sends a command carrying a fresh [`RequestId`] and waits for
//! the event answering it. The reducer starts one remote effect per command
//! through [`remote`], which always feeds back exactly one event: the success
//! event, or the failure event when the call fails or its effect panics.

use crate::environment::StoreEnvironment;
use crate::error::{DomainError, Result};
use cadence_core::action::{Correlated, RequestId};
use cadence_core::{effect::Effect, reducer::Reducer};
use cadence_runtime::Store;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

/// Send the command built by `command` and wait for the event answering it.
pub(crate) async fn dispatch<S, A, R, F>(
    store: &Store<S, A, StoreEnvironment, R>,
    timeout: Duration,
    is_event: fn(&A) -> bool,
    command: F,
) -> Result<A>
where
    R: Reducer<State = S, Action = A, Environment = StoreEnvironment> + Clone + Send + Sync + 'static,
    A: Correlated + Clone + Debug + Send + Sync + 'static,
    S: Send + Sync + 'static,
    F: FnOnce(RequestId) -> A,
{
    let request_id = RequestId::new();
    let answer = store
        .send_and_wait_for(
            command(request_id),
            move |action| is_event(action) && action.answers(request_id),
            timeout,
        )
        .await?;
    Ok(answer)
}

/// Effect running one backend call and mapping its outcome to an event.
pub(crate) fn remote<A, T, Fut, S, F>(call: Fut, on_success: S, on_failure: F) -> Effect<A>
where
    A: Send + 'static,
    T: Send + 'static,
    Fut: Future<Output = cadence_api::Result<T>> + Send + 'static,
    S: FnOnce(T) -> A + Send + 'static,
    F: Fn(DomainError) -> A + Clone + Send + 'static,
{
    let on_panic = on_failure.clone();
    Effect::guarded(
        async move {
            match call.await {
                Ok(value) => on_success(value),
                Err(error) => on_failure(error.into()),
            }
        },
        move || on_panic(DomainError::Interrupted),
    )
}

/// Error for a request answered by an event of the wrong kind.
pub(crate) fn unexpected<A: Debug>(action: &A) -> DomainError {
    tracing::error!(?action, "Request answered by an unrelated event");
    DomainError::Interrupted
}
