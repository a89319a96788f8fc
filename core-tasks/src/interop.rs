//! Conversion from callback-style handles to [`ListenableFuture`]s.

use tracing::error;

use crate::completer::{CallbackToFutureAdapter, Completable, Completer};
use crate::future::ListenableFuture;
use crate::task::{AsyncHandle, CompletedTask};

const ADAPTER_TAG: &str = "task_to_listenable_future";

/// Converts any [`AsyncHandle`] into a [`ListenableFuture`] mirroring its
/// terminal state.
///
/// Exactly one completion callback is registered on `task`. Cancellation of
/// the returned future is not forwarded to `task`.
///
/// # Panics
///
/// The completion callback panics if `task` reports a failure without an
/// error (or success without a value), which breaks the [`CompletedTask`]
/// contract. The panic surfaces on whichever thread completed `task`; the
/// future is then failed with [`FutureAbandoned`](crate::FutureAbandoned).
pub fn task_to_listenable_future<T, H>(task: &H) -> ListenableFuture<T>
where
    H: AsyncHandle<T> + ?Sized,
    T: Send + Sync + 'static,
{
    CallbackToFutureAdapter::get_future(|completer: Completer<T>| {
        task.on_complete(Box::new(move |completed: &H::Completed| {
            if completed.is_canceled() {
                completer.set_cancelled();
            } else if completed.is_successful() {
                match completed.value() {
                    Some(value) => {
                        completer.set(value);
                    }
                    None => contract_violation("task succeeded without a value"),
                }
            } else {
                match completed.error() {
                    Some(cause) => {
                        completer.set_exception(cause);
                    }
                    None => contract_violation("task failed without an error"),
                }
            }
        }));
        ADAPTER_TAG
    })
}

fn contract_violation(detail: &str) -> ! {
    error!(detail, "Async handle broke its completion contract");
    panic!("invariant violation: {detail}");
}

/// Extension methods available on every [`AsyncHandle`].
pub trait TaskExt<T>: AsyncHandle<T> {
    /// See [`task_to_listenable_future`].
    fn to_listenable_future(&self) -> ListenableFuture<T>
    where
        T: Send + Sync + 'static,
    {
        task_to_listenable_future(self)
    }
}

impl<T, H> TaskExt<T> for H where H: AsyncHandle<T> + ?Sized {}
