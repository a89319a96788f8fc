//! Bridging callback-style producers into [`ListenableFuture`]s.
//!
//! [`CallbackToFutureAdapter::get_future`] creates a future and hands its
//! write side, a [`Completer`], to a resolver closure. The resolver wires the
//! completer into whatever callback API produces the value. The adapter only
//! relies on the [`Completable`] capability, never on future internals.
//!
//! ```rust
//! use core_tasks::{CallbackToFutureAdapter, Completable};
//!
//! let future = CallbackToFutureAdapter::get_future(|completer| {
//!     std::thread::spawn(move || {
//!         completer.set(42);
//!     });
//!     "answer"
//! });
//!
//! assert_eq!(future.get().unwrap(), 42);
//! assert_eq!(future.tag(), "answer");
//! ```

use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use core_async::executor::Executor;
use tracing::warn;

use crate::error::{Cause, FutureAbandoned};
use crate::future::{FutureShared, ListenableFuture};
use crate::state::Outcome;

/// Capability to move a handle into its terminal state exactly once.
///
/// Each method returns whether this call performed the transition; calls
/// after the first terminal transition are no-ops.
pub trait Completable<T> {
    fn set(&self, value: T) -> bool;

    fn set_exception(&self, cause: Cause) -> bool;

    fn set_cancelled(&self) -> bool;
}

/// Write side of a [`ListenableFuture`].
///
/// Dropping a completer that never completed its future fails the future
/// with [`FutureAbandoned`], so blocked consumers are released.
pub struct Completer<T> {
    shared: Arc<FutureShared<T>>,
}

impl<T> Completer<T>
where
    T: Send + Sync + 'static,
{
    /// Runs `listener` on `executor` if the future gets cancelled.
    ///
    /// This is how a producer learns about an advisory cancellation request.
    pub fn add_cancellation_listener<F>(&self, executor: Arc<dyn Executor>, listener: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.completion.subscribe(Box::new(move |outcome| {
            if outcome.is_cancelled() {
                executor.execute(Box::new(listener));
            }
        }));
    }
}

impl<T> Completer<T> {
    /// Whether the future is already done, for example cancelled by a
    /// consumer.
    pub fn is_done(&self) -> bool {
        self.shared.completion.is_done()
    }

    /// Whether a consumer asked to interrupt running work when cancelling.
    pub fn is_interrupt_requested(&self) -> bool {
        self.shared.interrupt_requested.load(Ordering::Acquire)
    }
}

impl<T> Completable<T> for Completer<T> {
    fn set(&self, value: T) -> bool {
        self.shared.completion.complete(Outcome::Succeeded(value))
    }

    fn set_exception(&self, cause: Cause) -> bool {
        self.shared.completion.complete(Outcome::Failed(cause))
    }

    fn set_cancelled(&self) -> bool {
        self.shared.completion.complete(Outcome::Cancelled)
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        let tag = self.shared.tag().to_string();
        let abandoned = FutureAbandoned { tag: tag.clone() };
        if self
            .shared
            .completion
            .complete(Outcome::Failed(Arc::new(abandoned)))
        {
            warn!(tag = %tag, "Completer dropped before completing its future");
        }
    }
}

impl<T> fmt::Debug for Completer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("tag", &self.shared.tag())
            .field("state", &self.shared.completion.state_label())
            .finish()
    }
}

/// Entry point for turning callback-style producers into futures.
pub struct CallbackToFutureAdapter;

impl CallbackToFutureAdapter {
    /// Creates a future and lets `resolver` wire up its completer.
    ///
    /// The value returned by `resolver` becomes the future's tag, shown in
    /// `Debug` output and in [`FutureAbandoned`] errors.
    pub fn get_future<T, F, D>(resolver: F) -> ListenableFuture<T>
    where
        F: FnOnce(Completer<T>) -> D,
        D: fmt::Display,
    {
        let shared = Arc::new(FutureShared::new());
        let completer = Completer {
            shared: Arc::clone(&shared),
        };
        let tag = resolver(completer).to_string();
        // A completer dropped inside the resolver already recorded "<unresolved>".
        let _ = shared.tag.set(tag);
        ListenableFuture::from_shared(shared)
    }
}
