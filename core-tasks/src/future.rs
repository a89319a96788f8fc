//! Future-style handle with listeners, blocking retrieval and cancellation.
//!
//! A [`ListenableFuture`] is only ever created through
//! [`CallbackToFutureAdapter::get_future`](crate::CallbackToFutureAdapter::get_future),
//! which hands the write side to a [`Completer`](crate::Completer).

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};
use std::time::Duration;

use core_async::executor::Executor;
use tracing::debug;

use crate::error::{Result, TaskError};
use crate::state::{Completion, Outcome};

pub(crate) struct FutureShared<T> {
    pub(crate) completion: Completion<T>,
    pub(crate) interrupt_requested: AtomicBool,
    pub(crate) tag: OnceLock<String>,
}

impl<T> FutureShared<T> {
    pub(crate) fn new() -> Self {
        Self {
            completion: Completion::new(),
            interrupt_requested: AtomicBool::new(false),
            tag: OnceLock::new(),
        }
    }

    pub(crate) fn tag(&self) -> &str {
        self.tag.get().map(String::as_str).unwrap_or("<unresolved>")
    }
}

/// Future-style handle to a value that becomes available at most once.
pub struct ListenableFuture<T> {
    shared: Arc<FutureShared<T>>,
}

impl<T> Clone for ListenableFuture<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> ListenableFuture<T> {
    pub(crate) fn from_shared(shared: Arc<FutureShared<T>>) -> Self {
        Self { shared }
    }

    pub fn is_done(&self) -> bool {
        self.shared.completion.is_done()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared
            .completion
            .outcome()
            .is_some_and(|outcome| outcome.is_cancelled())
    }

    /// Whether a cancellation that won asked to interrupt running work.
    pub fn was_interrupted(&self) -> bool {
        self.shared.interrupt_requested.load(Ordering::Acquire) && self.is_cancelled()
    }

    /// The tag returned by the resolver that created this future.
    pub fn tag(&self) -> &str {
        self.shared.tag()
    }

    /// Requests cancellation.
    ///
    /// Returns `true` if this call moved the future to cancelled. The request
    /// is advisory: whatever produces the value is only told through
    /// [`Completer::add_cancellation_listener`](crate::Completer::add_cancellation_listener)
    /// and may keep running, but observers of this future see it cancelled.
    pub fn cancel(&self, may_interrupt_if_running: bool) -> bool {
        if may_interrupt_if_running {
            self.shared
                .interrupt_requested
                .store(true, Ordering::Release);
        }
        let cancelled = self.shared.completion.complete(Outcome::Cancelled);
        if cancelled {
            debug!(tag = self.tag(), may_interrupt_if_running, "Future cancelled");
        }
        cancelled
    }
}

impl<T> ListenableFuture<T>
where
    T: Send + Sync + 'static,
{
    /// Runs `listener` on `executor` once the future is done, immediately if
    /// it already is.
    pub fn add_listener<F>(&self, executor: Arc<dyn Executor>, listener: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared
            .completion
            .subscribe(Box::new(move |_| executor.execute(Box::new(listener))));
    }
}

impl<T: Clone> ListenableFuture<T> {
    /// Blocks the calling thread until the future completes.
    ///
    /// Never call this from a thread that must stay responsive; from a
    /// listener, use [`get_done`](Self::get_done) instead.
    pub fn get(&self) -> Result<T> {
        self.shared.completion.wait().to_result()
    }

    /// Like [`get`](Self::get) but gives up after `timeout`.
    pub fn get_timeout(&self, timeout: Duration) -> Result<T> {
        self.shared
            .completion
            .wait_timeout(timeout)
            .ok_or(TaskError::Timeout(timeout))?
            .to_result()
    }

    /// Retrieves the value of a future that is already done.
    ///
    /// Fails with [`TaskError::NotComplete`] instead of blocking.
    pub fn get_done(&self) -> Result<T> {
        match self.shared.completion.outcome() {
            Some(outcome) => outcome.to_result(),
            None => Err(TaskError::NotComplete),
        }
    }
}

impl<T: Clone> Future for ListenableFuture<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.shared
            .completion
            .poll_outcome(cx)
            .map(|outcome| outcome.to_result())
    }
}

impl<T> fmt::Debug for ListenableFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenableFuture")
            .field("tag", &self.tag())
            .field("state", &self.shared.completion.state_label())
            .finish()
    }
}
