//! Callback-style task handles.
//!
//! A [`Task`] is the read side of a one-shot asynchronous operation; the
//! write side is a [`TaskCompletionSource`]. Consumers either register
//! listeners, block with [`Task::wait`], or `.await` the task directly.
//!
//! The [`AsyncHandle`] and [`CompletedTask`] traits describe the callback
//! convention the future adapter consumes. `Task` implements both, and so can
//! any other handle that reports completion through a callback.
//!
//! ```rust
//! use core_tasks::{Task, TaskCompletionSource};
//!
//! let source = TaskCompletionSource::new();
//! let task: Task<String> = source.task();
//!
//! task.add_on_success_listener(|value| println!("got {value}"));
//! source.set_result("done".to_string()).unwrap();
//!
//! assert!(task.is_successful());
//! assert_eq!(task.result().unwrap(), "done");
//! ```

use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use core_async::executor::Executor;
use tracing::debug;

use crate::error::{Cause, Result, TaskError};
use crate::state::{Completion, Outcome};

/// Read-only view of a completed asynchronous handle.
///
/// Implementations must uphold one precondition: a handle that is neither
/// cancelled nor successful carries an error, and a successful handle carries
/// a value. The future adapter treats a breach as fatal.
pub trait CompletedTask<T> {
    fn is_canceled(&self) -> bool;

    fn is_successful(&self) -> bool;

    /// The value, present whenever [`is_successful`](Self::is_successful).
    fn value(&self) -> Option<T>;

    /// The error, present whenever the handle failed.
    fn error(&self) -> Option<Cause>;
}

/// Callback-style asynchronous handle.
pub trait AsyncHandle<T> {
    type Completed: CompletedTask<T>;

    /// Registers `callback` to run once the handle completes.
    ///
    /// The callback may run on any thread, including the caller's when the
    /// handle is already complete.
    fn on_complete(&self, callback: Box<dyn FnOnce(&Self::Completed) + Send + 'static>);
}

/// Handle to a value that becomes available at most once.
pub struct Task<T> {
    completion: Arc<Completion<T>>,
}

impl<T> Clone for Task<T> {
    fn clone(&self) -> Self {
        Self {
            completion: Arc::clone(&self.completion),
        }
    }
}

impl<T> Task<T> {
    fn pending() -> Self {
        Self {
            completion: Arc::new(Completion::new()),
        }
    }

    fn completed(outcome: Arc<Outcome<T>>) -> Self {
        Self {
            completion: Arc::new(Completion::done(outcome)),
        }
    }

    /// An already successful task.
    pub fn for_result(value: T) -> Self {
        Self::completed(Arc::new(Outcome::Succeeded(value)))
    }

    /// An already failed task.
    pub fn for_error(cause: Cause) -> Self {
        Self::completed(Arc::new(Outcome::Failed(cause)))
    }

    /// An already cancelled task.
    pub fn for_canceled() -> Self {
        Self::completed(Arc::new(Outcome::Cancelled))
    }

    pub fn is_complete(&self) -> bool {
        self.completion.is_done()
    }

    pub fn is_successful(&self) -> bool {
        self.outcome().is_some_and(|outcome| outcome.is_succeeded())
    }

    pub fn is_canceled(&self) -> bool {
        self.outcome().is_some_and(|outcome| outcome.is_cancelled())
    }

    /// The failure cause, if the task failed.
    pub fn exception(&self) -> Option<Cause> {
        self.outcome()
            .and_then(|outcome| outcome.cause().map(Arc::clone))
    }

    /// The terminal outcome, or `None` while pending.
    pub fn outcome(&self) -> Option<Arc<Outcome<T>>> {
        self.completion.outcome()
    }
}

impl<T> Task<T>
where
    T: Send + Sync + 'static,
{
    /// Runs `listener` on the completing thread once the task is done.
    pub fn add_on_complete_listener<F>(&self, listener: F) -> &Self
    where
        F: FnOnce(&Task<T>) + Send + 'static,
    {
        self.completion.subscribe(Box::new(move |outcome| {
            listener(&Task::completed(Arc::clone(outcome)))
        }));
        self
    }

    /// Runs `listener` on `executor` once the task is done.
    pub fn add_on_complete_listener_on<F>(&self, executor: Arc<dyn Executor>, listener: F) -> &Self
    where
        F: FnOnce(&Task<T>) + Send + 'static,
    {
        self.completion.subscribe(Box::new(move |outcome| {
            let task = Task::completed(Arc::clone(outcome));
            executor.execute(Box::new(move || listener(&task)));
        }));
        self
    }

    /// Runs `listener` with the value if the task succeeds.
    pub fn add_on_success_listener<F>(&self, listener: F) -> &Self
    where
        F: FnOnce(&T) + Send + 'static,
    {
        self.completion.subscribe(Box::new(move |outcome| {
            if let Some(value) = outcome.value() {
                listener(value);
            }
        }));
        self
    }

    /// Runs `listener` with the cause if the task fails.
    pub fn add_on_failure_listener<F>(&self, listener: F) -> &Self
    where
        F: FnOnce(&Cause) + Send + 'static,
    {
        self.completion.subscribe(Box::new(move |outcome| {
            if let Some(cause) = outcome.cause() {
                listener(cause);
            }
        }));
        self
    }

    /// Runs `listener` if the task is cancelled.
    pub fn add_on_canceled_listener<F>(&self, listener: F) -> &Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.completion.subscribe(Box::new(move |outcome| {
            if outcome.is_cancelled() {
                listener();
            }
        }));
        self
    }
}

impl<T: Clone> Task<T> {
    /// The result of a completed task.
    ///
    /// Fails with [`TaskError::NotComplete`] while the task is pending.
    pub fn result(&self) -> Result<T> {
        match self.outcome() {
            Some(outcome) => outcome.to_result(),
            None => Err(TaskError::NotComplete),
        }
    }

    /// Blocks the calling thread until the task completes.
    ///
    /// Never call this from a thread that must stay responsive.
    pub fn wait(&self) -> Result<T> {
        self.completion.wait().to_result()
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<T> {
        self.completion
            .wait_timeout(timeout)
            .ok_or(TaskError::Timeout(timeout))?
            .to_result()
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("state", &self.completion.state_label())
            .finish()
    }
}

impl<T> CompletedTask<T> for Task<T>
where
    T: Clone,
{
    fn is_canceled(&self) -> bool {
        self.outcome().is_some_and(|outcome| outcome.is_cancelled())
    }

    fn is_successful(&self) -> bool {
        self.outcome().is_some_and(|outcome| outcome.is_succeeded())
    }

    fn value(&self) -> Option<T> {
        self.outcome().and_then(|outcome| outcome.value().cloned())
    }

    fn error(&self) -> Option<Cause> {
        self.exception()
    }
}

impl<T> AsyncHandle<T> for Task<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Completed = Task<T>;

    fn on_complete(&self, callback: Box<dyn FnOnce(&Task<T>) + Send + 'static>) {
        self.add_on_complete_listener(callback);
    }
}

/// Future returned by awaiting a [`Task`].
///
/// Suspends the awaiting task without blocking a thread. A cancelled task
/// resolves to [`TaskError::Cancelled`].
pub struct TaskFuture<T> {
    completion: Arc<Completion<T>>,
}

impl<T: Clone> Future for TaskFuture<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.completion
            .poll_outcome(cx)
            .map(|outcome| outcome.to_result())
    }
}

impl<T: Clone> IntoFuture for Task<T> {
    type Output = Result<T>;
    type IntoFuture = TaskFuture<T>;

    fn into_future(self) -> Self::IntoFuture {
        TaskFuture {
            completion: self.completion,
        }
    }
}

/// Write side of a [`Task`].
///
/// Clones share the same task; whichever clone completes it first wins.
pub struct TaskCompletionSource<T> {
    task: Task<T>,
}

impl<T> Clone for TaskCompletionSource<T> {
    fn clone(&self) -> Self {
        Self {
            task: self.task.clone(),
        }
    }
}

impl<T> Default for TaskCompletionSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskCompletionSource<T> {
    pub fn new() -> Self {
        Self {
            task: Task::pending(),
        }
    }

    pub fn task(&self) -> Task<T> {
        self.task.clone()
    }

    /// Completes the task successfully.
    ///
    /// Fails with [`TaskError::AlreadyComplete`] if the task was already done.
    pub fn set_result(&self, value: T) -> Result<()> {
        self.try_set_result(value)
            .then_some(())
            .ok_or(TaskError::AlreadyComplete)
    }

    /// Fails the task.
    ///
    /// Fails with [`TaskError::AlreadyComplete`] if the task was already done.
    pub fn set_exception(&self, cause: Cause) -> Result<()> {
        self.try_set_exception(cause)
            .then_some(())
            .ok_or(TaskError::AlreadyComplete)
    }

    pub fn try_set_result(&self, value: T) -> bool {
        self.transition(Outcome::Succeeded(value))
    }

    pub fn try_set_exception(&self, cause: Cause) -> bool {
        self.transition(Outcome::Failed(cause))
    }

    pub fn try_set_canceled(&self) -> bool {
        self.transition(Outcome::Cancelled)
    }

    fn transition(&self, outcome: Outcome<T>) -> bool {
        let label = outcome.label();
        let transitioned = self.task.completion.complete(outcome);
        if transitioned {
            debug!(outcome = label, "Task completed");
        }
        transitioned
    }
}

impl<T> fmt::Debug for TaskCompletionSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskCompletionSource")
            .field("task", &self.task)
            .finish()
    }
}
