//! Reactive single-value view of a [`Task`].
//!
//! A [`Single`] delivers exactly one terminal signal, success or error, to
//! each subscriber. Subscriptions return a [`Disposable`]; once disposed, no
//! callback runs for that subscription. This is how a host ties delivery to
//! the lifetime of whatever renders the value. A subscription that has
//! delivered its signal reports itself disposed.
//!
//! ```rust
//! use core_tasks::Task;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(None));
//! let sink = Arc::clone(&seen);
//!
//! let disposable = Task::for_result(5).to_single().subscribe(move |value| {
//!     *sink.lock().unwrap() = Some(value);
//! });
//!
//! assert_eq!(*seen.lock().unwrap(), Some(5));
//! assert!(disposable.is_disposed());
//! ```

use std::fmt;
use std::future::IntoFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use core_async::executor::{DirectExecutor, Executor};
use futures::stream::{self, Once};
use tracing::error;

use crate::error::TaskError;
use crate::task::{Task, TaskFuture};

/// Handle used to stop a subscription from delivering.
#[derive(Clone, Default)]
pub struct Disposable {
    disposed: Arc<AtomicBool>,
}

impl Disposable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// One-item reactive stream over a [`Task`].
pub struct Single<T> {
    task: Task<T>,
    executor: Arc<dyn Executor>,
}

impl<T> Single<T> {
    pub fn from_task(task: Task<T>) -> Self {
        Self {
            task,
            executor: Arc::new(DirectExecutor),
        }
    }

    /// Delivers signals on `executor` instead of the completing thread.
    pub fn observe_on(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }
}

impl<T> Single<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Subscribes to the success signal only.
    ///
    /// Errors have nowhere to go and are logged at `error` level.
    pub fn subscribe<S>(&self, on_success: S) -> Disposable
    where
        S: FnOnce(T) + Send + 'static,
    {
        self.subscribe_with(on_success, |err| {
            error!(error = %err, "Single signalled an error with no error handler");
        })
    }

    /// Subscribes to both signals. Cancellation arrives as
    /// [`TaskError::Cancelled`].
    ///
    /// The returned [`Disposable`] is marked disposed right before the signal
    /// is handed to either callback.
    pub fn subscribe_with<S, E>(&self, on_success: S, on_error: E) -> Disposable
    where
        S: FnOnce(T) + Send + 'static,
        E: FnOnce(TaskError) + Send + 'static,
    {
        let disposable = Disposable::new();
        let guard = disposable.clone();
        let executor = Arc::clone(&self.executor);

        self.task.add_on_complete_listener(move |task| {
            if guard.is_disposed() {
                return;
            }
            let result = task.result();
            executor.execute(Box::new(move || {
                // Disposal may race with the hop onto the executor.
                if guard.is_disposed() {
                    return;
                }
                guard.dispose();
                match result {
                    Ok(value) => on_success(value),
                    Err(err) => on_error(err),
                }
            }));
        });

        disposable
    }

    /// Converts the single into a stream that yields exactly one item.
    pub fn into_stream(self) -> Once<TaskFuture<T>> {
        stream::once(self.task.into_future())
    }
}

impl<T> fmt::Debug for Single<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Single").field("task", &self.task).finish()
    }
}

impl<T> Task<T> {
    /// Views this task as a [`Single`].
    pub fn to_single(&self) -> Single<T> {
        Single::from_task(self.clone())
    }
}
