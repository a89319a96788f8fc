//! One-shot asynchronous task handles and the adapters between their
//! consumption styles.
//!
//! A single primitive, the [`Task`], can be consumed four ways:
//!
//! 1. **Listeners**: [`Task::add_on_complete_listener`] and friends.
//! 2. **Suspension**: `task.await` inside an async context.
//! 3. **Listenable future**: [`task_to_listenable_future`] (or
//!    [`TaskExt::to_listenable_future`]) yields a [`ListenableFuture`] with
//!    blocking retrieval, listeners and advisory cancellation.
//! 4. **Reactive single**: [`Task::to_single`] yields a [`Single`] with
//!    disposable subscriptions and a one-item `Stream`.
//!
//! # Completion model
//!
//! Every handle is backed by the same one-shot cell: *pending* until it moves
//! exactly once to *succeeded*, *failed* or *cancelled*. Listeners fire once,
//! in registration order, on the completing thread unless an
//! [`Executor`](core_async::Executor) is supplied.
//!
//! # Example
//!
//! ```rust
//! use core_tasks::{SimpleTaskSource, TaskExt};
//! use std::time::Duration;
//!
//! let task = SimpleTaskSource::new(Duration::from_millis(10)).create("Successful Conversion");
//! let future = task.to_listenable_future();
//!
//! // Blocking retrieval: never do this on a thread that must stay responsive.
//! assert_eq!(future.get().unwrap(), "Successful Conversion");
//! ```

pub mod completer;
pub mod error;
pub mod future;
pub mod interop;
pub mod rx;
pub mod source;
pub mod state;
pub mod task;

pub use completer::{CallbackToFutureAdapter, Completable, Completer};
pub use error::{cause, Cause, FutureAbandoned, Result, TaskError, TaskFailure};
pub use future::ListenableFuture;
pub use interop::{task_to_listenable_future, TaskExt};
pub use rx::{Disposable, Single};
pub use source::{create_simple_task, SimpleTaskSource, DEFAULT_TASK_DELAY};
pub use state::Outcome;
pub use task::{AsyncHandle, CompletedTask, Task, TaskCompletionSource, TaskFuture};
