//! A task source that simulates a long-running operation.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::cause;
use crate::task::{Task, TaskCompletionSource};

/// Delay used by [`create_simple_task`].
pub const DEFAULT_TASK_DELAY: Duration = Duration::from_secs(1);

const WORKER_THREAD_NAME: &str = "simple-task";

/// Creates tasks that succeed with a given string after a fixed delay.
///
/// Each call spawns one background thread that sleeps for the delay and then
/// completes the task. The delay cannot be cancelled.
#[derive(Debug, Clone)]
pub struct SimpleTaskSource {
    delay: Duration,
}

impl Default for SimpleTaskSource {
    fn default() -> Self {
        Self::new(DEFAULT_TASK_DELAY)
    }
}

impl SimpleTaskSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Starts a task that resolves to `value` once the delay has elapsed.
    ///
    /// If the worker thread cannot be spawned the task fails with the
    /// underlying I/O error.
    pub fn create(&self, value: impl Into<String>) -> Task<String> {
        let source = TaskCompletionSource::new();
        let task = source.task();
        let worker = source.clone();
        let value = value.into();
        let delay = self.delay;

        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                thread::sleep(delay);
                debug!(delay_ms = delay.as_millis() as u64, "Simple task finished waiting");
                worker.try_set_result(value);
            });

        if let Err(err) = spawned {
            warn!(error = %err, "Failed to spawn simple task worker");
            source.try_set_exception(cause(err));
        }

        task
    }
}

/// Starts a task that resolves to `value` after [`DEFAULT_TASK_DELAY`].
pub fn create_simple_task(value: impl Into<String>) -> Task<String> {
    SimpleTaskSource::default().create(value)
}
