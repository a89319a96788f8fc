//! Listener executors.
//!
//! An [`Executor`] decides where a completion listener runs. Handles in
//! `core-tasks` accept an `Arc<dyn Executor>` wherever the caller wants to
//! control the delivery thread, and default to running listeners inline on
//! whichever thread completed the handle.
//!
//! Provided implementations:
//! - [`DirectExecutor`]: runs the job inline on the calling thread
//! - [`ThreadExecutor`]: spawns a fresh named OS thread per job
//! - [`RuntimeExecutor`]: hands the job to the Tokio blocking pool
//! - [`SerialExecutor`] + [`Looper`]: a single-consumer queue that stands in
//!   for a UI main thread
//!
//! # Examples
//!
//! ```rust
//! use core_async::executor::{serial, Executor};
//! use std::sync::{Arc, Mutex};
//!
//! let (main, mut looper) = serial("main");
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! for i in 0..3 {
//!     let seen = Arc::clone(&seen);
//!     main.execute(Box::new(move || seen.lock().unwrap().push(i)));
//! }
//!
//! assert_eq!(looper.run_pending(), 3);
//! assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
//! ```

use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A unit of work handed to an executor.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Capability to run a job somewhere.
///
/// Implementations must not block the caller waiting for the job to finish.
/// A job the executor cannot accept is dropped and logged; executors never
/// run a rejected job on the caller's thread instead.
pub trait Executor: Send + Sync {
    fn execute(&self, job: Job);
}

impl<E> Executor for Arc<E>
where
    E: Executor + ?Sized,
{
    fn execute(&self, job: Job) {
        (**self).execute(job)
    }
}

/// Runs every job immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectExecutor;

impl Executor for DirectExecutor {
    fn execute(&self, job: Job) {
        job()
    }
}

/// Spawns one named OS thread per job.
#[derive(Debug, Clone)]
pub struct ThreadExecutor {
    name: String,
}

impl ThreadExecutor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ThreadExecutor {
    fn default() -> Self {
        Self::new("executor-worker")
    }
}

impl Executor for ThreadExecutor {
    fn execute(&self, job: Job) {
        let spawned = thread::Builder::new().name(self.name.clone()).spawn(job);
        if let Err(err) = spawned {
            warn!(executor = %self.name, error = %err, "Failed to spawn executor thread; dropping job");
        }
    }
}

/// Runs jobs on the blocking pool of a Tokio runtime.
#[derive(Debug, Clone)]
pub struct RuntimeExecutor {
    handle: Handle,
}

impl RuntimeExecutor {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Binds to the runtime the caller is currently running in, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Executor for RuntimeExecutor {
    fn execute(&self, job: Job) {
        // Dropping the JoinHandle detaches the job.
        drop(self.handle.spawn_blocking(job));
    }
}

/// Creates a serial executor and the looper that drains it.
///
/// Jobs run one at a time, in submission order, on whichever thread drives
/// the [`Looper`].
pub fn serial(name: impl Into<String>) -> (SerialExecutor, Looper) {
    let name: Arc<str> = Arc::from(name.into());
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        SerialExecutor {
            name: Arc::clone(&name),
            sender,
        },
        Looper { name, receiver },
    )
}

/// Producer side of a serial job queue.
///
/// Cloning is cheap; the looper stops once every clone has been dropped and
/// the queue has drained.
#[derive(Clone)]
pub struct SerialExecutor {
    name: Arc<str>,
    sender: mpsc::UnboundedSender<Job>,
}

impl SerialExecutor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` once the looper has been dropped.
    pub fn is_shut_down(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Executor for SerialExecutor {
    fn execute(&self, job: Job) {
        if self.sender.send(job).is_err() {
            warn!(executor = %self.name, "Looper has shut down; dropping job");
        }
    }
}

impl fmt::Debug for SerialExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialExecutor")
            .field("name", &self.name)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

/// Consumer side of a serial job queue.
pub struct Looper {
    name: Arc<str>,
    receiver: mpsc::UnboundedReceiver<Job>,
}

impl Looper {
    /// Drives the queue from an async context until every producer is gone.
    ///
    /// Returns the number of jobs executed.
    pub async fn run(mut self) -> usize {
        let mut executed = 0;
        while let Some(job) = self.receiver.recv().await {
            job();
            executed += 1;
        }
        debug!(looper = %self.name, executed, "Looper finished");
        executed
    }

    /// Drives the queue on the current thread until every producer is gone.
    ///
    /// # Panics
    ///
    /// Panics when called from within an async execution context.
    pub fn run_blocking(mut self) -> usize {
        let mut executed = 0;
        while let Some(job) = self.receiver.blocking_recv() {
            job();
            executed += 1;
        }
        debug!(looper = %self.name, executed, "Looper finished");
        executed
    }

    /// Runs the jobs that are already queued without waiting for more.
    pub fn run_pending(&mut self) -> usize {
        let mut executed = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            executed += 1;
        }
        executed
    }

    /// Moves the looper onto a dedicated, named OS thread.
    pub fn spawn_thread(self) -> io::Result<thread::JoinHandle<usize>> {
        let name = self.name.to_string();
        thread::Builder::new()
            .name(name)
            .spawn(move || self.run_blocking())
    }
}

impl fmt::Debug for Looper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Looper").field("name", &self.name).finish()
    }
}
