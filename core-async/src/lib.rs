//! Runtime abstraction layer for the task interop workspace.
//!
//! All other crates depend on this crate instead of reaching for Tokio
//! directly. Besides thin wrappers around the Tokio runtime, it owns the
//! [`executor`] module: the small `Executor` capability that decides on which
//! thread a completion listener runs.
//!
//! # Modules
//!
//! - `runtime`: building and blocking on runtimes
//! - `task`: task spawning
//! - `time`: sleep, timeout, `Duration`, `Instant`
//! - `sync`: channels and async-aware locks
//! - `executor`: listener executors (direct, thread, runtime, serial looper)
//!
//! # Examples
//!
//! ```rust
//! use core_async::executor::{DirectExecutor, Executor};
//!
//! let executor = DirectExecutor;
//! executor.execute(Box::new(|| println!("runs inline")));
//! ```

// Re-export the async entry-point/test macros so downstream crates never need
// direct Tokio dependencies.
pub use core_async_macros::{main, test};

pub mod executor;
pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use executor::{DirectExecutor, Executor, Job, SerialExecutor};
pub use task::spawn;
pub use time::{sleep, Duration, Instant};
