//! Runtime utilities that abstract over the underlying async executor.
//!
//! Downstream crates never name Tokio directly; they build runtimes and block
//! on futures through this module.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion using a lightweight runtime.
///
/// Used by the `#[core_async::test]` and `#[core_async::main]` macros. Must
/// not be called from inside another runtime's worker thread.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}

/// Builds a multi-threaded runtime with the given number of workers.
///
/// Hosts that need a long-lived runtime (for example, to back a lifecycle
/// scope) use this instead of [`block_on`].
pub fn multi_thread(worker_threads: usize, thread_name: &str) -> std::io::Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(worker_threads.max(1))
        .thread_name(thread_name)
        .enable_all()
        .build()
}
