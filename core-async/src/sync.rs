//! Synchronization primitives.
//!
//! Re-exports the async-aware `tokio::sync` types used across the workspace
//! together with the cancellation token that backs lifecycle scopes.

pub use tokio::sync::{mpsc, oneshot, Mutex, MutexGuard, Notify};

pub use tokio_util::sync::CancellationToken;
