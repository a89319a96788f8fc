//! Workspace facade crate.
//!
//! Re-exports the task model (`core-tasks`) and the runtime abstraction
//! (`core-async`) unconditionally. The `desktop-shims` feature additionally
//! exposes the sample screen (`core-service`) and its runtime configuration
//! (`core-runtime`) so a host can depend on a single crate.

pub use core_async;
pub use core_tasks;

#[cfg(feature = "desktop-shims")]
pub use core_runtime;
#[cfg(feature = "desktop-shims")]
pub use core_service;
