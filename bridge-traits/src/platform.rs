//! Thread-safety bound shared by every bridge trait.
//!
//! Bridges are invoked from the main executor, from task workers and from
//! runtime threads, so every implementation must be shareable across threads.

/// Marker trait for `Send + Sync` bridge implementations.
pub trait PlatformSendSync: Send + Sync {}

impl<T> PlatformSendSync for T where T: Send + Sync {}
