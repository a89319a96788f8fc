//! Time-related abstractions backed by `tokio::time`.
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{sleep, Duration, Instant};
//!
//! async fn example() {
//!     let start = Instant::now();
//!     sleep(Duration::from_millis(10)).await;
//!     assert!(start.elapsed() >= Duration::from_millis(10));
//! }
//! ```

pub use tokio::time::{sleep, timeout, Sleep, Timeout};

pub use tokio::time::error::Elapsed;

pub use std::time::{Duration, Instant};

/// Converts a millisecond count from configuration into a `Duration`.
pub fn millis(value: u64) -> Duration {
    Duration::from_millis(value)
}
