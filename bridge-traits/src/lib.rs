//! # Host Bridge Traits
//!
//! Host capabilities the core needs but cannot provide itself.
//!
//! ## Overview
//!
//! This crate defines the contract between the core and each host. A screen
//! renders into a [`TextDisplay`](display::TextDisplay), navigates through a
//! [`LicensesNavigator`](navigation::LicensesNavigator), reports its
//! lifecycle to [`LifecycleObserver`](lifecycle::LifecycleObserver)s and
//! forwards logs to a [`LoggerSink`](log::LoggerSink).
//!
//! | Platform | Implementation Crate |
//! |----------|---------------------|
//! | Desktop  | `bridge-desktop`    |
//! | Android  | host-provided       |
//!
//! ## Error Handling
//!
//! Fallible bridge calls return [`BridgeError`](error::BridgeError).
//! Implementations should convert host errors into it and keep the message
//! actionable.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync`: the core calls them from the
//! main executor as well as from worker threads.

pub mod display;
pub mod error;
pub mod lifecycle;
pub mod log;
pub mod navigation;
pub mod platform;

pub use error::BridgeError;

pub use display::TextDisplay;
pub use lifecycle::{LifecycleObserver, LifecycleState};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use navigation::LicensesNavigator;
pub use platform::PlatformSendSync;
