//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `TextDisplay` backed by an in-memory string echoed to stdout
//! - `LicensesNavigator` that prints the bundled license notices
//! - `LifecycleObserver` that reports transitions through `tracing`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ConsoleLicensesScreen, ConsoleTextDisplay};
//! use std::sync::Arc;
//!
//! let display = Arc::new(ConsoleTextDisplay::new());
//! let licenses = Arc::new(ConsoleLicensesScreen::new());
//! // Hand both to the screen being hosted.
//! ```

mod display;
mod licenses;
mod lifecycle;

pub use display::ConsoleTextDisplay;
pub use licenses::{bundled_notices, ConsoleLicensesScreen, LicenseNotice};
pub use lifecycle::TracingLifecycleObserver;
