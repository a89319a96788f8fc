//! Screen façade and bootstrap helpers.
//!
//! This crate wires host-provided bridges (text display, licenses navigator,
//! lifecycle observers) into the task interop core. Desktop hosts enable the
//! `desktop-shims` feature, which lets [`AppConfig`](core_runtime::AppConfig)
//! fall back to the console bridges from `bridge-desktop`.
//!
//! ```ignore
//! use core_async::executor::serial;
//! use core_service::{Action, MainScreen};
//! use std::sync::Arc;
//!
//! let config = core_runtime::AppConfig::builder().build()?;
//! let runtime = core_async::runtime::multi_thread(2, "interop-rt")?;
//! let (main, looper) = serial("main");
//!
//! let screen = MainScreen::new(&config, Arc::new(main), runtime.handle().clone());
//! screen.on_create()?;
//! screen.on_start()?;
//! screen.perform(Action::Future)?;
//! ```

pub mod error;
pub mod screen;

pub use error::{Result, ServiceError};
pub use screen::{Action, MainScreen};
