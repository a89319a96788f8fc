//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the task interop crates:
//! - Logging and tracing initialisation
//! - Application configuration and string resources
//!
//! ## Overview
//!
//! Nothing in here knows about tasks or futures. The crate establishes the
//! logging conventions and the fail-fast configuration every host goes
//! through before a screen is created.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AppConfig, AppConfigBuilder, StringResources};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
