//! # Application Configuration
//!
//! Configuration for the task interop sample.
//!
//! ## Overview
//!
//! [`AppConfig`] is assembled with a builder and validated fail-fast before
//! anything is started. It carries the task delay, the on-screen strings, the
//! logging setup and the host bridges a screen renders through.
//!
//! ## Required Bridges
//!
//! - `TextDisplay`: where results are rendered
//! - `LicensesNavigator`: opens the license notices
//!
//! When the `desktop-shims` feature is enabled, console-backed defaults are
//! injected for both if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{AppConfig, StringResources};
//! use std::time::Duration;
//!
//! let config = AppConfig::builder()
//!     .task_delay(Duration::from_millis(250))
//!     .strings(StringResources::from_json(r#"{ "waiting": "Hold on..." }"#)?)
//!     .build()?;
//! ```
//!
//! ## Environment
//!
//! [`AppConfig::from_env`] seeds a builder from:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `TASK_INTEROP_DELAY_MS` | Task delay in milliseconds |
//! | `TASK_INTEROP_STRINGS` | Path to a JSON strings file |
//! | `TASK_INTEROP_LOG_LEVEL` | Minimum log level for workspace crates |

use crate::error::{Error, Result};
use crate::logging::{parse_level, LoggingConfig};
use bridge_traits::{LicensesNavigator, LifecycleObserver, TextDisplay};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const ENV_DELAY_MS: &str = "TASK_INTEROP_DELAY_MS";
pub const ENV_STRINGS: &str = "TASK_INTEROP_STRINGS";
pub const ENV_LOG_LEVEL: &str = "TASK_INTEROP_LOG_LEVEL";

pub use core_tasks::DEFAULT_TASK_DELAY;

/// Upper bound on the simulated work duration.
pub const MAX_TASK_DELAY: Duration = Duration::from_secs(600);

/// Text shown on screen.
///
/// Every field may be overridden from JSON; missing keys keep their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringResources {
    /// Shown while a task is in flight
    pub waiting: String,
    /// Result of the listener interaction
    pub listener: String,
    /// Result of the await interaction
    pub await_text: String,
    /// Result of the listenable future interaction
    pub future: String,
    /// Result of the reactive single interaction
    pub single: String,
}

impl Default for StringResources {
    fn default() -> Self {
        Self {
            waiting: "Waiting...".to_string(),
            listener: "Task listener result".to_string(),
            await_text: "Await result".to_string(),
            future: "ListenableFuture result".to_string(),
            single: "Single result".to_string(),
        }
    }
}

impl StringResources {
    /// Parses a JSON object of string overrides.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid strings JSON: {}", e)))
    }

    /// Reads a JSON strings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read strings file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// Rejects blank strings: a blank result is indistinguishable from a
    /// screen that never rendered.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("waiting", &self.waiting),
            ("listener", &self.listener),
            ("await_text", &self.await_text),
            ("future", &self.future),
            ("single", &self.single),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("String `{name}` cannot be empty")));
            }
        }

        if self.waiting == self.listener
            || self.waiting == self.await_text
            || self.waiting == self.future
            || self.waiting == self.single
        {
            return Err(Error::Config(
                "Result strings must differ from the waiting text".to_string(),
            ));
        }

        Ok(())
    }
}

/// Application configuration. Use [`AppConfig::builder`] to construct.
#[derive(Clone)]
pub struct AppConfig {
    /// How long each simulated task takes
    pub task_delay: Duration,

    pub strings: StringResources,

    pub logging: LoggingConfig,

    /// Where results are rendered (required)
    pub display: Arc<dyn TextDisplay>,

    /// Opens the license notices (required)
    pub licenses: Arc<dyn LicensesNavigator>,

    /// Notified on every screen lifecycle transition
    pub lifecycle_observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("task_delay", &self.task_delay)
            .field("strings", &self.strings)
            .field("logging", &self.logging)
            .field("display", &"TextDisplay { ... }")
            .field("licenses", &"LicensesNavigator { ... }")
            .field("lifecycle_observers", &self.lifecycle_observers.len())
            .finish()
    }
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// A builder seeded from the process environment.
    pub fn from_env() -> Result<AppConfigBuilder> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// A builder seeded from `lookup`, which maps variable names to values.
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfigBuilder>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(raw) = lookup(ENV_DELAY_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_DELAY_MS} must be a whole number, got {raw:?}"))
            })?;
            builder = builder.task_delay(Duration::from_millis(millis));
        }

        if let Some(path) = lookup(ENV_STRINGS) {
            builder = builder.strings(StringResources::from_file(path)?);
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            let level = parse_level(&level)?;
            builder = builder.logging(LoggingConfig::default().with_level(level));
        }

        Ok(builder)
    }

    /// Checks the delay bound and the strings.
    pub fn validate(&self) -> Result<()> {
        if self.task_delay > MAX_TASK_DELAY {
            return Err(Error::Config(format!(
                "Task delay {:?} exceeds maximum of {:?}",
                self.task_delay, MAX_TASK_DELAY
            )));
        }

        self.strings.validate()
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn capability_missing(capability: &str, purpose: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: format!(
            "{capability} implementation is required to {purpose}. \
             Desktop: enable the 'desktop-shims' feature. \
             Mobile: inject the platform-native adapter."
        ),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_display() -> Result<Arc<dyn TextDisplay>> {
    Ok(Arc::new(bridge_desktop::ConsoleTextDisplay::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_display() -> Result<Arc<dyn TextDisplay>> {
    Err(capability_missing("TextDisplay", "render results"))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_licenses() -> Result<Arc<dyn LicensesNavigator>> {
    Ok(Arc::new(bridge_desktop::ConsoleLicensesScreen::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_licenses() -> Result<Arc<dyn LicensesNavigator>> {
    Err(capability_missing("LicensesNavigator", "open license notices"))
}

/// Builder for [`AppConfig`].
#[derive(Default)]
pub struct AppConfigBuilder {
    task_delay: Option<Duration>,
    strings: Option<StringResources>,
    logging: Option<LoggingConfig>,
    display: Option<Arc<dyn TextDisplay>>,
    licenses: Option<Arc<dyn LicensesNavigator>>,
    lifecycle_observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl AppConfigBuilder {
    pub fn task_delay(mut self, delay: Duration) -> Self {
        self.task_delay = Some(delay);
        self
    }

    pub fn strings(mut self, strings: StringResources) -> Self {
        self.strings = Some(strings);
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    pub fn display(mut self, display: Arc<dyn TextDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn licenses(mut self, licenses: Arc<dyn LicensesNavigator>) -> Self {
        self.licenses = Some(licenses);
        self
    }

    /// Adds an observer; may be called repeatedly.
    pub fn lifecycle_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.lifecycle_observers.push(observer);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when a required bridge is absent and no
    ///   desktop default is available
    /// - [`Error::Config`] when validation fails
    pub fn build(self) -> Result<AppConfig> {
        let display = match self.display {
            Some(display) => display,
            None => provide_default_display()?,
        };

        let licenses = match self.licenses {
            Some(licenses) => licenses,
            None => provide_default_licenses()?,
        };

        let config = AppConfig {
            task_delay: self.task_delay.unwrap_or(DEFAULT_TASK_DELAY),
            strings: self.strings.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
            display,
            licenses,
            lifecycle_observers: self.lifecycle_observers,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::LogLevel;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryDisplay(Mutex<String>);

    impl TextDisplay for MemoryDisplay {
        fn set_text(&self, text: &str) {
            *self.0.lock().unwrap() = text.to_string();
        }

        fn text(&self) -> String {
            self.0.lock().unwrap().clone()
        }
    }

    struct NoopLicenses;

    impl LicensesNavigator for NoopLicenses {
        fn open_licenses(&self) -> BridgeResult<()> {
            Ok(())
        }
    }

    fn builder_with_bridges() -> AppConfigBuilder {
        AppConfig::builder()
            .display(Arc::new(MemoryDisplay::default()))
            .licenses(Arc::new(NoopLicenses))
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = builder_with_bridges().build().unwrap();

        assert_eq!(config.task_delay, DEFAULT_TASK_DELAY);
        assert_eq!(config.strings, StringResources::default());
        assert!(config.lifecycle_observers.is_empty());
    }

    #[test]
    fn test_default_delay_matches_task_source() {
        let config = builder_with_bridges().build().unwrap();

        assert_eq!(
            config.task_delay,
            core_tasks::SimpleTaskSource::default().delay()
        );
    }

    #[test]
    fn test_builder_overrides() {
        let strings = StringResources {
            waiting: "Hold on".to_string(),
            ..Default::default()
        };

        let config = builder_with_bridges()
            .task_delay(Duration::from_millis(5))
            .strings(strings.clone())
            .build()
            .unwrap();

        assert_eq!(config.task_delay, Duration::from_millis(5));
        assert_eq!(config.strings, strings);
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_display() {
        let err = AppConfig::builder()
            .licenses(Arc::new(NoopLicenses))
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            Error::CapabilityMissing { ref capability, .. } if capability == "TextDisplay"
        ));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_builder_uses_desktop_defaults() {
        assert!(AppConfig::builder().build().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_strings() {
        let strings = StringResources {
            future: "   ".to_string(),
            ..Default::default()
        };

        let err = builder_with_bridges().strings(strings).build().unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("future")));
    }

    #[test]
    fn test_validate_rejects_result_equal_to_waiting() {
        let strings = StringResources {
            single: "Waiting...".to_string(),
            ..Default::default()
        };

        assert!(strings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_excessive_delay() {
        let result = builder_with_bridges()
            .task_delay(MAX_TASK_DELAY + Duration::from_secs(1))
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_strings_from_partial_json() {
        let strings = StringResources::from_json(r#"{ "await_text": "Awaited!" }"#).unwrap();

        assert_eq!(strings.await_text, "Awaited!");
        assert_eq!(strings.waiting, StringResources::default().waiting);
    }

    #[test]
    fn test_strings_from_invalid_json() {
        let err = StringResources::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_strings_from_missing_file() {
        let err = StringResources::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("here.json")));
    }

    #[test]
    fn test_from_lookup_reads_delay_and_level() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DELAY_MS, "250"),
            (ENV_LOG_LEVEL, "debug"),
        ]))
        .unwrap()
        .display(Arc::new(MemoryDisplay::default()))
        .licenses(Arc::new(NoopLicenses))
        .build()
        .unwrap();

        assert_eq!(config.task_delay, Duration::from_millis(250));
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_from_lookup_rejects_bad_delay() {
        let result = AppConfig::from_lookup(lookup(&[(ENV_DELAY_MS, "soon")]));
        assert!(matches!(result, Err(Error::Config(ref msg)) if msg.contains(ENV_DELAY_MS)));
    }

    #[test]
    fn test_from_lookup_without_variables() {
        let config = AppConfig::from_lookup(lookup(&[]))
            .unwrap()
            .display(Arc::new(MemoryDisplay::default()))
            .licenses(Arc::new(NoopLicenses))
            .build()
            .unwrap();

        assert_eq!(config.task_delay, DEFAULT_TASK_DELAY);
    }

    #[test]
    fn test_debug_hides_bridges() {
        let config = builder_with_bridges().build().unwrap();
        let debug = format!("{:?}", config);

        assert!(debug.contains("TextDisplay { ... }"));
        assert!(debug.contains("task_delay"));
    }
}
