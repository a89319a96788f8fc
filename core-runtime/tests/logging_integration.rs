//! Integration tests for logging system

use bridge_traits::log::LogLevel;
use core_runtime::logging::{init_logging, parse_level, LogFormat, LoggingConfig};
use core_runtime::Error;

#[test]
fn test_format_selection() {
    #[cfg(debug_assertions)]
    assert_eq!(LoggingConfig::default().format, LogFormat::Pretty);

    #[cfg(not(debug_assertions))]
    assert_eq!(LoggingConfig::default().format, LogFormat::Compact);
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(parse_level("warn").unwrap())
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}

// The global subscriber can be installed once per process, so both
// outcomes are exercised in a single test.
#[test]
fn test_init_logging_installs_once() {
    let config = LoggingConfig::default().with_format(LogFormat::Compact);

    init_logging(config.clone()).expect("first initialization succeeds");
    tracing::info!(target: "core_tasks", "logging initialized");

    let err = init_logging(config).unwrap_err();
    assert!(matches!(err, Error::Logging(_)));
}

#[test]
fn test_init_logging_rejects_bad_filter_before_installing() {
    let config = LoggingConfig::default().with_filter("core_tasks=[[[");

    assert!(matches!(init_logging(config), Err(Error::Config(_))));
}
