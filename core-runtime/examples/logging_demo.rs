//! Logging system demonstration
//!
//! Initializes logging in the requested format, mirrors every event to a
//! console sink, and emits a few events from inside spans.
//!
//! Run with:
//! ```bash
//! cargo run --example logging_demo
//! cargo run --example logging_demo -- json
//! cargo run --example logging_demo -- compact "core_runtime=trace"
//! ```

use bridge_traits::log::{ConsoleLogger, LogLevel};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, span, warn, Level};

#[core_async::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let format = args
        .get(1)
        .and_then(|raw| raw.parse::<LogFormat>().ok())
        .unwrap_or_default();

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_spans(true)
        .with_logger_sink(Arc::new(ConsoleLogger::default()));

    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }

    if let Err(e) = init_logging(config) {
        eprintln!("Failed to initialize logging: {e}");
        return;
    }

    info!(?format, "Logging initialized");

    let result = simulated_task(Duration::from_millis(50)).await;
    info!(%result, "Task finished");

    let screen = span!(Level::INFO, "screen", state = "started");
    let _enter = screen.enter();
    debug!(action = "future", "Interaction requested");
    warn!(action = "future", "Screen stopped before the task completed");
}

#[instrument]
async fn simulated_task(delay: Duration) -> String {
    debug!("Waiting");
    core_async::sleep(delay).await;
    "done".to_string()
}
