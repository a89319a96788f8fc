//! # Task Interop Demo
//!
//! Drives the main screen from the command line: a serial looper on its own
//! thread plays the main thread, the console plays the text view.
//!
//! Built only with the `cli` feature.
//!
//! ## Usage
//! ```bash
//! cargo run -p core-service --features cli --bin task-interop -- --action listener
//! task-interop --action future --delay-ms 500
//! task-interop --action all --log-format json --log-level debug
//! # Stop the screen before the task finishes to watch the future get cancelled:
//! task-interop --action future --stop-after-ms 200
//! ```

use anyhow::{anyhow, Context};
use bridge_desktop::{ConsoleTextDisplay, TracingLifecycleObserver};
use clap::{Parser, ValueEnum};
use core_async::executor::{serial, Executor, SerialExecutor};
use core_runtime::logging::{init_logging, parse_level, LogFormat};
use core_runtime::{AppConfig, StringResources};
use core_service::{Action, MainScreen};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "task-interop")]
#[command(about = "Consume one asynchronous task four different ways")]
struct Args {
    /// Interaction to perform
    #[arg(long, value_enum, default_value_t = ActionArg::All)]
    action: ActionArg,

    /// Simulated task duration in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Stop the screen this many milliseconds after the interaction starts
    #[arg(long)]
    stop_after_ms: Option<u64>,

    /// JSON file overriding the on-screen strings
    #[arg(long)]
    strings: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FormatArg::Compact)]
    log_format: FormatArg,

    /// Overrides TASK_INTEROP_LOG_LEVEL
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ActionArg {
    Listener,
    Await,
    Future,
    Single,
    Licenses,
    All,
}

impl ActionArg {
    fn actions(self) -> Vec<Action> {
        match self {
            ActionArg::Listener => vec![Action::Listener],
            ActionArg::Await => vec![Action::Await],
            ActionArg::Future => vec![Action::Future],
            ActionArg::Single => vec![Action::Single],
            ActionArg::Licenses => vec![Action::Licenses],
            ActionArg::All => Action::ALL.to_vec(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Pretty,
    Json,
    Compact,
}

impl From<FormatArg> for LogFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Pretty => LogFormat::Pretty,
            FormatArg::Json => LogFormat::Json,
            FormatArg::Compact => LogFormat::Compact,
        }
    }
}

/// Runs `f` on the main looper and waits for its result.
fn on_main<R, F>(main: &SerialExecutor, f: F) -> anyhow::Result<R>
where
    R: Send + 'static,
    F: FnOnce() -> R + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    main.execute(Box::new(move || {
        let _ = tx.send(f());
    }));
    rx.recv().context("main looper stopped")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut builder = AppConfig::from_env()?
        .display(Arc::new(ConsoleTextDisplay::new()))
        .lifecycle_observer(Arc::new(TracingLifecycleObserver::new()));
    if let Some(delay_ms) = args.delay_ms {
        builder = builder.task_delay(Duration::from_millis(delay_ms));
    }
    if let Some(path) = &args.strings {
        builder = builder.strings(StringResources::from_file(path)?);
    }
    let mut config = builder.build()?;

    let mut logging = config.logging.clone().with_format(args.log_format.into());
    if let Some(level) = &args.log_level {
        logging = logging.with_level(parse_level(level)?);
    }
    config.logging = logging.clone();
    init_logging(logging)?;
    info!(?config, "Configuration loaded");

    let runtime = core_async::runtime::multi_thread(2, "interop-rt")
        .context("failed to build runtime")?;
    let (main, looper) = serial("main");
    let looper_thread = looper.spawn_thread().context("failed to spawn main looper")?;

    let screen = Arc::new(MainScreen::new(
        &config,
        Arc::new(main.clone()),
        runtime.handle().clone(),
    ));

    let s = Arc::clone(&screen);
    on_main(&main, move || -> core_service::Result<()> {
        s.on_create()?;
        s.on_start()
    })??;

    let settle = config.task_delay + Duration::from_millis(250);
    let mut stopped = false;

    for action in args.action.actions() {
        let s = Arc::clone(&screen);
        on_main(&main, move || s.perform(action))??;

        if !action.starts_task() {
            continue;
        }

        match args.stop_after_ms {
            Some(stop_after) => {
                thread::sleep(Duration::from_millis(stop_after));
                let s = Arc::clone(&screen);
                on_main(&main, move || s.on_stop())??;
                stopped = true;
                thread::sleep(settle);
                info!(%action, text = %screen.display().text(), "Display after stop");
                break;
            }
            None => {
                thread::sleep(settle);
                info!(%action, text = %screen.display().text(), "Display after interaction");
            }
        }
    }

    let s = Arc::clone(&screen);
    on_main(&main, move || -> core_service::Result<()> {
        if !stopped {
            s.on_stop()?;
        }
        s.on_destroy()
    })??;

    drop(screen);
    drop(main);
    runtime.shutdown_timeout(Duration::from_secs(1));

    let executed = looper_thread
        .join()
        .map_err(|_| anyhow!("main looper panicked"))?;
    info!(executed, "Main looper finished");

    Ok(())
}
