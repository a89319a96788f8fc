//! The sample's single screen.
//!
//! [`MainScreen`] wires one text display to five interactions. Four of them
//! start a simulated task and render its result, each consuming the task a
//! different way; the fifth opens the license notices.
//!
//! All rendering goes through the main executor. The screen itself never
//! blocks: the only blocking retrieval happens inside a listener that runs
//! after the future has completed.

use std::fmt;
use std::future::IntoFuture;
use std::pin::pin;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bridge_traits::{LicensesNavigator, LifecycleObserver, LifecycleState, TextDisplay};
use core_async::executor::Executor;
use core_async::runtime::Handle;
use core_async::sync::CancellationToken;
use core_runtime::config::{AppConfig, StringResources};
use core_tasks::{Disposable, ListenableFuture, SimpleTaskSource, Task, TaskError, TaskExt};
use futures::future::{self, Either};
use tracing::{debug, info, warn};

use crate::error::{Result, ServiceError};

/// A user interaction on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Render through a completion listener
    Listener,
    /// Render after awaiting the task in the lifecycle scope
    Await,
    /// Render through a listenable future
    Future,
    /// Render through a reactive single
    Single,
    /// Open the license notices
    Licenses,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Listener,
        Action::Await,
        Action::Future,
        Action::Single,
        Action::Licenses,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::Listener => "listener",
            Action::Await => "await",
            Action::Future => "future",
            Action::Single => "single",
            Action::Licenses => "licenses",
        }
    }

    /// Whether the action starts a task.
    pub fn starts_task(&self) -> bool {
        !matches!(self, Action::Licenses)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| ServiceError::UnknownAction(value.to_string()))
    }
}

struct ScreenState {
    lifecycle: LifecycleState,
    /// Cancelled on destroy; bounds every awaiting interaction.
    scope: CancellationToken,
    /// Cancelled and replaced on stop; bounds completion listeners.
    listener_scope: CancellationToken,
    listenable_future: Option<ListenableFuture<String>>,
    subscriptions: Vec<Disposable>,
}

/// The sample's main screen.
pub struct MainScreen {
    display: Arc<dyn TextDisplay>,
    main: Arc<dyn Executor>,
    runtime: Handle,
    licenses: Arc<dyn LicensesNavigator>,
    observers: Vec<Arc<dyn LifecycleObserver>>,
    source: SimpleTaskSource,
    strings: StringResources,
    state: Mutex<ScreenState>,
}

impl MainScreen {
    /// Creates a screen that renders on `main` and awaits on `runtime`.
    pub fn new(config: &AppConfig, main: Arc<dyn Executor>, runtime: Handle) -> Self {
        Self {
            display: Arc::clone(&config.display),
            main,
            runtime,
            licenses: Arc::clone(&config.licenses),
            observers: config.lifecycle_observers.clone(),
            source: SimpleTaskSource::new(config.task_delay),
            strings: config.strings.clone(),
            state: Mutex::new(ScreenState {
                lifecycle: LifecycleState::Initialized,
                scope: CancellationToken::new(),
                listener_scope: CancellationToken::new(),
                listenable_future: None,
                subscriptions: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ScreenState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.state().lifecycle
    }

    pub fn display(&self) -> &Arc<dyn TextDisplay> {
        &self.display
    }

    /// The future started by the most recent [`Action::Future`].
    pub fn listenable_future(&self) -> Option<ListenableFuture<String>> {
        self.state().listenable_future.clone()
    }

    /// Number of single subscriptions still waiting to deliver.
    pub fn subscription_count(&self) -> usize {
        self.state()
            .subscriptions
            .iter()
            .filter(|subscription| !subscription.is_disposed())
            .count()
    }

    pub fn on_create(&self) -> Result<()> {
        self.transition(LifecycleState::Created)
    }

    pub fn on_start(&self) -> Result<()> {
        self.transition(LifecycleState::Started)
    }

    /// Stops the screen, drops pending completion listeners and cancels the
    /// outstanding listenable future.
    ///
    /// The task behind the future keeps running; only the future is
    /// cancelled, without interruption. Listeners registered before the stop
    /// never render, even if the screen starts again.
    pub fn on_stop(&self) -> Result<()> {
        self.transition(LifecycleState::Stopped)?;

        let (listener_scope, future) = {
            let mut state = self.state();
            let previous = std::mem::replace(&mut state.listener_scope, CancellationToken::new());
            (previous, state.listenable_future.clone())
        };
        listener_scope.cancel();

        if let Some(future) = future {
            let cancelled = future.cancel(false);
            debug!(cancelled, "Cancelled outstanding listenable future on stop");
        }
        Ok(())
    }

    /// Tears the screen down: cancels the lifecycle scope and disposes every
    /// single subscription.
    pub fn on_destroy(&self) -> Result<()> {
        self.transition(LifecycleState::Destroyed)?;

        let (scope, subscriptions, future) = {
            let mut state = self.state();
            state.listener_scope.cancel();
            (
                state.scope.clone(),
                std::mem::take(&mut state.subscriptions),
                state.listenable_future.take(),
            )
        };

        scope.cancel();
        for subscription in &subscriptions {
            subscription.dispose();
        }
        if let Some(future) = future {
            future.cancel(false);
        }

        debug!(disposed = subscriptions.len(), "Screen destroyed");
        Ok(())
    }

    fn transition(&self, next: LifecycleState) -> Result<()> {
        {
            let mut state = self.state();
            let current = state.lifecycle;
            if !current.can_transition_to(next) {
                return Err(ServiceError::InvalidTransition {
                    from: current,
                    to: next,
                });
            }
            state.lifecycle = next;
        }

        for observer in &self.observers {
            observer.on_state_changed(next);
        }
        Ok(())
    }

    /// Handles a user interaction.
    ///
    /// Must be called on the main executor's thread. Task actions show the
    /// waiting text immediately and the result once the task completes; an
    /// interaction that ends in failure or cancellation leaves the display
    /// untouched and is logged instead.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotActive`] unless the screen is created or started
    /// - [`ServiceError::Bridge`] if the licenses screen cannot be opened
    pub fn perform(&self, action: Action) -> Result<()> {
        let lifecycle = self.lifecycle_state();
        if !lifecycle.is_active() {
            return Err(ServiceError::NotActive(lifecycle));
        }

        info!(%action, "Performing interaction");

        match action {
            Action::Listener => self.run_listener(),
            Action::Await => self.run_await(),
            Action::Future => self.run_future(),
            Action::Single => self.run_single(),
            Action::Licenses => self.licenses.open_licenses()?,
        }
        Ok(())
    }

    fn start_task(&self, text: &str) -> Task<String> {
        self.display.set_text(&self.strings.waiting);
        self.source.create(text)
    }

    /// Completion listener on the main executor, dropped when the screen
    /// stops.
    fn run_listener(&self) {
        let task = self.start_task(&self.strings.listener);
        let display = Arc::clone(&self.display);
        let listener_scope = self.state().listener_scope.clone();

        task.add_on_complete_listener_on(Arc::clone(&self.main), move |completed| {
            if listener_scope.is_cancelled() {
                debug!(action = "listener", "Screen stopped; listener skipped");
                return;
            }
            match completed.result() {
                Ok(value) => display.set_text(&value),
                Err(err) => interaction_failed(Action::Listener, &err),
            }
        });
    }

    /// Awaits the task on the runtime, bounded by the lifecycle scope.
    fn run_await(&self) {
        let task = self.start_task(&self.strings.await_text);
        let scope = self.state().scope.clone();
        let display = Arc::clone(&self.display);
        let main = Arc::clone(&self.main);
        let render_scope = scope.clone();

        self.runtime.spawn(async move {
            let cancelled = pin!(scope.cancelled());
            let result = match future::select(cancelled, task.into_future()).await {
                Either::Left(_) => {
                    debug!(action = "await", "Lifecycle scope cancelled before the task finished");
                    return;
                }
                Either::Right((result, _)) => result,
            };

            match result {
                Ok(value) => main.execute(Box::new(move || {
                    if render_scope.is_cancelled() {
                        return;
                    }
                    display.set_text(&value);
                })),
                Err(err) => interaction_failed(Action::Await, &err),
            }
        });
    }

    /// Adapts the task into a listenable future and keeps it so that stopping
    /// the screen can cancel it.
    fn run_future(&self) {
        let future = self.start_task(&self.strings.future).to_listenable_future();
        let reader = future.clone();
        let display = Arc::clone(&self.display);

        future.add_listener(Arc::clone(&self.main), move || match reader.get_done() {
            Ok(value) => display.set_text(&value),
            Err(err) => interaction_failed(Action::Future, &err),
        });

        self.state().listenable_future = Some(future);
    }

    /// Subscribes to the task as a single, observed on the main executor.
    fn run_single(&self) {
        let task = self.start_task(&self.strings.single);
        let display = Arc::clone(&self.display);

        let subscription = task
            .to_single()
            .observe_on(Arc::clone(&self.main))
            .subscribe_with(
                move |value| display.set_text(&value),
                |err| interaction_failed(Action::Single, &err),
            );

        let mut state = self.state();
        state.subscriptions.retain(|live| !live.is_disposed());
        state.subscriptions.push(subscription);
    }
}

impl fmt::Debug for MainScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("MainScreen")
            .field("lifecycle", &state.lifecycle)
            .field("task_delay", &self.source.delay())
            .field("has_future", &state.listenable_future.is_some())
            .field("subscriptions", &state.subscriptions.len())
            .finish()
    }
}

fn interaction_failed(action: Action, err: &TaskError) {
    if err.is_cancelled() {
        debug!(%action, "Interaction cancelled; display left unchanged");
    } else {
        warn!(%action, error = %err, "Interaction failed; display left unchanged");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::BridgeError;
    use core_async::executor::{serial, DirectExecutor, Looper};
    use mockall::{mock, predicate::eq, Sequence};
    use std::sync::mpsc;
    use std::time::Duration;

    mock! {
        pub Display {}

        impl TextDisplay for Display {
            fn set_text(&self, text: &str);
            fn text(&self) -> String;
        }
    }

    mock! {
        pub Licenses {}

        impl LicensesNavigator for Licenses {
            fn open_licenses(&self) -> BridgeResult<()>;
        }
    }

    mock! {
        pub Observer {}

        impl LifecycleObserver for Observer {
            fn on_state_changed(&self, state: LifecycleState);
        }
    }

    fn runtime() -> core_async::runtime::Runtime {
        core_async::runtime::multi_thread(1, "screen-test-rt").unwrap()
    }

    fn config(display: MockDisplay, licenses: MockLicenses, delay: Duration) -> AppConfig {
        AppConfig::builder()
            .task_delay(delay)
            .display(Arc::new(display))
            .licenses(Arc::new(licenses))
            .build()
            .unwrap()
    }

    fn started(config: &AppConfig, rt: &core_async::runtime::Runtime) -> (MainScreen, Looper) {
        let (main, looper) = serial("main");
        let screen = MainScreen::new(config, Arc::new(main), rt.handle().clone());
        screen.on_create().unwrap();
        screen.on_start().unwrap();
        (screen, looper)
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("future".parse::<Action>().unwrap(), Action::Future);
        assert_eq!("SINGLE".parse::<Action>().unwrap(), Action::Single);
        assert!(matches!(
            "rx".parse::<Action>(),
            Err(ServiceError::UnknownAction(_))
        ));
        assert!(!Action::Licenses.starts_task());
    }

    #[test]
    fn test_lifecycle_notifies_observers_in_order() {
        let rt = runtime();
        let mut observer = MockObserver::new();
        let mut seq = Sequence::new();
        for state in [
            LifecycleState::Created,
            LifecycleState::Started,
            LifecycleState::Stopped,
            LifecycleState::Destroyed,
        ] {
            observer
                .expect_on_state_changed()
                .with(eq(state))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
        }

        let config = AppConfig::builder()
            .display(Arc::new(MockDisplay::new()))
            .licenses(Arc::new(MockLicenses::new()))
            .lifecycle_observer(Arc::new(observer))
            .build()
            .unwrap();
        let screen = MainScreen::new(&config, Arc::new(DirectExecutor), rt.handle().clone());

        screen.on_create().unwrap();
        screen.on_start().unwrap();
        screen.on_stop().unwrap();
        screen.on_destroy().unwrap();

        assert_eq!(screen.lifecycle_state(), LifecycleState::Destroyed);
    }

    #[test]
    fn test_illegal_transition_is_rejected() {
        let rt = runtime();
        let config = config(MockDisplay::new(), MockLicenses::new(), Duration::ZERO);
        let screen = MainScreen::new(&config, Arc::new(DirectExecutor), rt.handle().clone());

        let err = screen.on_start().unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidTransition {
                from: LifecycleState::Initialized,
                to: LifecycleState::Started
            }
        ));
    }

    #[test]
    fn test_perform_requires_active_screen() {
        let rt = runtime();
        let config = config(MockDisplay::new(), MockLicenses::new(), Duration::ZERO);
        let screen = MainScreen::new(&config, Arc::new(DirectExecutor), rt.handle().clone());

        let err = screen.perform(Action::Listener).unwrap_err();
        assert!(matches!(err, ServiceError::NotActive(LifecycleState::Initialized)));
    }

    #[test]
    fn test_licenses_action_opens_navigator() {
        let rt = runtime();
        let mut licenses = MockLicenses::new();
        licenses.expect_open_licenses().times(1).returning(|| Ok(()));
        let config = config(MockDisplay::new(), licenses, Duration::ZERO);
        let (screen, _looper) = started(&config, &rt);

        screen.perform(Action::Licenses).unwrap();
    }

    #[test]
    fn test_licenses_failure_is_bridge_error() {
        let rt = runtime();
        let mut licenses = MockLicenses::new();
        licenses
            .expect_open_licenses()
            .returning(|| Err(BridgeError::NotAvailable("licenses".into())));
        let config = config(MockDisplay::new(), licenses, Duration::ZERO);
        let (screen, _looper) = started(&config, &rt);

        let err = screen.perform(Action::Licenses).unwrap_err();
        assert!(matches!(err, ServiceError::Bridge(BridgeError::NotAvailable(_))));
    }

    const WAIT: Duration = Duration::from_secs(5);
    /// How long to watch for a render that must not happen.
    const QUIET: Duration = Duration::from_millis(300);

    /// A display that forwards every rendered text to the returned receiver.
    fn recording_display() -> (MockDisplay, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        let mut display = MockDisplay::new();
        display.expect_set_text().returning(move |text| {
            let _ = tx.send(text.to_string());
        });
        (display, rx)
    }

    /// A created screen whose main looper runs on its own thread.
    fn with_main_thread(config: &AppConfig, rt: &core_async::runtime::Runtime) -> MainScreen {
        let (main, looper) = serial("main");
        looper.spawn_thread().unwrap();
        let screen = MainScreen::new(config, Arc::new(main), rt.handle().clone());
        screen.on_create().unwrap();
        screen
    }

    fn next_text(rx: &mpsc::Receiver<String>) -> String {
        rx.recv_timeout(WAIT).expect("display was not updated in time")
    }

    fn assert_renders(action: Action, expected: &str) {
        let rt = runtime();
        let (display, rx) = recording_display();
        let config = config(display, MockLicenses::new(), Duration::from_millis(20));
        let screen = with_main_thread(&config, &rt);
        screen.on_start().unwrap();

        screen.perform(action).unwrap();

        assert_eq!(next_text(&rx), "Waiting...");
        assert_eq!(next_text(&rx), expected);
    }

    #[test]
    fn test_listener_action_renders_result() {
        assert_renders(Action::Listener, "Task listener result");
    }

    #[test]
    fn test_await_action_renders_result() {
        assert_renders(Action::Await, "Await result");
    }

    #[test]
    fn test_future_action_renders_result() {
        assert_renders(Action::Future, "ListenableFuture result");
    }

    #[test]
    fn test_single_action_renders_result() {
        assert_renders(Action::Single, "Single result");
    }

    #[test]
    fn test_task_actions_render_before_start() {
        let rt = runtime();
        for (action, expected) in [
            (Action::Listener, "Task listener result"),
            (Action::Await, "Await result"),
            (Action::Future, "ListenableFuture result"),
            (Action::Single, "Single result"),
        ] {
            let (display, rx) = recording_display();
            let config = config(display, MockLicenses::new(), Duration::from_millis(20));
            let screen = with_main_thread(&config, &rt);
            assert_eq!(screen.lifecycle_state(), LifecycleState::Created);

            screen.perform(action).unwrap();

            assert_eq!(next_text(&rx), "Waiting...");
            assert_eq!(next_text(&rx), expected, "{action} in created state");
        }
    }

    #[test]
    fn test_listener_skips_render_when_stopped() {
        let rt = runtime();
        let (display, rx) = recording_display();
        let config = config(display, MockLicenses::new(), Duration::from_millis(20));
        let screen = with_main_thread(&config, &rt);
        screen.on_start().unwrap();

        screen.perform(Action::Listener).unwrap();
        screen.on_stop().unwrap();

        assert_eq!(next_text(&rx), "Waiting...");
        assert!(rx.recv_timeout(QUIET).is_err());
    }

    #[test]
    fn test_listener_stays_dropped_after_restart() {
        let rt = runtime();
        let (display, rx) = recording_display();
        let config = config(display, MockLicenses::new(), Duration::from_millis(100));
        let screen = with_main_thread(&config, &rt);
        screen.on_start().unwrap();

        screen.perform(Action::Listener).unwrap();
        screen.on_stop().unwrap();
        screen.on_start().unwrap();

        assert_eq!(next_text(&rx), "Waiting...");
        assert!(rx.recv_timeout(QUIET).is_err());

        // A listener registered after the restart belongs to the new scope.
        screen.perform(Action::Listener).unwrap();
        assert_eq!(next_text(&rx), "Waiting...");
        assert_eq!(next_text(&rx), "Task listener result");
    }

    #[test]
    fn test_destroy_cancels_await_scope() {
        let rt = runtime();
        let (display, rx) = recording_display();
        let config = config(display, MockLicenses::new(), Duration::from_millis(50));
        let screen = with_main_thread(&config, &rt);
        screen.on_start().unwrap();

        screen.perform(Action::Await).unwrap();
        screen.on_stop().unwrap();
        screen.on_destroy().unwrap();

        assert_eq!(next_text(&rx), "Waiting...");
        assert!(rx.recv_timeout(QUIET).is_err());
    }

    #[test]
    fn test_stop_cancels_outstanding_future() {
        let rt = runtime();
        let (display, rx) = recording_display();
        let config = config(display, MockLicenses::new(), Duration::from_millis(50));
        let screen = with_main_thread(&config, &rt);
        screen.on_start().unwrap();

        screen.perform(Action::Future).unwrap();
        screen.on_stop().unwrap();

        let future = screen.listenable_future().unwrap();
        assert!(future.is_cancelled());
        assert!(matches!(future.get(), Err(TaskError::Cancelled)));

        // The cancellation listener runs on main and must not render.
        assert_eq!(next_text(&rx), "Waiting...");
        assert!(rx.recv_timeout(QUIET).is_err());
    }

    #[test]
    fn test_delivered_singles_are_released() {
        let rt = runtime();
        let (display, rx) = recording_display();
        let config = config(display, MockLicenses::new(), Duration::from_millis(5));
        let screen = with_main_thread(&config, &rt);
        screen.on_start().unwrap();

        for _ in 0..10 {
            screen.perform(Action::Single).unwrap();
        }

        let results = (0..20)
            .map(|_| next_text(&rx))
            .filter(|text| text == "Single result")
            .count();
        assert_eq!(results, 10);
        assert_eq!(screen.subscription_count(), 0);

        // The next subscription prunes the delivered ones.
        screen.perform(Action::Single).unwrap();
        assert_eq!(screen.state().subscriptions.len(), 1);
        assert_eq!(next_text(&rx), "Waiting...");
        assert_eq!(next_text(&rx), "Single result");
        assert_eq!(screen.subscription_count(), 0);
    }

    #[test]
    fn test_destroy_disposes_subscriptions() {
        let rt = runtime();
        let (display, rx) = recording_display();
        let config = config(display, MockLicenses::new(), Duration::from_millis(100));
        let screen = with_main_thread(&config, &rt);
        screen.on_start().unwrap();

        screen.perform(Action::Single).unwrap();
        screen.perform(Action::Single).unwrap();
        assert_eq!(screen.subscription_count(), 2);

        screen.on_stop().unwrap();
        screen.on_destroy().unwrap();
        assert_eq!(screen.subscription_count(), 0);

        assert_eq!(next_text(&rx), "Waiting...");
        assert_eq!(next_text(&rx), "Waiting...");
        assert!(rx.recv_timeout(QUIET).is_err());
    }
}
