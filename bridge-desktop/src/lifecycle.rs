//! Lifecycle observer that reports transitions through `tracing`.

use bridge_traits::lifecycle::{LifecycleObserver, LifecycleState};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Logs every lifecycle transition and remembers the most recent one.
#[derive(Debug, Default)]
pub struct TracingLifecycleObserver {
    last: Mutex<Option<LifecycleState>>,
}

impl TracingLifecycleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_state(&self) -> Option<LifecycleState> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LifecycleObserver for TracingLifecycleObserver {
    fn on_state_changed(&self, state: LifecycleState) {
        info!(%state, "Screen lifecycle changed");
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(state);
    }
}
