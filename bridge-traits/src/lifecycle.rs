//! Screen Lifecycle
//!
//! A screen moves through `Initialized -> Created -> Started -> Stopped ->
//! Destroyed`, possibly bouncing between `Started` and `Stopped` several times
//! before it is destroyed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::PlatformSendSync;

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Constructed, not yet created
    Initialized,
    /// Created but not visible
    Created,
    /// Visible and accepting interactions
    Started,
    /// No longer visible
    Stopped,
    /// Torn down; terminal
    Destroyed,
}

impl LifecycleState {
    /// Whether the screen accepts user interactions in this state.
    pub fn is_active(&self) -> bool {
        matches!(self, LifecycleState::Created | LifecycleState::Started)
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    pub fn can_transition_to(&self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Initialized, Created)
                | (Created, Started)
                | (Started, Stopped)
                | (Stopped, Started)
                | (Created, Destroyed)
                | (Stopped, Destroyed)
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecycleState::Initialized => "initialized",
            LifecycleState::Created => "created",
            LifecycleState::Started => "started",
            LifecycleState::Stopped => "stopped",
            LifecycleState::Destroyed => "destroyed",
        };
        f.write_str(label)
    }
}

/// Lifecycle observer trait
///
/// Notified after each lifecycle transition, on the thread that drove it.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::lifecycle::{LifecycleObserver, LifecycleState};
///
/// struct PauseOnStop;
///
/// impl LifecycleObserver for PauseOnStop {
///     fn on_state_changed(&self, state: LifecycleState) {
///         if state == LifecycleState::Stopped {
///             pause_work();
///         }
///     }
/// }
/// ```
pub trait LifecycleObserver: PlatformSendSync {
    fn on_state_changed(&self, state: LifecycleState);
}
