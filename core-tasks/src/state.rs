//! One-shot completion cell shared by [`Task`](crate::Task) and
//! [`ListenableFuture`](crate::ListenableFuture).
//!
//! A cell is either pending (collecting listeners and async wakers) or done
//! (holding the terminal [`Outcome`]). The pending → done transition happens
//! under the cell's mutex exactly once; every later attempt is a no-op that
//! reports `false`.
//!
//! Listeners run outside the lock, in registration order, on the thread that
//! performed the transition. A listener registered after completion runs
//! immediately on the registering thread.

use std::any::Any;
use std::fmt;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};
use std::thread;
use std::time::{Duration, Instant};

use tracing::error;

use crate::error::{Cause, Result, TaskError};

/// Terminal state of a task or future.
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    Succeeded(T),
    Failed(Cause),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&Cause> {
        match self {
            Outcome::Failed(cause) => Some(cause),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Succeeded(_) => "succeeded",
            Outcome::Failed(_) => "failed",
            Outcome::Cancelled => "cancelled",
        }
    }
}

impl<T: Clone> Outcome<T> {
    /// Converts the outcome into the value a consumer retrieves.
    pub fn to_result(&self) -> Result<T> {
        match self {
            Outcome::Succeeded(value) => Ok(value.clone()),
            Outcome::Failed(cause) => Err(TaskError::Failed(Arc::clone(cause))),
            Outcome::Cancelled => Err(TaskError::Cancelled),
        }
    }
}

pub(crate) type Listener<T> = Box<dyn FnOnce(&Arc<Outcome<T>>) + Send + 'static>;

enum Slot<T> {
    Pending {
        listeners: Vec<Listener<T>>,
        wakers: Vec<Waker>,
    },
    Done(Arc<Outcome<T>>),
}

pub(crate) struct Completion<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

impl<T> Completion<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Pending {
                listeners: Vec::new(),
                wakers: Vec::new(),
            }),
            ready: Condvar::new(),
        }
    }

    pub(crate) fn done(outcome: Arc<Outcome<T>>) -> Self {
        Self {
            slot: Mutex::new(Slot::Done(outcome)),
            ready: Condvar::new(),
        }
    }

    // Listeners never run under the lock, so a poisoned guard still holds a
    // consistent slot.
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn outcome(&self) -> Option<Arc<Outcome<T>>> {
        match &*self.lock() {
            Slot::Done(outcome) => Some(Arc::clone(outcome)),
            Slot::Pending { .. } => None,
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        matches!(&*self.lock(), Slot::Done(_))
    }

    pub(crate) fn state_label(&self) -> &'static str {
        match &*self.lock() {
            Slot::Done(outcome) => outcome.label(),
            Slot::Pending { .. } => "pending",
        }
    }

    /// Moves the cell to its terminal state.
    ///
    /// Returns `false` without side effects when the cell is already done.
    /// If a listener panics, the remaining listeners still run and the first
    /// panic is resumed afterwards, unless this thread is already unwinding.
    pub(crate) fn complete(&self, outcome: Outcome<T>) -> bool {
        let outcome = Arc::new(outcome);
        let (listeners, wakers) = {
            let mut slot = self.lock();
            let (listeners, wakers) = match &mut *slot {
                Slot::Done(_) => return false,
                Slot::Pending { listeners, wakers } => (mem::take(listeners), mem::take(wakers)),
            };
            *slot = Slot::Done(Arc::clone(&outcome));
            (listeners, wakers)
        };

        self.ready.notify_all();
        for waker in wakers {
            waker.wake();
        }
        dispatch(listeners, &outcome);
        true
    }

    pub(crate) fn subscribe(&self, listener: Listener<T>) {
        let outcome = {
            let mut slot = self.lock();
            match &mut *slot {
                Slot::Pending { listeners, .. } => {
                    listeners.push(listener);
                    return;
                }
                Slot::Done(outcome) => Arc::clone(outcome),
            }
        };
        listener(&outcome);
    }

    /// Blocks the calling thread until the cell is done.
    pub(crate) fn wait(&self) -> Arc<Outcome<T>> {
        let mut slot = self.lock();
        loop {
            if let Slot::Done(outcome) = &*slot {
                return Arc::clone(outcome);
            }
            slot = self.ready.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Blocks until the cell is done or `timeout` elapses.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> Option<Arc<Outcome<T>>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Some(self.wait());
        };

        let mut slot = self.lock();
        loop {
            if let Slot::Done(outcome) = &*slot {
                return Some(Arc::clone(outcome));
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = self
                .ready
                .wait_timeout(slot, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            slot = guard;
        }
    }

    pub(crate) fn poll_outcome(&self, cx: &mut Context<'_>) -> Poll<Arc<Outcome<T>>> {
        let mut slot = self.lock();
        match &mut *slot {
            Slot::Done(outcome) => Poll::Ready(Arc::clone(outcome)),
            Slot::Pending { wakers, .. } => {
                if !wakers.iter().any(|waker| waker.will_wake(cx.waker())) {
                    wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("state", &self.state_label())
            .finish()
    }
}

fn dispatch<T>(listeners: Vec<Listener<T>>, outcome: &Arc<Outcome<T>>) {
    let mut first_panic: Option<Box<dyn Any + Send>> = None;

    for listener in listeners {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener(outcome))) {
            error!(
                panic = panic_message(payload.as_ref()),
                outcome = outcome.label(),
                "Completion listener panicked"
            );
            first_panic.get_or_insert(payload);
        }
    }

    if let Some(payload) = first_panic {
        if !thread::panicking() {
            panic::resume_unwind(payload);
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}
