use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// The error payload carried by a failed task or future.
///
/// Shared so that every observer of a handle sees the same error instance.
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Wraps any error into a [`Cause`].
pub fn cause<E>(error: E) -> Cause
where
    E: std::error::Error + Send + Sync + 'static,
{
    Arc::new(error)
}

#[derive(Error, Debug, Clone)]
pub enum TaskError {
    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Operation failed: {0}")]
    Failed(Cause),

    #[error("Operation has not completed yet")]
    NotComplete,

    #[error("Timed out after {0:?} waiting for completion")]
    Timeout(Duration),

    #[error("Operation was already completed")]
    AlreadyComplete,
}

impl TaskError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskError::Cancelled)
    }

    /// Returns the upstream cause for [`TaskError::Failed`].
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            TaskError::Failed(cause) => Some(cause),
            _ => None,
        }
    }
}

/// Cause recorded when a completer is dropped before completing its future.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Completer for `{tag}` was dropped without completing its future")]
pub struct FutureAbandoned {
    pub tag: String,
}

/// Generic failure with a plain message, for sources that have no richer
/// error type to report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TaskFailure(pub String);

pub type Result<T> = std::result::Result<T, TaskError>;
