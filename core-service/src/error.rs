use bridge_traits::{BridgeError, LifecycleState};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Screen is not accepting interactions (state: {0})")]
    NotActive(LifecycleState),

    #[error("Illegal lifecycle transition from {from} to {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
