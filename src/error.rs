//! Error types for timer operations

use thiserror::Error;

use crate::state::TimerStatus;

/// Contract violations raised by the accumulator, engine and controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("cannot {operation} while timer is {status}")]
    InvalidState {
        operation: &'static str,
        status: TimerStatus,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("countdown must be started from within a tokio runtime")]
    NoRuntime,

    #[error("failed to lock {0}: lock poisoned")]
    Poisoned(&'static str),
}

impl TimerError {
    pub(crate) fn invalid_state(operation: &'static str, status: TimerStatus) -> Self {
        Self::InvalidState { operation, status }
    }
}
