//! Engine error types.

use thiserror::Error;

use autoterm_core::ProviderError;

/// A schedule expression the cron parser rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid schedule expression '{expression}': {reason}")]
pub struct ScheduleError {
    pub expression: String,
    pub reason: String,
}

/// Errors that abort the decision (or one dispatch) of a single policy.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("tag '{tag}': {source}")]
    Schedule {
        tag: String,
        #[source]
        source: ScheduleError,
    },

    #[error("scheduling conflict: {0}")]
    Conflict(String),

    #[error("dispatch of {action} failed: {source}")]
    Dispatch {
        action: String,
        #[source]
        source: ProviderError,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
