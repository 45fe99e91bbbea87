//! Engine error types.
//!
//! Every fallible engine operation returns `EngineResult<T>`. Normalization is
//! the one exception: it never fails and degrades by omission instead.
//! Callers surface these errors verbatim; the engine never retries.

use thiserror::Error;

/// The unified error type for the draft and workflow engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Client-supplied input failed a precondition (e.g. an empty rejection reason).
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// The entity is not in the state the requested transition needs.
    #[error("{entity} '{id}' is {status}; cannot {action}")]
    InvalidState {
        entity: &'static str,
        id: String,
        status: String,
        action: &'static str,
    },

    /// A workflow step was resolved out of order or twice.
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    /// The capability gate denied the caller.
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    /// No draft or workflow exists with the given id.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The planner or materialization collaborator failed.
    #[error("upstream unavailable: {reason}")]
    UpstreamUnavailable { reason: String },

    /// The audit writer could not persist a transition record.
    ///
    /// A transition that cannot be audited is not committed.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl EngineError {
    /// Shorthand for a `Validation` error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation { reason: reason.into() }
    }

    /// Shorthand for a `Conflict` error.
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict { reason: reason.into() }
    }

    /// Shorthand for a `Forbidden` error.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden { reason: reason.into() }
    }

    /// Shorthand for an `UpstreamUnavailable` error.
    pub fn upstream(reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable { reason: reason.into() }
    }
}

/// Convenience alias used throughout the draftgate crates.
pub type EngineResult<T> = Result<T, EngineError>;
