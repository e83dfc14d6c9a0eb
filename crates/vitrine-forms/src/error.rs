// File: src/error.rs
// Purpose: Error types for form orchestration, submission and postal lookups

/// Misuse of the orchestrator or a broken form configuration.
///
/// User input mistakes are never reported through this type; they end up as
/// `Validity::Invalid` in the field state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("invalid form configuration: {0}")]
    InvalidConfig(String),

    #[error("a submission is already in progress")]
    SubmissionInProgress,

    #[error("no submission is in progress")]
    NotSubmitting,
}

/// Failure reported by the external submit action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("submission failed: {0}")]
    Failed(String),
}

/// Failure of a postal-code lookup. Lookups are best-effort; the orchestrator
/// only logs these.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("postal code '{0}' does not have 8 digits")]
    InvalidPostalCode(String),

    #[error("postal lookup request failed: {0}")]
    Transport(String),

    #[error("unexpected postal lookup response: {0}")]
    Decode(#[from] serde_json::Error),
}
