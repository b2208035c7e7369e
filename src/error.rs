//! Error types for Mortgage Assist.

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Finance error: {0}")]
    Finance(#[from] FinanceError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Dialog error: {0}")]
    Dialog(#[from] DialogError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Financial-model errors.
#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    #[error("Invalid amortization input: {reason}")]
    InvalidInput { reason: String },
}

/// Customer directory errors.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Customer not found: {customer_id}")]
    NotFound { customer_id: String },
}

/// Dialog engine errors.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    /// A dialog id was not present in the registry. Registry validation at
    /// startup is meant to keep this out of runtime entirely.
    #[error("Unknown dialog: {dialog_id}")]
    UnknownDialog { dialog_id: String },

    /// A waterfall step failed. The turn is aborted and the previously
    /// persisted stack remains authoritative, so the inbound event can be
    /// safely retried.
    #[error("Step {step_index} of dialog {dialog_id} failed: {source}")]
    Step {
        dialog_id: String,
        step_index: usize,
        #[source]
        source: StepError,
    },
}

/// Failures inside a waterfall step.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Finance error: {0}")]
    Finance(#[from] FinanceError),

    #[error("Missing frame value: {key}")]
    MissingValue { key: String },

    #[error("Frame value {key} has unexpected shape: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Step expected {expected} input")]
    UnexpectedInput { expected: &'static str },
}

/// Session persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to serialize dialog stack: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to deserialize dialog stack: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("Session store failure: {0}")]
    Store(String),
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
