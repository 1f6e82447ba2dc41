//! Error types shared across Signlang crates.

use std::path::PathBuf;

/// Top-level error type for Signlang operations.
///
/// None of these variants are process-fatal. Each one is recoverable at the
/// session level: the caller either retries, waits, or starts a new session.
#[derive(Debug, thiserror::Error)]
pub enum SignlangError {
    /// The classifier failed to load. Disables the control surface until a
    /// retry succeeds.
    #[error("Initialization error: {message}")]
    Initialization { message: String },

    /// A control was used before the classifier finished loading.
    #[error("Not ready: {message}")]
    NotReady { message: String },

    /// An operation was invoked in a state that does not allow it.
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    /// A single inference call failed.
    #[error("Classification error: {message}")]
    Classification { message: String },

    /// Too many inference calls failed in a row; the loop was stopped.
    #[error("Classification failed {failures} times in a row (last: {last_error})")]
    ClassificationBudgetExhausted { failures: u32, last_error: String },

    #[error("Frame source error: {message}")]
    FrameSource { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SignlangError.
pub type SignlangResult<T> = Result<T, SignlangError>;

impl SignlangError {
    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::Initialization {
            message: msg.into(),
        }
    }

    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady {
            message: msg.into(),
        }
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition {
            message: msg.into(),
        }
    }

    pub fn classification(msg: impl Into<String>) -> Self {
        Self::Classification {
            message: msg.into(),
        }
    }

    pub fn frame_source(msg: impl Into<String>) -> Self {
        Self::FrameSource {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
