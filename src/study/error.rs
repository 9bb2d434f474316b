//! Study error types

use thiserror::Error;

use super::models::{Score, TermId};

/// Errors raised by the study engine and its file store
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Score {score} has an invalid reset interval (nreset = {nreset})")]
    InvalidResetInterval { score: Score, nreset: u32 },

    #[error("No queue for score {0}")]
    MissingQueue(Score),

    #[error("Term {0} has no example sources")]
    MalformedTerm(TermId),

    #[error("Term not found: {0}")]
    TermNotFound(TermId),

    #[error("Quit initiated. Nothing saved.")]
    UserAbort,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StudyError {
    /// Whether the error stems from the set's configuration rather than IO or the user
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            StudyError::Configuration(_)
                | StudyError::InvalidResetInterval { .. }
                | StudyError::MissingQueue(_)
                | StudyError::MalformedTerm(_)
        )
    }
}

/// Result type alias for study operations
pub type Result<T> = std::result::Result<T, StudyError>;
