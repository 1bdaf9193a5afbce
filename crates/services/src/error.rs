//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use trainer_core::model::{DifficultyError, SessionError};

use crate::envelope::EnvelopeError;

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("passage {id}: {source}")]
    InvalidDifficulty {
        id: String,
        #[source]
        source: DifficultyError,
    },
}

/// Errors emitted by the analysis gateway's configured mode.
///
/// The local fallback splitter never fails.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("analysis request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("analysis response has no paragraphs field")]
    MissingParagraphs,

    #[error("analysis response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised while forwarding to the evaluation endpoint.
///
/// These never reach callers of `EvaluationService::evaluate`; they are
/// logged and folded into a fixed failed judgment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvaluationError {
    #[error("evaluation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("evaluation response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors emitted by the session flow service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionFlowError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
