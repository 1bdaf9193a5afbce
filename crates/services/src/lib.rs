#![forbid(unsafe_code)]

pub mod analysis;
pub mod catalog;
pub mod envelope;
pub mod error;
pub mod evaluation;
pub mod flow;

pub use analysis::{AnalysisConfig, AnalysisService};
pub use catalog::CatalogService;
pub use envelope::EnvelopeError;
pub use error::{AnalysisError, CatalogError, EvaluationError, SessionFlowError};
pub use evaluation::{EvaluationConfig, EvaluationOutcome, EvaluationRequest, EvaluationService};
pub use flow::{SessionFlowService, SubmitOutcome};
