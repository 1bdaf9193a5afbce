//! Answer evaluation gateway.
//!
//! Mirrors the analysis gateway's shape: an optional external endpoint read
//! from `TRAINER_EVALUATE_URL`, with a deterministic local judgment when it
//! is absent. Unlike analysis, evaluation never surfaces an error to the
//! caller; a failed forward degrades to a fixed "try again" judgment so the
//! learner always gets a verdict.

use serde::{Deserialize, Serialize};

use trainer_core::model::Role;

use crate::envelope::unwrap_envelope;
use crate::error::EvaluationError;

/// Minimum summary length, in characters, for the local judgment to pass.
pub const SUMMARY_LENGTH_FLOOR: usize = 20;

/// Hint returned when the external endpoint could not produce a verdict.
pub const FAILED_RESULT_HINT: &str = "Analysis failed to return result";

/// Hint returned by the local judgment on a failed attempt.
pub const CORRECTIVE_HINT: &str =
    "Try to capture more detail and ensure you identify the correct functional role.";

//
// ─── WIRE TYPES ─────────────────────────────────────────────────────────────
//

/// Material an attempt is judged against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub user_summary: String,
    pub expert_summary: String,
    pub role_selected: Role,
    pub expert_role: Role,
}

/// Verdict on a single attempt.
///
/// Decoding is lenient: a response missing either field reads as a failed
/// verdict with an empty hint rather than a decode error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub hint: String,
}

impl EvaluationOutcome {
    #[must_use]
    pub fn passed() -> Self {
        Self { is_valid: true, hint: String::new() }
    }

    #[must_use]
    pub fn failed(hint: impl Into<String>) -> Self {
        Self { is_valid: false, hint: hint.into() }
    }
}

//
// ─── CONFIG ─────────────────────────────────────────────────────────────────
//

/// Endpoint configuration for the external evaluation service.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    url: String,
}

impl EvaluationConfig {
    /// Reads the endpoint URL from `TRAINER_EVALUATE_URL`, if set and
    /// non-empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("TRAINER_EVALUATE_URL").ok()?;
        let url = url.trim().to_owned();
        if url.is_empty() { None } else { Some(Self { url }) }
    }

    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

//
// ─── SERVICE ────────────────────────────────────────────────────────────────
//

/// Judges a learner's summary and role selection for one paragraph.
#[derive(Debug, Clone)]
pub struct EvaluationService {
    client: reqwest::Client,
    config: Option<EvaluationConfig>,
}

impl EvaluationService {
    #[must_use]
    pub fn new(config: Option<EvaluationConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(EvaluationConfig::from_env())
    }

    /// Whether an external endpoint is configured.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Produces a verdict for one attempt. Infallible by contract: forward
    /// failures are logged and collapse to [`FAILED_RESULT_HINT`].
    pub async fn evaluate(&self, request: &EvaluationRequest) -> EvaluationOutcome {
        let Some(config) = &self.config else {
            return fallback_judgment(request);
        };

        match self.forward(config, request).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(%error, "evaluation endpoint failed, returning fixed verdict");
                EvaluationOutcome::failed(FAILED_RESULT_HINT)
            }
        }
    }

    async fn forward(
        &self,
        config: &EvaluationConfig,
        request: &EvaluationRequest,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        let response = self.client.post(config.url()).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EvaluationError::HttpStatus(status));
        }

        let raw: serde_json::Value = response.json().await?;
        let data = unwrap_envelope(raw)?;
        Ok(serde_json::from_value(data)?)
    }
}

/// Local judgment: the summary must exceed [`SUMMARY_LENGTH_FLOOR`]
/// characters and the selected role must match the expert's.
#[must_use]
pub fn fallback_judgment(request: &EvaluationRequest) -> EvaluationOutcome {
    let long_enough = request.user_summary.chars().count() > SUMMARY_LENGTH_FLOOR;
    if long_enough && request.role_selected == request.expert_role {
        EvaluationOutcome::passed()
    } else {
        EvaluationOutcome::failed(CORRECTIVE_HINT)
    }
}
