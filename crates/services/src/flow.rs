//! Session flow orchestration.
//!
//! Ties the gateways and the session store together: selecting a passage
//! analyzes it and persists a fresh session, submitting an attempt judges it
//! and persists progress only when the verdict passes, revealing records the
//! expert answer and always advances.

use std::sync::Arc;

use storage::repository::SessionStore;
use trainer_core::model::{Passage, Role, Session};

use crate::analysis::AnalysisService;
use crate::error::SessionFlowError;
use crate::evaluation::{EvaluationOutcome, EvaluationRequest, EvaluationService};

/// Result of judging one submitted attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub outcome: EvaluationOutcome,
    pub is_complete: bool,
}

/// Drives a learner's session from passage selection to completion.
#[derive(Clone)]
pub struct SessionFlowService {
    analysis: AnalysisService,
    evaluation: EvaluationService,
    store: Arc<dyn SessionStore>,
}

impl SessionFlowService {
    #[must_use]
    pub fn new(
        analysis: AnalysisService,
        evaluation: EvaluationService,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self { analysis, evaluation, store }
    }

    /// Loads the persisted session, if any.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn restore(&self) -> Result<Option<Session>, SessionFlowError> {
        Ok(self.store.load().await?)
    }

    /// Analyzes a passage and starts a fresh session on it.
    ///
    /// Nothing is persisted when analysis fails, so a previously saved
    /// session survives a failed selection.
    ///
    /// # Errors
    ///
    /// Propagates analysis and store failures.
    pub async fn select_passage(&self, passage: &Passage) -> Result<Session, SessionFlowError> {
        let paragraphs = self.analysis.analyze(&passage.full_text).await?;
        let session = Session::new(passage.clone().with_paragraphs(paragraphs))?;
        self.store.save(&session).await?;
        Ok(session)
    }

    /// Judges one attempt; on a passing verdict the session advances and is
    /// persisted.
    ///
    /// # Errors
    ///
    /// Fails when the index is out of range or the store rejects the write.
    /// A failing verdict is not an error.
    pub async fn submit_answer(
        &self,
        session: &mut Session,
        index: usize,
        summary: String,
        role: Role,
        pivots: Vec<String>,
    ) -> Result<SubmitOutcome, SessionFlowError> {
        let expert = session.expert_paragraph(index)?.clone();
        let request = EvaluationRequest {
            user_summary: summary.clone(),
            expert_summary: expert.summary,
            role_selected: role.clone(),
            expert_role: expert.role,
        };

        let outcome = self.evaluation.evaluate(&request).await;
        if outcome.is_valid {
            session.record_validated(index, summary, role, pivots)?;
            self.store.save(session).await?;
        }

        Ok(SubmitOutcome { outcome, is_complete: session.is_complete() })
    }

    /// Records the expert answer for a paragraph and advances the session.
    ///
    /// # Errors
    ///
    /// Fails when the index is out of range or the store rejects the write.
    pub async fn reveal_answer(
        &self,
        session: &mut Session,
        index: usize,
    ) -> Result<(), SessionFlowError> {
        session.record_revealed(index)?;
        self.store.save(session).await?;
        Ok(())
    }

    /// Discards any persisted session.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn reset(&self) -> Result<(), SessionFlowError> {
        Ok(self.store.clear().await?)
    }
}
