use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::paragraph::{Paragraph, Role};
use crate::model::passage::Passage;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("passage has not been analyzed")]
    NotAnalyzed,

    #[error("paragraph index {index} out of range (passage has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("active index {index} exceeds paragraph count {len}")]
    InvalidActiveIndex { index: usize, len: usize },
}

//
// ─── USER INPUT ────────────────────────────────────────────────────────────────
//

/// What the learner entered for one paragraph.
///
/// At most one record exists per `paragraph_index`; later writes merge into
/// the existing record instead of appending a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub paragraph_index: usize,
    pub user_summary: String,
    pub role_selected: Role,
    pub pivots: Vec<String>,
    pub is_validated: bool,
    #[serde(default)]
    pub is_revealed: bool,
}

/// Position of a paragraph relative to the unlock frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphState {
    Locked,
    Active,
    Completed,
}

/// Aggregated view of unlock progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Unlock-progression state for one selected passage.
///
/// The active index only moves forward, one paragraph at a time, and never
/// exceeds the paragraph count. Paragraphs below the active index are
/// exactly those with a validated input on record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    current_passage: Passage,
    active_paragraph_index: usize,
    completion_status: Vec<UserInput>,
}

impl Session {
    /// Starts a session on an analyzed passage; progression begins at zero.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAnalyzed` if the passage has no paragraph
    /// breakdown yet.
    pub fn new(passage: Passage) -> Result<Self, SessionError> {
        if !passage.is_analyzed() {
            return Err(SessionError::NotAnalyzed);
        }
        Ok(Self {
            current_passage: passage,
            active_paragraph_index: 0,
            completion_status: Vec::new(),
        })
    }

    /// Rehydrates a session from its persisted parts.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAnalyzed` for a passage without paragraphs,
    /// or `SessionError::InvalidActiveIndex` when the index exceeds the
    /// paragraph count.
    pub fn from_parts(
        passage: Passage,
        active_paragraph_index: usize,
        completion_status: Vec<UserInput>,
    ) -> Result<Self, SessionError> {
        let Some(paragraphs) = passage.paragraphs.as_ref() else {
            return Err(SessionError::NotAnalyzed);
        };
        let len = paragraphs.len();
        if active_paragraph_index > len {
            return Err(SessionError::InvalidActiveIndex {
                index: active_paragraph_index,
                len,
            });
        }
        Ok(Self {
            current_passage: passage,
            active_paragraph_index,
            completion_status,
        })
    }

    // Accessors
    #[must_use]
    pub fn passage(&self) -> &Passage {
        &self.current_passage
    }

    #[must_use]
    pub fn active_paragraph_index(&self) -> usize {
        self.active_paragraph_index
    }

    #[must_use]
    pub fn completion_status(&self) -> &[UserInput] {
        &self.completion_status
    }

    fn paragraphs(&self) -> &[Paragraph] {
        self.current_passage.paragraphs.as_deref().unwrap_or(&[])
    }

    /// Number of paragraphs in the analyzed passage.
    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().len()
    }

    /// The expert breakdown for one paragraph.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` for an index past the end.
    pub fn expert_paragraph(&self, index: usize) -> Result<&Paragraph, SessionError> {
        self.paragraphs()
            .get(index)
            .ok_or(SessionError::IndexOutOfRange {
                index,
                len: self.paragraph_count(),
            })
    }

    /// State of a paragraph relative to the unlock frontier.
    #[must_use]
    pub fn paragraph_state(&self, index: usize) -> ParagraphState {
        if index < self.active_paragraph_index {
            ParagraphState::Completed
        } else if index == self.active_paragraph_index {
            ParagraphState::Active
        } else {
            ParagraphState::Locked
        }
    }

    /// True once every paragraph has been validated or revealed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.active_paragraph_index >= self.paragraph_count()
    }

    /// The learner's input for one paragraph, if any was recorded.
    #[must_use]
    pub fn input_for(&self, index: usize) -> Option<&UserInput> {
        self.completion_status
            .iter()
            .find(|input| input.paragraph_index == index)
    }

    /// Returns a summary of the current unlock progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.paragraph_count();
        let completed = self.active_paragraph_index.min(total);
        SessionProgress {
            total,
            completed,
            remaining: total - completed,
            is_complete: self.is_complete(),
        }
    }

    /// Records a validated answer at `index` and unlocks the next paragraph.
    ///
    /// Callers are expected to only submit for the active index; the state
    /// machine itself does not enforce that ordering.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` for an index past the end.
    pub fn record_validated(
        &mut self,
        index: usize,
        user_summary: String,
        role_selected: Role,
        pivots: Vec<String>,
    ) -> Result<(), SessionError> {
        self.expert_paragraph(index)?;
        self.upsert(UserInput {
            paragraph_index: index,
            user_summary,
            role_selected,
            pivots,
            is_validated: true,
            is_revealed: false,
        });
        self.unlock_next();
        Ok(())
    }

    /// Records the expert answer at `index` as validated and revealed.
    ///
    /// Always succeeds for an in-range index and advances the frontier on
    /// every call; repeated reveals are intentionally not idempotent.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` for an index past the end.
    pub fn record_revealed(&mut self, index: usize) -> Result<(), SessionError> {
        let expert = self.expert_paragraph(index)?.clone();
        self.upsert(UserInput {
            paragraph_index: index,
            user_summary: expert.summary,
            role_selected: expert.role,
            pivots: expert.pivots,
            is_validated: true,
            is_revealed: true,
        });
        self.unlock_next();
        Ok(())
    }

    fn upsert(&mut self, input: UserInput) {
        if let Some(existing) = self
            .completion_status
            .iter_mut()
            .find(|s| s.paragraph_index == input.paragraph_index)
        {
            existing.user_summary = input.user_summary;
            existing.role_selected = input.role_selected;
            existing.pivots = input.pivots;
            existing.is_validated = input.is_validated;
            // A reveal is never un-revealed by a later submit.
            existing.is_revealed = existing.is_revealed || input.is_revealed;
        } else {
            self.completion_status.push(input);
        }
    }

    fn unlock_next(&mut self) {
        if self.active_paragraph_index < self.paragraph_count() {
            self.active_paragraph_index += 1;
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::PassageId;
    use crate::model::passage::Difficulty;

    fn build_paragraph(n: usize) -> Paragraph {
        Paragraph {
            text: format!("Paragraph {n} text."),
            role: Role::Context,
            summary: format!("Expert summary {n}."),
            pivots: vec!["However".to_owned()],
        }
    }

    fn build_session(count: usize) -> Session {
        let paragraphs = (0..count).map(build_paragraph).collect();
        let passage = Passage::new(PassageId::new("p1"), "Title", Difficulty::Medium, "text")
            .with_paragraphs(paragraphs);
        Session::new(passage).unwrap()
    }

    #[test]
    fn new_rejects_unanalyzed_passage() {
        let passage = Passage::new(PassageId::new("p1"), "Title", Difficulty::Easy, "text");
        let err = Session::new(passage).unwrap_err();
        assert_eq!(err, SessionError::NotAnalyzed);
    }

    #[test]
    fn three_submissions_complete_the_session() {
        let mut session = build_session(3);
        assert_eq!(session.active_paragraph_index(), 0);

        for index in 0..3 {
            session
                .record_validated(
                    index,
                    format!("My summary for paragraph {index}."),
                    Role::Context,
                    Vec::new(),
                )
                .unwrap();
            assert_eq!(session.active_paragraph_index(), index + 1);
        }

        assert!(session.is_complete());
        assert_eq!(session.completion_status().len(), 3);
        for input in session.completion_status() {
            assert!(input.is_validated);
            assert!(!input.is_revealed);
        }
    }

    #[test]
    fn reveal_records_expert_answer_and_advances() {
        let mut session = build_session(2);
        session.record_revealed(0).unwrap();

        let input = session.input_for(0).unwrap();
        assert!(input.is_validated);
        assert!(input.is_revealed);
        assert_eq!(input.user_summary, "Expert summary 0.");
        assert_eq!(input.role_selected, Role::Context);
        assert_eq!(input.pivots, vec!["However".to_owned()]);
        assert_eq!(session.active_paragraph_index(), 1);
    }

    #[test]
    fn repeated_reveal_advances_again_but_stays_capped() {
        let mut session = build_session(2);
        session.record_revealed(0).unwrap();
        session.record_revealed(0).unwrap();
        // Second reveal of the same index still advances the frontier.
        assert_eq!(session.active_paragraph_index(), 2);
        assert!(session.is_complete());

        session.record_revealed(0).unwrap();
        assert_eq!(session.active_paragraph_index(), 2);
        // Uniqueness: still a single record for index 0.
        assert_eq!(session.completion_status().len(), 1);
    }

    #[test]
    fn submit_after_reveal_keeps_reveal_flag() {
        let mut session = build_session(2);
        session.record_revealed(0).unwrap();
        session
            .record_validated(0, "My own words now.".to_owned(), Role::Background, Vec::new())
            .unwrap();

        let input = session.input_for(0).unwrap();
        assert!(input.is_revealed);
        assert_eq!(input.user_summary, "My own words now.");
        assert_eq!(input.role_selected, Role::Background);
        assert_eq!(session.completion_status().len(), 1);
    }

    #[test]
    fn paragraph_states_follow_the_frontier() {
        let mut session = build_session(3);
        session
            .record_validated(0, "First done.".to_owned(), Role::Context, Vec::new())
            .unwrap();

        assert_eq!(session.paragraph_state(0), ParagraphState::Completed);
        assert_eq!(session.paragraph_state(1), ParagraphState::Active);
        assert_eq!(session.paragraph_state(2), ParagraphState::Locked);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut session = build_session(2);
        let err = session
            .record_validated(5, "Too far.".to_owned(), Role::Context, Vec::new())
            .unwrap_err();
        assert_eq!(err, SessionError::IndexOutOfRange { index: 5, len: 2 });

        let err = session.record_revealed(2).unwrap_err();
        assert_eq!(err, SessionError::IndexOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn progress_tracks_completion() {
        let mut session = build_session(2);
        assert_eq!(
            session.progress(),
            SessionProgress {
                total: 2,
                completed: 0,
                remaining: 2,
                is_complete: false
            }
        );

        session.record_revealed(0).unwrap();
        session.record_revealed(1).unwrap();
        assert_eq!(
            session.progress(),
            SessionProgress {
                total: 2,
                completed: 2,
                remaining: 0,
                is_complete: true
            }
        );
    }

    #[test]
    fn empty_breakdown_is_immediately_complete() {
        let passage = Passage::new(PassageId::new("p1"), "Title", Difficulty::Hard, "")
            .with_paragraphs(Vec::new());
        let session = Session::new(passage).unwrap();
        assert!(session.is_complete());
        assert_eq!(session.paragraph_count(), 0);
    }

    #[test]
    fn from_parts_validates_active_index() {
        let paragraphs = vec![build_paragraph(0), build_paragraph(1)];
        let passage = Passage::new(PassageId::new("p1"), "Title", Difficulty::Medium, "text")
            .with_paragraphs(paragraphs);

        let session = Session::from_parts(passage.clone(), 2, Vec::new()).unwrap();
        assert!(session.is_complete());

        let err = Session::from_parts(passage, 3, Vec::new()).unwrap_err();
        assert_eq!(err, SessionError::InvalidActiveIndex { index: 3, len: 2 });
    }

    #[test]
    fn session_round_trips_through_json() {
        let mut session = build_session(2);
        session
            .record_validated(0, "A validated summary.".to_owned(), Role::Context, Vec::new())
            .unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }
}
