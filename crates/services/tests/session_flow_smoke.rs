//! End-to-end flow over the local gateways and an in-memory store.

use std::sync::Arc;

use services::analysis::AnalysisService;
use services::evaluation::{CORRECTIVE_HINT, EvaluationService};
use services::flow::SessionFlowService;
use storage::repository::{InMemorySessionStore, SessionStore};
use trainer_core::model::{Difficulty, Passage, PassageId, Role};

const PASSAGE_TEXT: &str = "Coral reefs anchor coastal food webs and buffer shorelines.\n\n\
However, nineteenth-century naturalists believed reefs grew without limit.\n\n\
Yet modern surveys show bleaching events now outpace recovery in many basins.";

fn build_flow() -> (SessionFlowService, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::default());
    let flow = SessionFlowService::new(
        AnalysisService::new(None),
        EvaluationService::new(None),
        store.clone(),
    );
    (flow, store)
}

fn reef_passage() -> Passage {
    Passage::new(
        PassageId::new("reefs-1"),
        "Coral Reefs",
        Difficulty::Medium,
        PASSAGE_TEXT,
    )
}

#[tokio::test]
async fn full_progression_with_local_gateways() {
    let (flow, store) = build_flow();

    let mut session = flow.select_passage(&reef_passage()).await.unwrap();
    assert_eq!(session.paragraph_count(), 3);
    assert!(store.load().await.unwrap().is_some());

    // Local analysis labels the first three segments positionally.
    let expected_roles = [Role::Context, Role::HistoricalViewpoint, Role::CounterPoint];
    for (index, expected) in expected_roles.into_iter().enumerate() {
        let result = flow
            .submit_answer(
                &mut session,
                index,
                format!("A detailed restatement of paragraph {index} in my own words."),
                expected,
                Vec::new(),
            )
            .await
            .unwrap();
        assert!(result.outcome.is_valid, "paragraph {index} should pass");
    }

    assert!(session.is_complete());
    let persisted = store.load().await.unwrap().unwrap();
    assert_eq!(persisted, session);
}

#[tokio::test]
async fn failed_attempt_returns_hint_without_advancing() {
    let (flow, store) = build_flow();
    let mut session = flow.select_passage(&reef_passage()).await.unwrap();

    let result = flow
        .submit_answer(&mut session, 0, "Too short.".to_owned(), Role::Context, Vec::new())
        .await
        .unwrap();

    assert!(!result.outcome.is_valid);
    assert_eq!(result.outcome.hint, CORRECTIVE_HINT);
    assert!(!result.is_complete);
    assert_eq!(session.active_paragraph_index(), 0);

    // The failed attempt is not persisted.
    let persisted = store.load().await.unwrap().unwrap();
    assert_eq!(persisted.active_paragraph_index(), 0);
    assert!(persisted.completion_status().is_empty());
}

#[tokio::test]
async fn reveal_advances_and_persists() {
    let (flow, store) = build_flow();
    let mut session = flow.select_passage(&reef_passage()).await.unwrap();

    flow.reveal_answer(&mut session, 0).await.unwrap();

    let input = session.input_for(0).unwrap();
    assert!(input.is_revealed);
    assert_eq!(session.active_paragraph_index(), 1);
    assert_eq!(store.load().await.unwrap().unwrap(), session);
}

#[tokio::test]
async fn reset_clears_the_store() {
    let (flow, store) = build_flow();
    flow.select_passage(&reef_passage()).await.unwrap();

    flow.reset().await.unwrap();
    assert!(store.load().await.unwrap().is_none());
    assert!(flow.restore().await.unwrap().is_none());
}
