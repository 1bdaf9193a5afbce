use storage::repository::SessionStore;
use storage::sqlite::SqliteSessionStore;
use trainer_core::model::{Difficulty, Paragraph, Passage, PassageId, Role, Session};

fn build_session() -> Session {
    let paragraphs = vec![
        Paragraph {
            text: "Glaciers carve valleys over millennia.".into(),
            role: Role::Context,
            summary: "Introduces glacial erosion.".into(),
            pivots: Vec::new(),
        },
        Paragraph {
            text: "However, some valleys predate the ice.".into(),
            role: Role::CounterPoint,
            summary: "Counters the erosion account.".into(),
            pivots: vec!["However".into()],
        },
    ];
    let passage = Passage::new(
        PassageId::new("glaciers-1"),
        "Glacial Valleys",
        Difficulty::Medium,
        "Glaciers carve valleys over millennia.\n\nHowever, some valleys predate the ice.",
    )
    .with_paragraphs(paragraphs);
    Session::new(passage).unwrap()
}

#[tokio::test]
async fn sqlite_round_trips_session_snapshot() {
    let store = SqliteSessionStore::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    assert!(store.load().await.unwrap().is_none());

    let session = build_session();
    store.save(&session).await.unwrap();

    let loaded = store.load().await.unwrap().expect("session persisted");
    assert_eq!(loaded, session);
}

#[tokio::test]
async fn sqlite_save_replaces_previous_snapshot() {
    let store = SqliteSessionStore::connect("sqlite:file:memdb_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    let mut session = build_session();
    store.save(&session).await.unwrap();

    session
        .record_validated(
            0,
            "Glaciers slowly grind out valley floors.".to_owned(),
            Role::Context,
            Vec::new(),
        )
        .unwrap();
    store.save(&session).await.unwrap();

    let loaded = store.load().await.unwrap().expect("session persisted");
    assert_eq!(loaded.active_paragraph_index(), 1);
    assert_eq!(loaded.completion_status().len(), 1);
    assert_eq!(loaded, session);
}

#[tokio::test]
async fn sqlite_clear_removes_the_snapshot() {
    let store = SqliteSessionStore::connect("sqlite:file:memdb_clear?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    store.save(&build_session()).await.unwrap();
    store.clear().await.unwrap();
    assert!(store.load().await.unwrap().is_none());
}
