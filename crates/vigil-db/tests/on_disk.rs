//! Persistence across reopen of an on-disk database.

use pretty_assertions::assert_eq;
use vigil_core::entities::{AnalysisResult, ChatMessage, ChatSession};
use vigil_db::VigilDb;

fn sample(url: &str) -> AnalysisResult {
    AnalysisResult {
        url: url.to_string(),
        total_scripts: 2,
        third_party_script_count: 0,
        scripts: vec![],
        analyses: vec![],
    }
}

#[tokio::test]
async fn log_and_sessions_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vigil.db");
    let path = path.to_str().unwrap();

    let key = {
        let db = VigilDb::open_local(path).await.unwrap();
        let key = db.store_analysis(&sample("https://a.io/")).await.unwrap();
        let mut session = ChatSession::new("s-1", Some(sample("https://a.io/")));
        session.push(ChatMessage::user("hello"));
        db.save_chat_session(&session).await.unwrap();
        key
    };

    let db = VigilDb::open_local(path).await.unwrap();
    let stored = db.get_analysis(&key).await.unwrap().unwrap();
    assert_eq!(stored.url, "https://a.io/");

    let session = db.load_chat_session("s-1").await.unwrap().unwrap();
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.analysis_data.unwrap().url, "https://a.io/");
}

#[tokio::test]
async fn concurrent_stores_never_collide() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vigil.db");
    let db = std::sync::Arc::new(VigilDb::open_local(path.to_str().unwrap()).await.unwrap());

    let mut set = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let db = db.clone();
        set.spawn(async move { db.store_analysis(&sample("https://same.io/")).await });
    }
    let mut keys = Vec::new();
    while let Some(res) = set.join_next().await {
        keys.push(res.unwrap().unwrap());
    }
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 8);
    assert_eq!(db.retrieve_analyses().await.unwrap().len(), 8);
}
