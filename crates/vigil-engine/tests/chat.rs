//! Chat sessions through the facade.

mod common;

use common::{FakeOracle, FakeRenderer, Mode, test_config, vigil_with};
use pretty_assertions::assert_eq;
use vigil_core::entities::ChatMessage;
use vigil_core::enums::ChatRole;
use vigil_core::responses::ChatHistory;
use vigil_engine::EngineError;
use vigil_oracle::CHAT_APOLOGY;

const PAGE: &str = "https://shop.example.com/";

async fn analyzed_vigil(oracle: std::sync::Arc<FakeOracle>) -> vigil_engine::Vigil {
    vigil_with(
        &test_config(),
        FakeRenderer::page(
            "shop.example.com",
            &[
                "https://www.googletagmanager.com/gtag/js",
                "https://js.stripe.com/v3/",
            ],
        ),
        Some(oracle),
    )
    .await
}

#[tokio::test]
async fn chat_is_grounded_in_the_session_snapshot() {
    let oracle = FakeOracle::replying("Google Tag Manager loads analytics tags.");
    let vigil = analyzed_vigil(oracle.clone()).await;
    let analysis = vigil.analyze(PAGE).await.unwrap();

    let init = vigil
        .init_chat_session("s-1", Some(analysis.clone()))
        .await
        .unwrap();
    assert!(init.success);

    let reply = vigil
        .chat("What does the tag manager do?", "s-1", None)
        .await
        .unwrap();
    assert_eq!(reply.reply, "Google Tag Manager loads analytics tags.");

    let requests = oracle.requests.lock().unwrap();
    let prompt = &requests[0].system_prompt;
    assert!(prompt.contains(PAGE));
    assert!(prompt.contains("Google Tag Manager"));
    assert!(prompt.contains("Stripe"));
    drop(requests);

    let history = vigil.get_history("s-1").await.unwrap();
    assert_eq!(history.analysis_data, Some(analysis));
    let roles: Vec<ChatRole> = history.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, [ChatRole::User, ChatRole::Assistant]);
    assert_eq!(history.messages[0].content, "What does the tag manager do?");
}

#[tokio::test]
async fn explicit_context_overrides_snapshot() {
    let oracle = FakeOracle::replying("ok");
    let vigil = analyzed_vigil(oracle.clone()).await;
    let analysis = vigil.analyze(PAGE).await.unwrap();
    vigil.init_chat_session("s-1", None).await.unwrap();

    vigil.chat("anything?", "s-1", Some(analysis)).await.unwrap();
    let prompt = oracle.requests.lock().unwrap()[0].system_prompt.clone();
    assert!(prompt.contains(PAGE));
}

#[tokio::test]
async fn prior_turns_are_forwarded() {
    let oracle = FakeOracle::replying("answer");
    let vigil = analyzed_vigil(oracle.clone()).await;
    vigil.init_chat_session("s-1", None).await.unwrap();

    vigil.chat("first", "s-1", None).await.unwrap();
    vigil.chat("second", "s-1", None).await.unwrap();

    let requests = oracle.requests.lock().unwrap();
    let turns: Vec<&str> = requests[1]
        .messages
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(turns, ["first", "answer", "second"]);
}

#[tokio::test]
async fn unknown_session_is_hard_for_chat_soft_for_history() {
    let oracle = FakeOracle::replying("never");
    let vigil = analyzed_vigil(oracle.clone()).await;

    let err = vigil.chat("hello?", "ghost", None).await.unwrap_err();
    assert!(matches!(err, EngineError::SessionNotFound { .. }));

    let err = vigil
        .append_message("ghost", ChatMessage::user("hello?"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SessionNotFound { .. }));

    let history = vigil.get_history("ghost").await.unwrap();
    assert_eq!(history, ChatHistory::default());
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn oracle_failure_yields_apology_and_still_records_turn() {
    let oracle = FakeOracle::new(Mode::Fail);
    let vigil = analyzed_vigil(oracle).await;
    vigil.init_chat_session("s-1", None).await.unwrap();

    let reply = vigil.chat("hi", "s-1", None).await.unwrap();
    assert_eq!(reply.reply, CHAT_APOLOGY);
    assert_eq!(vigil.get_history("s-1").await.unwrap().messages.len(), 2);
}

#[tokio::test]
async fn chat_without_oracle_apologizes() {
    let vigil = vigil_with(
        &test_config(),
        FakeRenderer::page("shop.example.com", &[]),
        None,
    )
    .await;
    vigil.init_chat_session("s-1", None).await.unwrap();
    let reply = vigil.chat("hi", "s-1", None).await.unwrap();
    assert_eq!(reply.reply, CHAT_APOLOGY);
}

#[tokio::test]
async fn empty_inputs_are_validation_errors() {
    let vigil = analyzed_vigil(FakeOracle::replying("x")).await;
    vigil.init_chat_session("s-1", None).await.unwrap();
    assert!(matches!(
        vigil.chat("   ", "s-1", None).await,
        Err(EngineError::Validation(_))
    ));
    assert!(matches!(
        vigil.init_chat_session("", None).await,
        Err(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn reinit_resets_history() {
    let vigil = analyzed_vigil(FakeOracle::replying("x")).await;
    vigil.init_chat_session("s-1", None).await.unwrap();
    vigil.chat("hi", "s-1", None).await.unwrap();
    vigil.init_chat_session("s-1", None).await.unwrap();
    assert!(vigil.get_history("s-1").await.unwrap().messages.is_empty());
}
