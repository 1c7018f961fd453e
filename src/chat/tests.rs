use super::*;
use crate::config::GroqConfig;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

fn test_client(server: &MockServer) -> GroqClient {
    let config = GroqConfig {
        api_base: server.uri(),
        timeout_seconds: 5,
        ..GroqConfig::default()
    };
    GroqClient::new(&config, "gsk_test")
        .expect("client should build")
        .with_retry_attempts(1)
}

#[test]
fn transcript_starts_with_welcome() {
    let transcript = Transcript::new();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.turns()[0].role, ChatRole::Assistant);
    assert_eq!(transcript.turns()[0].content, WELCOME_MESSAGE);
}

#[test]
fn transcript_appends_in_order() {
    let mut transcript = Transcript::new();
    transcript.push_user("Who built the pyramids?");
    transcript.push_assistant("The ancient Egyptians.");
    transcript.push_user("When?");

    let roles: Vec<ChatRole> = transcript.turns().iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        [
            ChatRole::Assistant,
            ChatRole::User,
            ChatRole::Assistant,
            ChatRole::User
        ]
    );
}

#[test]
fn clear_resets_to_welcome() {
    let mut transcript = Transcript::new();
    transcript.push_user("question");
    transcript.push_assistant("answer");
    transcript.clear();

    assert_eq!(transcript, Transcript::new());
}

#[test]
fn suggested_topics_are_nonempty() {
    let topics = suggested_topics();
    assert!(!topics.is_empty());
    assert!(topics.iter().all(|topic| !topic.trim().is_empty()));
}

#[tokio::test]
async fn ask_records_both_turns() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "system" },
                { "role": "user", "content": "Who was Hammurabi?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "A Babylonian king." },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut assistant = HistoryAssistant::new(test_client(&server));
    let answer = assistant.ask("Who was Hammurabi?").to_string();

    assert_eq!(answer, "A Babylonian king.");
    let turns = assistant.transcript().turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1].role, ChatRole::User);
    assert_eq!(turns[2].content, "A Babylonian king.");
}

#[tokio::test]
async fn llm_failure_becomes_apology_turn() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut assistant = HistoryAssistant::new(test_client(&server));
    let answer = assistant.ask("Anything?").to_string();

    assert!(answer.starts_with("I apologize, but I encountered an error"));
    assert_eq!(assistant.transcript().len(), 3);
}
