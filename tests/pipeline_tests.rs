//! End-to-end pipeline tests against mocked provider APIs

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rad_scribe::application::ports::{GenerationError, ReportStore, TemplateStore};
use rad_scribe::application::{
    ProcessCallbacks, ProcessError, ProcessInput, ProcessTranscriptionUseCase,
};
use rad_scribe::domain::report::Template;
use rad_scribe::infrastructure::{ClaudeProvider, GeminiProvider, InMemoryStore};

const REPORT_TEXT: &str = "Normal chest radiograph.\nNo acute cardiopulmonary findings.";

fn claude_body(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn"
    })
}

fn gemini_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn claude_report_is_generated_and_stored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 1024
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(claude_body(REPORT_TEXT)))
        .expect(1)
        .mount(&server)
        .await;

    let store = InMemoryStore::new();
    store
        .insert_template(&Template::new("chest_xray", "[findings]\n[impression]"))
        .await
        .unwrap();

    let provider = ClaudeProvider::new("test-key")
        .unwrap()
        .with_base_url(server.uri());
    let use_case = ProcessTranscriptionUseCase::new(provider, store.clone(), store.clone());

    let output = use_case
        .execute(
            ProcessInput::new(
                "The lungs are clear full stop No effusion full stop",
                Some("chest_xray".to_string()),
            ),
            &ProcessCallbacks::default(),
        )
        .await
        .unwrap();

    assert_eq!(output.processed_text, REPORT_TEXT);

    let report = store.find_report(output.report_id).await.unwrap().unwrap();
    assert_eq!(report.title, "Normal chest radiograph.");
    assert_eq!(report.raw_transcription, "the lungs are clear. no effusion.");
    assert_eq!(report.template_name.as_deref(), Some("chest_xray"));
}

#[tokio::test]
async fn claude_sends_template_in_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(claude_body(REPORT_TEXT)))
        .mount(&server)
        .await;

    let store = InMemoryStore::new();
    store
        .insert_template(&Template::new("knee", "[menisci]"))
        .await
        .unwrap();

    let provider = ClaudeProvider::new("test-key")
        .unwrap()
        .with_base_url(server.uri());
    ProcessTranscriptionUseCase::new(provider, store.clone(), store)
        .execute(
            ProcessInput::new("intact menisci", Some("knee".to_string())),
            &ProcessCallbacks::default(),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let user_content = body["messages"][0]["content"].as_str().unwrap();

    assert!(user_content.contains("intact menisci"));
    assert!(user_content.contains("Use the following template structure:\n[menisci]"));
    assert!(body["system"]
        .as_str()
        .unwrap()
        .contains("expert radiologist"));
}

#[tokio::test]
async fn claude_http_error_is_upstream_and_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": { "type": "authentication_error", "message": "invalid x-api-key" }
        })))
        .mount(&server)
        .await;

    let store = InMemoryStore::new();
    let provider = ClaudeProvider::new("bad-key")
        .unwrap()
        .with_base_url(server.uri());
    let use_case = ProcessTranscriptionUseCase::new(provider, store.clone(), store.clone());

    let payload = use_case
        .handle(ProcessInput::new("text", None), &ProcessCallbacks::default())
        .await
        .unwrap_err();

    assert!(payload.error.starts_with("Error processing text: "));
    assert!(payload.error.contains("authentication_error"));
    assert!(store.recent_reports(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn claude_without_text_blocks_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [],
            "stop_reason": "max_tokens"
        })))
        .mount(&server)
        .await;

    let store = InMemoryStore::new();
    let provider = ClaudeProvider::new("test-key")
        .unwrap()
        .with_base_url(server.uri());
    let use_case = ProcessTranscriptionUseCase::new(provider, store.clone(), store.clone());

    let err = use_case
        .execute(ProcessInput::new("text", None), &ProcessCallbacks::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProcessError::Generation(GenerationError::EmptyResponse)
    ));
    assert!(store.recent_reports(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn gemini_report_is_generated_and_stored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "maxOutputTokens": 1024 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(REPORT_TEXT)))
        .expect(1)
        .mount(&server)
        .await;

    let store = InMemoryStore::new();
    let provider = GeminiProvider::new("test-key")
        .unwrap()
        .with_base_url(server.uri());
    let use_case = ProcessTranscriptionUseCase::new(provider, store.clone(), store.clone());

    let output = use_case
        .execute(
            ProcessInput::new("Heart size normal period", None),
            &ProcessCallbacks::default(),
        )
        .await
        .unwrap();

    let report = store.find_report(output.report_id).await.unwrap().unwrap();
    assert_eq!(report.processed_text, REPORT_TEXT);
    assert_eq!(report.raw_transcription, "heart size normal.");
    assert_eq!(report.template_name, None);
}

#[tokio::test]
async fn gemini_error_body_is_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let store = InMemoryStore::new();
    let provider = GeminiProvider::new("bad-key")
        .unwrap()
        .with_base_url(server.uri());
    let use_case = ProcessTranscriptionUseCase::new(provider, store.clone(), store.clone());

    let err = use_case
        .execute(ProcessInput::new("text", None), &ProcessCallbacks::default())
        .await
        .unwrap_err();

    match err {
        ProcessError::Generation(GenerationError::Upstream(message)) => {
            assert!(message.contains("API key not valid"));
            assert!(!message.contains("bad-key"));
        }
        other => panic!("Expected upstream error, got {other:?}"),
    }
    assert!(store.recent_reports(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn gemini_without_candidates_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let store = InMemoryStore::new();
    let provider = GeminiProvider::new("test-key")
        .unwrap()
        .with_base_url(server.uri());
    let use_case = ProcessTranscriptionUseCase::new(provider, store.clone(), store.clone());

    let err = use_case
        .execute(ProcessInput::new("text", None), &ProcessCallbacks::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProcessError::Generation(GenerationError::EmptyResponse)
    ));
    assert!(store.recent_reports(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_provider_is_upstream() {
    // Nothing listens on the discard port
    let provider = ClaudeProvider::new("test-key")
        .unwrap()
        .with_base_url("http://127.0.0.1:9");
    let store = InMemoryStore::new();
    let use_case = ProcessTranscriptionUseCase::new(provider, store.clone(), store.clone());

    let err = use_case
        .execute(ProcessInput::new("text", None), &ProcessCallbacks::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProcessError::Generation(GenerationError::Upstream(_))
    ));
}
