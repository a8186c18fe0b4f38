//! HTTP-level tests for the LLM client against a mock upstream

use std::time::Duration;

use grocerymate_ai::{AiError, LlmClient, LlmProvider, RecipeAssistant, RetryPolicy};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gemini_client(server: &MockServer, models: &[&str]) -> LlmClient {
    LlmClient::new(LlmProvider::Gemini {
        api_key: "test-key".to_string(),
        models: models.iter().map(|m| m.to_string()).collect(),
        base_url: server.uri(),
    })
    .with_retry(RetryPolicy::new(3, Duration::from_millis(5)))
}

fn gemini_text(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn test_gemini_ask() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-a:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("  Boil it.  ")))
        .expect(1)
        .mount(&server)
        .await;

    let client = gemini_client(&server, &["gemini-a"]);
    let answer = client.ask("How do I cook an egg?").await.unwrap();
    assert_eq!(answer, "Boil it.");
}

#[tokio::test]
async fn test_gemini_retries_unavailable_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-a:generateContent"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-a:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("ok")))
        .mount(&server)
        .await;

    let client = gemini_client(&server, &["gemini-a"]);
    assert_eq!(client.ask("anything").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_gemini_falls_back_to_next_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-a:generateContent"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-b:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("from b")))
        .expect(1)
        .mount(&server)
        .await;

    let client = gemini_client(&server, &["gemini-a", "gemini-b"]);
    assert_eq!(client.ask("anything").await.unwrap(), "from b");
}

#[tokio::test]
async fn test_gemini_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-a:generateContent"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let client = gemini_client(&server, &["gemini-a", "gemini-b"]);
    let err = client.ask("anything").await.unwrap_err();
    assert!(matches!(err, AiError::Status { status: 400, .. }));
}

#[tokio::test]
async fn test_gemini_exhausted_returns_last_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = gemini_client(&server, &["gemini-a"]);
    let err = client.ask("anything").await.unwrap_err();
    assert!(matches!(err, AiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_suggest_recipe_retries_unparseable_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-a:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("not json")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    let recipe = json!({
        "title": "Chicken Salad",
        "instructions": "Grill the chicken, chop the lettuce, combine.",
        "servings": 2,
        "required_ingredients": [
            {"name": "Chicken Breast", "quantity": 0.5, "unit": "kg"},
            {"name": "Lettuce", "quantity": 1, "unit": "pcs"}
        ]
    });
    Mock::given(method("POST"))
        .and(path("/models/gemini-a:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text(&recipe.to_string())))
        .mount(&server)
        .await;

    let client = gemini_client(&server, &["gemini-a"]);
    let generated = client.suggest_recipe(&[]).await.unwrap();
    assert_eq!(generated.title, "Chicken Salad");
    assert_eq!(generated.required_ingredients.len(), 2);
}

#[tokio::test]
async fn test_empty_candidates_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .expect(3)
        .mount(&server)
        .await;

    let client = gemini_client(&server, &["gemini-a"]);
    let err = client.ask("anything").await.unwrap_err();
    assert!(matches!(err, AiError::EmptyResponse("Gemini")));
}

#[tokio::test]
async fn test_openai_compatible_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [ { "message": { "role": "assistant", "content": "Use a pan." } } ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LlmClient::new(LlmProvider::OpenAI {
        api_key: "o-key".to_string(),
        model: "gpt-4o".to_string(),
        base_url: server.uri(),
    })
    .with_retry(RetryPolicy::new(3, Duration::from_millis(5)));

    let answer = client.recipe_for_ingredients("eggs,butter").await.unwrap();
    assert_eq!(answer, "Use a pan.");
}
