//! Test utilities for integration tests
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};

use chatbot::api::AppState;
use chatbot::api::app;
use chatbot::core::{AppConfig, MODELS};

/// Config pointing at `api_hostname`, usually a `mockito` server. No
/// API key means the app runs without a model client.
pub fn test_config(api_hostname: &str, api_key: Option<&str>) -> AppConfig {
    AppConfig {
        groq_api_key: api_key.map(String::from),
        groq_api_hostname: api_hostname.to_string(),
        models: MODELS.iter().map(|m| m.to_string()).collect(),
        page_title: String::from("Pagina para el chatbot"),
    }
}

/// Creates a test application router with its own empty set of
/// sessions.
pub async fn test_app(api_hostname: &str, api_key: Option<&str>) -> Router {
    let app_state = AppState::new(test_config(api_hostname, api_key));
    app(Arc::new(RwLock::new(app_state)))
}

/// Creates a test application router without an API key configured.
pub async fn test_app_without_key() -> Router {
    test_app("http://127.0.0.1:9", None).await
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not valid UTF-8")
}

/// A chat completion response body with a single reply.
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1694268190,
        "model": "llama-3.1-8b-instant",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}
