//! Test utilities for cashflow-core
//!
//! Provides a mock LLM server speaking both the Ollama and the
//! OpenAI-compatible protocols, for backend tests and development.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::oneshot;

use crate::ai::DEFAULT_MOCK_RESPONSE;

#[derive(Clone)]
struct ServerState {
    response: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

/// Mock LLM server for testing and development
pub struct MockLlmServer {
    addr: SocketAddr,
    prompts: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start the mock server returning [`DEFAULT_MOCK_RESPONSE`]
    pub async fn start() -> Self {
        Self::spawn(Some(DEFAULT_MOCK_RESPONSE.to_string())).await
    }

    /// Start the mock server returning `response` for every generation
    pub async fn start_with_response(response: &str) -> Self {
        Self::spawn(Some(response.to_string())).await
    }

    /// Start a server that answers every generation with HTTP 500
    pub async fn start_failing() -> Self {
        Self::spawn(None).await
    }

    async fn spawn(response: Option<String>) -> Self {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            response,
            prompts: prompts.clone(),
        };

        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            prompts,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl ServerState {
    fn record(&self, prompt: String) {
        self.prompts.lock().unwrap().push(prompt);
    }
}

fn failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "model failed to load"})),
    )
        .into_response()
}

/// Ollama tags endpoint (health check)
async fn handle_tags() -> Json<serde_json::Value> {
    Json(json!({
        "models": [{"name": "llama3.2:latest", "size": 4_000_000_000u64}]
    }))
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}

/// Ollama generate endpoint
async fn handle_generate(
    State(state): State<ServerState>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    state.record(request.prompt);
    match state.response {
        Some(response) => Json(GenerateResponse {
            model: request.model,
            response,
            done: true,
        })
        .into_response(),
        None => failure(),
    }
}

/// OpenAI models endpoint (health check)
async fn handle_models() -> Json<serde_json::Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "llama3.2", "object": "model"}]
    }))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// OpenAI chat completions endpoint
async fn handle_chat(State(state): State<ServerState>, Json(request): Json<ChatRequest>) -> Response {
    let prompt = request
        .messages
        .into_iter()
        .last()
        .map(|m| m.content)
        .unwrap_or_default();
    state.record(prompt);

    match state.response {
        Some(content) => Json(json!({
            "object": "chat.completion",
            "model": request.model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        None => failure(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{OllamaGenerator, OpenAICompatibleGenerator, TextGenerator};

    #[tokio::test]
    async fn test_mock_server_serves_both_protocols() {
        let server = MockLlmServer::start().await;

        let ollama = OllamaGenerator::new(&server.url(), "test-model");
        let openai = OpenAICompatibleGenerator::new(&server.url(), "test-model");

        assert_eq!(ollama.generate("one").await.unwrap(), DEFAULT_MOCK_RESPONSE);
        assert_eq!(openai.generate("two").await.unwrap(), DEFAULT_MOCK_RESPONSE);
        assert_eq!(server.prompts(), vec!["one", "two"]);
    }
}
