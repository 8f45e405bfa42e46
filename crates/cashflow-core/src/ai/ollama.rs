//! Ollama backend implementation
//!
//! HTTP client for the Ollama `/api/generate` endpoint (non-streaming).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::TextGenerator;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Ollama text generator
#[derive(Clone)]
pub struct OllamaGenerator {
    http_client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaGenerator {
    /// Create a new Ollama generator
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Upper bound for each request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!(model = %self.model, host = %self.base_url, "Sending prompt to Ollama");

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "Ollama API error {}: {}",
                status, body
            )));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        debug!(chars = ollama_response.response.len(), "Ollama response received");

        Ok(ollama_response.response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockLlmServer;

    #[tokio::test]
    async fn test_generate_against_mock_server() {
        let server = MockLlmServer::start_with_response("Groceries are 40% of spend").await;
        let generator = OllamaGenerator::new(&server.url(), "test-model");

        let text = generator.generate("analyze this").await.unwrap();
        assert_eq!(text, "Groceries are 40% of spend");
        assert_eq!(server.prompts(), vec!["analyze this".to_string()]);
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockLlmServer::start().await;
        let generator = OllamaGenerator::new(&server.url(), "test-model");
        assert!(generator.health_check().await);
    }

    #[tokio::test]
    async fn test_error_status_is_generation_failure() {
        let server = MockLlmServer::start_failing().await;
        let generator = OllamaGenerator::new(&server.url(), "test-model");

        let err = generator.generate("prompt").await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        assert!(err.is_generation_failure());
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let generator = OllamaGenerator::new("http://127.0.0.1:9", "test-model")
            .with_timeout(Duration::from_secs(2));
        assert!(!generator.health_check().await);
        let err = generator.generate("prompt").await.unwrap_err();
        assert!(err.is_generation_failure());
    }

    #[test]
    fn test_model_and_host() {
        let generator = OllamaGenerator::new("http://localhost:11434/", "llama3.2");
        assert_eq!(generator.model(), "llama3.2");
        assert_eq!(generator.host(), "http://localhost:11434");
    }
}
