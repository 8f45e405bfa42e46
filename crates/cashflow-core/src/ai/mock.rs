//! Mock generator for testing
//!
//! Returns a canned response (or a canned failure) and records every prompt it
//! receives. Clones share the same recording.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::TextGenerator;

/// Response used by `MockGenerator::new()`
pub const DEFAULT_MOCK_RESPONSE: &str = "\
Expenses are concentrated in a few categories this period.
Most spending happens on weekends; plan purchases ahead.
Set a weekly budget for your largest category.";

#[derive(Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

/// Mock text generator
#[derive(Clone)]
pub struct MockGenerator {
    reply: Reply,
    healthy: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    /// Healthy mock returning [`DEFAULT_MOCK_RESPONSE`]
    pub fn new() -> Self {
        Self::with_response(DEFAULT_MOCK_RESPONSE)
    }

    pub fn with_response(response: &str) -> Self {
        Self {
            reply: Reply::Text(response.to_string()),
            healthy: true,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call fails with a generation error
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Reply::Fail(message.to_string()),
            healthy: false,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .map_err(|_| Error::Generation("Mock prompt log poisoned".into()))?
            .push(prompt.to_string());

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(message) => Err(Error::Generation(message.clone())),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_prompts_across_clones() {
        let mock = MockGenerator::with_response("ok");
        let clone = mock.clone();

        clone.generate("first").await.unwrap();
        mock.generate("second").await.unwrap();

        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.prompts(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let mock = MockGenerator::failing("quota exceeded");
        let err = mock.generate("prompt").await.unwrap_err();
        assert!(matches!(err, Error::Generation(ref m) if m == "quota exceeded"));
        assert!(!mock.health_check().await);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_default_response_has_lines() {
        let mock = MockGenerator::new();
        let text = mock.generate("prompt").await.unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(mock.health_check().await);
    }
}
