//! Pluggable text-generation backends
//!
//! The insight pipeline treats the model as an opaque `prompt -> text`
//! function. Everything about which server to call, and whether to call one at
//! all, lives behind the `TextGenerator` trait.
//!
//! # Architecture
//!
//! - `TextGenerator` trait: the single seam the orchestrator depends on
//! - `GeneratorClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Implementations: `OllamaGenerator`, `OpenAICompatibleGenerator`,
//!   `MockGenerator`, `DisabledGenerator`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::load(None)?;
//! let generator = GeneratorClient::from_config(&config.ai);
//! let text = generator.generate("Summarize my spending").await?;
//! ```

mod disabled;
mod mock;
mod ollama;
mod openai_compatible;

pub use disabled::{DisabledGenerator, DISABLED_RESPONSE};
pub use mock::{MockGenerator, DEFAULT_MOCK_RESPONSE};
pub use ollama::OllamaGenerator;
pub use openai_compatible::OpenAICompatibleGenerator;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{AiConfig, BackendKind};
use crate::error::Result;

/// A text-generation collaborator
///
/// Implementations may fail (unreachable server, timeout, bad status) and may
/// return any text at all; callers must treat the output as untrusted.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the raw generated text
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Model name (for logging and status output)
    fn model(&self) -> &str;

    /// Host URL (for logging and status output)
    fn host(&self) -> &str;

    /// False only for the stand-in used when AI is switched off
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Concrete generator enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum GeneratorClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaGenerator),
    /// OpenAI-compatible backend (vLLM, LocalAI, llama-server, Docker Model Runner)
    OpenAICompatible(OpenAICompatibleGenerator),
    /// Canned responses, no network
    Mock(MockGenerator),
    /// AI insights switched off
    Disabled(DisabledGenerator),
}

impl GeneratorClient {
    /// Build the generator described by the `[ai]` configuration
    ///
    /// Disabled configs, and HTTP backends without a host, yield the disabled
    /// generator.
    pub fn from_config(config: &AiConfig) -> Self {
        if !config.enabled {
            debug!("AI insights disabled by configuration");
            return Self::disabled();
        }

        let timeout = config.timeout();
        match config.backend {
            BackendKind::Mock => Self::Mock(MockGenerator::new()),
            BackendKind::Ollama | BackendKind::OpenAICompatible => {
                let Some(host) = config.host.as_deref() else {
                    warn!(
                        backend = %config.backend,
                        "No AI host configured, insights will be disabled"
                    );
                    return Self::disabled();
                };

                if config.backend == BackendKind::Ollama {
                    Self::Ollama(OllamaGenerator::new(host, &config.model).with_timeout(timeout))
                } else {
                    Self::OpenAICompatible(
                        OpenAICompatibleGenerator::new(host, &config.model)
                            .with_api_key(config.api_key.as_deref())
                            .with_timeout(timeout),
                    )
                }
            }
        }
    }

    /// Create an Ollama generator directly
    pub fn ollama(host: &str, model: &str) -> Self {
        Self::Ollama(OllamaGenerator::new(host, model))
    }

    /// Create a mock generator returning `response`
    pub fn mock(response: &str) -> Self {
        Self::Mock(MockGenerator::with_response(response))
    }

    pub fn disabled() -> Self {
        Self::Disabled(DisabledGenerator)
    }

    /// Backend name for status output
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Ollama(_) => BackendKind::Ollama.as_str(),
            Self::OpenAICompatible(_) => BackendKind::OpenAICompatible.as_str(),
            Self::Mock(_) => BackendKind::Mock.as_str(),
            Self::Disabled(_) => "disabled",
        }
    }
}

// Implement TextGenerator for GeneratorClient by delegating to the inner backend
#[async_trait]
impl TextGenerator for GeneratorClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            Self::Ollama(g) => g.generate(prompt).await,
            Self::OpenAICompatible(g) => g.generate(prompt).await,
            Self::Mock(g) => g.generate(prompt).await,
            Self::Disabled(g) => g.generate(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            Self::Ollama(g) => g.health_check().await,
            Self::OpenAICompatible(g) => g.health_check().await,
            Self::Mock(g) => g.health_check().await,
            Self::Disabled(g) => g.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            Self::Ollama(g) => g.model(),
            Self::OpenAICompatible(g) => g.model(),
            Self::Mock(g) => g.model(),
            Self::Disabled(g) => g.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            Self::Ollama(g) => g.host(),
            Self::OpenAICompatible(g) => g.host(),
            Self::Mock(g) => g.host(),
            Self::Disabled(g) => g.host(),
        }
    }

    fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled(_))
    }
}
