//! Layered configuration
//!
//! Resolution order, later layers winning:
//! 1. Embedded defaults (`config/cashflow.toml`, compiled into the binary)
//! 2. One override file: an explicit path, else `$CASHFLOW_CONFIG`, else
//!    `~/.local/share/cashflow/config.toml` when it exists
//! 3. Environment variables
//!
//! Environment variables:
//! - `AI_INSIGHTS_ENABLED`: true/false
//! - `AI_BACKEND`: ollama, openai_compatible, mock
//! - `OLLAMA_HOST` / `OLLAMA_MODEL`: used when the backend is ollama
//! - `OPENAI_COMPATIBLE_HOST` / `OPENAI_COMPATIBLE_MODEL` /
//!   `OPENAI_COMPATIBLE_API_KEY`: used when the backend is openai_compatible
//! - `AI_TIMEOUT_SECS`: generation timeout in seconds

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/cashflow.toml");

/// Environment variable naming an override file
pub const CONFIG_ENV_VAR: &str = "CASHFLOW_CONFIG";

const DEFAULT_MODEL: &str = "llama3.2";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which text-generation backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Ollama,
    OpenAICompatible,
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAICompatible => "openai_compatible",
            Self::Mock => "mock",
        }
    }

    /// Resolve a backend name; unknown names fall back to ollama
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "ollama" => Self::Ollama,
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                Self::OpenAICompatible
            }
            "mock" => Self::Mock,
            _ => {
                warn!(backend = %name, "Unknown AI backend, falling back to ollama");
                Self::Ollama
            }
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `[ai]` section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiConfig {
    /// When false, every request gets the fixed "disabled" text
    pub enabled: bool,
    pub backend: BackendKind,
    /// Base URL of the model server; required by the HTTP backends
    pub host: Option<String>,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: BackendKind::Ollama,
            host: None,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS; empty means same-origin only
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            allowed_origins: Vec::new(),
        }
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    pub ai: AiConfig,
    pub server: ServerSettings,
}

impl Config {
    /// Load all layers using the process environment
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit_path, |key| std::env::var(key).ok())
    }

    /// Load all layers with a custom environment lookup
    pub fn load_with<F>(explicit_path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::embedded()?;

        if let Some(path) = override_path(explicit_path, &env)? {
            debug!(path = %path.display(), "Applying config override");
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            config.apply_toml(&content)?;
        }

        config.apply_env(&env);
        config.validate()?;
        Ok(config)
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        let mut config = Self::default();
        config.apply_toml(DEFAULT_CONFIG)?;
        Ok(config)
    }

    /// Overlay values present in a TOML document
    pub fn apply_toml(&mut self, content: &str) -> Result<()> {
        let raw: RawConfig = toml::from_str(content)?;

        if let Some(ai) = raw.ai {
            if let Some(enabled) = ai.enabled {
                self.ai.enabled = enabled;
            }
            if let Some(backend) = ai.backend {
                self.ai.backend = BackendKind::from_name(&backend);
            }
            if let Some(host) = ai.host {
                self.ai.host = non_blank(host);
            }
            if let Some(model) = ai.model {
                self.ai.model = model;
            }
            if let Some(api_key) = ai.api_key {
                self.ai.api_key = non_blank(api_key);
            }
            if let Some(timeout) = ai.timeout_secs {
                self.ai.timeout_secs = timeout;
            }
        }

        if let Some(server) = raw.server {
            if let Some(host) = server.host {
                self.server.host = host;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(origins) = server.allowed_origins {
                self.server.allowed_origins = origins;
            }
        }

        Ok(())
    }

    /// Overlay environment variables
    ///
    /// Host, model and key variables are read for the selected backend only.
    /// Unparseable values are ignored with a warning.
    pub fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env("AI_INSIGHTS_ENABLED") {
            match parse_bool(&value) {
                Some(enabled) => self.ai.enabled = enabled,
                None => warn!(value = %value, "Ignoring invalid AI_INSIGHTS_ENABLED"),
            }
        }

        if let Some(backend) = env("AI_BACKEND") {
            self.ai.backend = BackendKind::from_name(&backend);
        }

        let backend_vars = match self.ai.backend {
            BackendKind::Ollama => Some(("OLLAMA_HOST", "OLLAMA_MODEL", None)),
            BackendKind::OpenAICompatible => Some((
                "OPENAI_COMPATIBLE_HOST",
                "OPENAI_COMPATIBLE_MODEL",
                Some("OPENAI_COMPATIBLE_API_KEY"),
            )),
            BackendKind::Mock => None,
        };

        if let Some((host_var, model_var, key_var)) = backend_vars {
            if let Some(host) = env(host_var).and_then(non_blank) {
                self.ai.host = Some(host);
            }
            if let Some(model) = env(model_var).and_then(non_blank) {
                self.ai.model = model;
            }
            if let Some(key) = key_var.and_then(|var| env(var)).and_then(non_blank) {
                self.ai.api_key = Some(key);
            }
        }

        if let Some(value) = env("AI_TIMEOUT_SECS") {
            match value.trim().parse::<u64>() {
                Ok(secs) => self.ai.timeout_secs = secs,
                Err(_) => warn!(value = %value, "Ignoring invalid AI_TIMEOUT_SECS"),
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.ai.timeout_secs == 0 {
            return Err(Error::Config("ai.timeout_secs must be greater than 0".into()));
        }
        if self.ai.model.trim().is_empty() {
            return Err(Error::Config("ai.model must not be empty".into()));
        }
        Ok(())
    }
}

/// Default location of the override file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("cashflow").join("config.toml"))
}

/// Pick the override file, if any
///
/// An explicitly named file (argument or `$CASHFLOW_CONFIG`) must exist; the
/// default location is only used when present.
fn override_path<F>(explicit_path: Option<&Path>, env: &F) -> Result<Option<PathBuf>>
where
    F: Fn(&str) -> Option<String>,
{
    let named = explicit_path
        .map(Path::to_path_buf)
        .or_else(|| env(CONFIG_ENV_VAR).and_then(non_blank).map(PathBuf::from));

    if let Some(path) = named {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path));
    }

    Ok(default_config_path().filter(|p| p.exists()))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    ai: Option<RawAi>,
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
struct RawAi {
    enabled: Option<bool>,
    backend: Option<String>,
    host: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_embedded_defaults() {
        let config = Config::embedded().unwrap();
        assert!(config.ai.enabled);
        assert_eq!(config.ai.backend, BackendKind::Ollama);
        assert_eq!(config.ai.host, None);
        assert_eq!(config.ai.model, "llama3.2");
        assert_eq!(config.ai.timeout_secs, 30);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_partial_override_keeps_other_values() {
        let mut config = Config::embedded().unwrap();
        config
            .apply_toml("[ai]\nmodel = \"gemma3\"\n\n[server]\nport = 8080\n")
            .unwrap();
        assert_eq!(config.ai.model, "gemma3");
        assert_eq!(config.ai.timeout_secs, 30);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let mut config = Config::default();
        let err = config.apply_toml("[ai\nmodel=").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_env_overrides_for_selected_backend() {
        let env = env_from(&[
            ("AI_BACKEND", "openai_compatible"),
            ("OLLAMA_HOST", "http://ollama:11434"),
            ("OPENAI_COMPATIBLE_HOST", "http://vllm:8000"),
            ("OPENAI_COMPATIBLE_MODEL", "qwen"),
            ("OPENAI_COMPATIBLE_API_KEY", "secret"),
            ("AI_TIMEOUT_SECS", "5"),
        ]);
        let mut config = Config::embedded().unwrap();
        config.apply_env(env);

        assert_eq!(config.ai.backend, BackendKind::OpenAICompatible);
        assert_eq!(config.ai.host.as_deref(), Some("http://vllm:8000"));
        assert_eq!(config.ai.model, "qwen");
        assert_eq!(config.ai.api_key.as_deref(), Some("secret"));
        assert_eq!(config.ai.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_env_disable_and_bad_values_ignored() {
        let env = env_from(&[("AI_INSIGHTS_ENABLED", "false"), ("AI_TIMEOUT_SECS", "soon")]);
        let mut config = Config::embedded().unwrap();
        config.apply_env(env);
        assert!(!config.ai.enabled);
        assert_eq!(config.ai.timeout_secs, 30);
    }

    #[test]
    fn test_unknown_backend_falls_back_to_ollama() {
        assert_eq!(BackendKind::from_name("gemini"), BackendKind::Ollama);
        assert_eq!(BackendKind::from_name("VLLM"), BackendKind::OpenAICompatible);
        assert_eq!(BackendKind::from_name(" mock "), BackendKind::Mock);
    }

    #[test]
    fn test_load_with_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ai]\nhost = \"http://file:11434\"\ntimeout_secs = 12").unwrap();

        let env = env_from(&[("OLLAMA_MODEL", "mistral")]);
        let config = Config::load_with(Some(file.path()), env).unwrap();
        assert_eq!(config.ai.host.as_deref(), Some("http://file:11434"));
        assert_eq!(config.ai.model, "mistral");
        assert_eq!(config.ai.timeout_secs, 12);
    }

    #[test]
    fn test_load_with_env_named_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nallowed_origins = [\"http://localhost:5173\"]").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let env = env_from(&[(CONFIG_ENV_VAR, path.as_str())]);
        let config = Config::load_with(None, env).unwrap();
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Config::load_with(Some(Path::new("/nonexistent/cashflow.toml")), env_from(&[]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ai]\ntimeout_secs = 0").unwrap();
        let err = Config::load_with(Some(file.path()), env_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
