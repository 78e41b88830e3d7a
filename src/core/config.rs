//! Configuration management for agent-eval
//!
//! Supports environment variables, a config file, and runtime overrides.
//!
//! Config file location: ~/.config/agent-eval/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::core::error::{AgentError, Result};

/// OpenAI-compatible chat-completions endpoints for well-known providers
const KNOWN_PROVIDERS: &[(&str, &str)] = &[
    ("openai", "https://api.openai.com/v1"),
    (
        "gemini",
        "https://generativelanguage.googleapis.com/v1beta/openai",
    ),
    ("groq", "https://api.groq.com/openai/v1"),
    ("openrouter", "https://openrouter.ai/api/v1"),
    ("mistral", "https://api.mistral.ai/v1"),
    ("deepseek", "https://api.deepseek.com/v1"),
    ("together", "https://api.together.xyz/v1"),
];

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Agent loop configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Model endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier in `provider/model` form
    /// Default: gemini/gemini-2.5-flash
    pub name: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Explicit chat-completions base URL, overriding the provider table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum loop iterations per run
    /// Default: 10
    pub max_iterations: usize,
    /// Total model-call attempts before giving up
    /// Default: 3
    pub max_retries: u32,
    /// Skip the approval prompt before each tool execution
    pub auto_approve_tools: bool,
    /// Backoff unit in milliseconds; attempt `n` waits `unit * 2^n`
    pub backoff_base_ms: u64,
    /// System prompt override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// Provider details resolved from the model identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Provider prefix, e.g. `gemini`
    pub provider: String,
    /// Model name sent on the wire, e.g. `gemini-2.5-flash`
    pub model: String,
    /// Chat-completions base URL
    pub base_url: String,
    /// Credential read from `<PROVIDER>_API_KEY`
    pub api_key: String,
    /// Name of the credential variable
    pub api_key_var: String,
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().map(|v| v.trim().eq_ignore_ascii_case("true"))
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: env::var("MODEL_NAME").unwrap_or_else(|_| "gemini/gemini-2.5-flash".to_string()),
            timeout_secs: env_parse("TIMEOUT_SECONDS").unwrap_or(30),
            api_base: env::var("MODEL_API_BASE").ok().filter(|v| !v.is_empty()),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: env_parse("MAX_ITERATIONS").unwrap_or(10),
            max_retries: env_parse("MAX_RETRIES").unwrap_or(3),
            auto_approve_tools: env_flag("AUTO_APPROVE_TOOLS").unwrap_or(false),
            backoff_base_ms: 1000,
            system_prompt: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("agent-eval")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let path = Self::config_file();
        if path.exists() {
            match Self::load_from(&path) {
                Ok(config) => return config,
                Err(e) => warn!(path = %path.display(), err = %e, "ignoring config file"),
            }
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from a specific TOML file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Err(AgentError::config("Config file not found"));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AgentError::config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| AgentError::config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    AgentError::config(format!("Failed to create config dir: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AgentError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| AgentError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Resolve the provider, endpoint and credential for the configured model
    ///
    /// Fails with a configuration error when the identifier is not in
    /// `provider/model` form, the credential is missing, or no endpoint is known.
    pub fn provider(&self) -> Result<ProviderSettings> {
        let name = self.model.name.trim();
        let (provider, model) = match name.split_once('/') {
            Some((p, m)) if !p.is_empty() && !m.is_empty() => (p, m),
            _ => {
                return Err(AgentError::config(format!(
                    "Invalid model format '{}'. Expected format: provider/model",
                    self.model.name
                )))
            }
        };

        let api_key_var = format!("{}_API_KEY", provider.to_uppercase());
        let api_key = env::var(&api_key_var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AgentError::config(format!(
                    "API key '{}' required for model '{}'. Set {} in your .env file or environment.",
                    api_key_var, self.model.name, api_key_var
                ))
            })?;

        let base_url = match &self.model.api_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => KNOWN_PROVIDERS
                .iter()
                .find(|(p, _)| p.eq_ignore_ascii_case(provider))
                .map(|(_, url)| url.to_string())
                .ok_or_else(|| {
                    AgentError::config(format!(
                        "No endpoint known for provider '{}'. Set MODEL_API_BASE or model.api_base.",
                        provider
                    ))
                })?,
        };

        Ok(ProviderSettings {
            provider: provider.to_string(),
            model: model.to_string(),
            base_url,
            api_key,
            api_key_var,
        })
    }

    /// Check that the configuration can drive an agent
    pub fn validate(&self) -> Result<()> {
        if self.agent.max_iterations == 0 {
            return Err(AgentError::config("max_iterations must be at least 1"));
        }
        if self.agent.max_retries == 0 {
            return Err(AgentError::config("max_retries must be at least 1"));
        }
        self.provider().map(|_| ())
    }

    /// Request timeout for model calls
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.model.timeout_secs)
    }

    /// Update the model identifier
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model.name = model.into();
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        toml::to_string_pretty(&Config::default())
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(model: &str) -> Config {
        let mut config = Config::default();
        config.set_model(model);
        config.model.api_base = None;
        config
    }

    #[test]
    fn test_invalid_model_format() {
        let err = config_for("no-slash-model").provider().unwrap_err();
        assert!(matches!(err, AgentError::Configuration(_)));
        assert!(err.to_string().contains("Invalid model format"));
    }

    #[test]
    fn test_missing_api_key() {
        let err = config_for("unsetprovider_xyz/some-model")
            .provider()
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("API key 'UNSETPROVIDER_XYZ_API_KEY' required"));
    }

    #[test]
    fn test_explicit_api_base_wins() {
        env::set_var("CFGTEST_OPENAI_API_KEY", "k");
        let mut config = config_for("cfgtest_openai/gpt-4o");
        config.model.api_base = Some("https://example.test/v1/".to_string());

        let settings = config.provider().unwrap();
        assert_eq!(settings.provider, "cfgtest_openai");
        assert_eq!(settings.model, "gpt-4o");
        assert_eq!(settings.base_url, "https://example.test/v1");
        assert_eq!(settings.api_key_var, "CFGTEST_OPENAI_API_KEY");
    }

    #[test]
    fn test_known_provider_table() {
        env::set_var("GROQ_API_KEY", "k");
        let settings = config_for("groq/llama-3.1-8b-instant").provider().unwrap();
        assert_eq!(settings.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(settings.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_unknown_provider_without_base() {
        env::set_var("CFGTEST_NOWHERE_API_KEY", "k");
        let err = config_for("cfgtest_nowhere/model").provider().unwrap_err();
        assert!(err.to_string().contains("No endpoint known"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut config = Config::default();
        config.agent.max_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.agent.max_iterations = 7;
        config.set_model("openai/gpt-4o-mini");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.agent.max_iterations, 7);
        assert_eq!(loaded.model.name, "openai/gpt-4o-mini");
    }

    #[test]
    fn test_default_config_toml() {
        let text = Config::default_config_toml();
        assert!(text.contains("max_iterations"));
        assert!(text.contains("timeout_secs"));

        // `validate` tells users to save this text as their config file
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, &text).unwrap();
        assert!(Config::load_from(&path).is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[agent]\nmax_iterations = 5\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.agent.max_iterations, 5);
        assert_eq!(loaded.agent.backoff_base_ms, 1000);
        assert_eq!(loaded.agent.max_retries, AgentConfig::default().max_retries);
        assert_eq!(loaded.model.name, ModelConfig::default().name);

        fs::write(&path, "[model]\nname = \"openai/gpt-4o\"\n").unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.model.name, "openai/gpt-4o");
        assert_eq!(loaded.model.timeout_secs, ModelConfig::default().timeout_secs);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[agent]\nmax_iterations = \"many\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
