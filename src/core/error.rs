//! Custom error types for agent-eval
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for agent-eval operations
#[derive(Error, Debug)]
pub enum AgentError {
    /// Invalid or missing setup (model identifier, credentials, endpoint)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The model API kept failing until the retry budget was spent
    #[error("LLM call failed after {attempts} attempts: {source}")]
    ModelApi {
        attempts: u32,
        #[source]
        source: Box<AgentError>,
    },

    /// A single failed completion attempt
    #[error("Provider error: {0}")]
    Provider(String),

    /// Tool execution errors
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Tool parameter validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for agent-eval operations
pub type Result<T> = std::result::Result<T, AgentError>;

impl AgentError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a tool execution error
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Wrap the last failure of an exhausted retry loop
    pub fn model_api(attempts: u32, last: AgentError) -> Self {
        Self::ModelApi {
            attempts,
            source: Box::new(last),
        }
    }
}
