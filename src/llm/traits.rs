//! Completion provider trait for abstracting different backends
//!
//! The agent loop only needs one capability from a model backend: given the
//! conversation and the tool schemas, return a response with choices.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{Message, Result, ToolCall, ToolDefinition};

/// Everything a provider needs for one completion call
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// Model name as understood by the provider
    pub model: &'a str,
    /// Full conversation, oldest first
    pub messages: &'a [Message],
    /// Tools the model may call
    pub tools: &'a [ToolDefinition],
    /// Upper bound on the call
    pub timeout: Duration,
}

/// Response from a completion provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Candidate messages; the loop only reads the first
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token usage information
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// One candidate in a completion response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ResponseMessage,
}

/// Message carried by a choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl CompletionResponse {
    /// A response that ends the loop with `content`
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: Some(content.into()),
                    tool_calls: None,
                },
            }],
            usage: None,
        }
    }

    /// A response requesting tool calls
    pub fn tool_calls(content: Option<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            choices: vec![Choice {
                message: ResponseMessage {
                    content,
                    tool_calls: Some(calls),
                },
            }],
            usage: None,
        }
    }

    /// Attach a total token count
    pub fn with_total_tokens(mut self, total_tokens: u64) -> Self {
        self.usage = Some(TokenUsage {
            total_tokens,
            ..Default::default()
        });
        self
    }

    /// The first choice's message, if any
    pub fn first_message(&self) -> Option<&ResponseMessage> {
        self.choices.first().map(|c| &c.message)
    }

    /// Tool calls of the first choice; empty when there are none
    pub fn requested_tool_calls(&self) -> &[ToolCall] {
        self.first_message()
            .and_then(|m| m.tool_calls.as_deref())
            .unwrap_or(&[])
    }

    /// Text of the first choice; empty when absent
    pub fn final_text(&self) -> String {
        self.first_message()
            .and_then(|m| m.content.clone())
            .unwrap_or_default()
    }

    /// Total tokens reported, zero when usage is missing
    pub fn total_tokens(&self) -> u64 {
        self.usage.map(|u| u.total_tokens).unwrap_or(0)
    }
}

/// Trait for model-completion providers
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion call. Network, auth and rate-limit failures are
    /// all reported as errors; retrying is the caller's business.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<CompletionResponse>;

    /// Get the provider name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_choices_is_empty_final() {
        let response = CompletionResponse::default();
        assert!(response.requested_tool_calls().is_empty());
        assert_eq!(response.final_text(), "");
        assert_eq!(response.total_tokens(), 0);
    }

    #[test]
    fn test_tool_call_accessors() {
        let response = CompletionResponse::tool_calls(
            None,
            vec![ToolCall::new("c1", "search_web", r#"{"query":"x"}"#)],
        )
        .with_total_tokens(12);

        assert_eq!(response.requested_tool_calls().len(), 1);
        assert_eq!(response.final_text(), "");
        assert_eq!(response.total_tokens(), 12);
    }

    #[test]
    fn test_null_tool_calls_means_final() {
        let response: CompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"content": "4", "tool_calls": null}}]
        }))
        .unwrap();
        assert!(response.requested_tool_calls().is_empty());
        assert_eq!(response.final_text(), "4");
    }
}
