//! Chat-completions client
//!
//! Async HTTP client for OpenAI-compatible `/chat/completions` endpoints with
//! tool calling. Most hosted providers expose this wire format.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    AgentError, Message, ProviderSettings, Result, Role, ToolCall, ToolDefinition,
};
use crate::llm::traits::{
    Choice, CompletionProvider, CompletionRequest, CompletionResponse, ResponseMessage,
    TokenUsage,
};

/// Chat-completions API client
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    base_url: String,
    api_key: String,
    provider: String,
}

/// Chat request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
}

/// Message in wire format
#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: Role,
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

/// Tool call in wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default = "function_type")]
    call_type: String,
    #[serde(default)]
    function: WireFunction,
}

fn function_type() -> String {
    "function".to_string()
}

/// Function in a wire tool call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireFunction {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: String,
}

/// Chat response body; every field is optional so malformed bodies degrade
/// to an empty response instead of a parse failure
#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Default, Deserialize)]
struct WireChoice {
    #[serde(default)]
    message: Option<WireResponseMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct WireResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

impl ChatCompletionsClient {
    /// Create a client from resolved provider settings
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AgentError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            provider: settings.provider.clone(),
        })
    }

    /// Endpoint URL for chat completions
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Convert internal Message to wire format
    fn to_wire_message(msg: &Message) -> WireMessage {
        WireMessage {
            role: msg.role,
            content: msg.content.clone(),
            tool_calls: msg.tool_calls.as_ref().map(|calls| {
                calls
                    .iter()
                    .map(|tc| WireToolCall {
                        id: tc.id.clone(),
                        call_type: function_type(),
                        function: WireFunction {
                            name: tc.name.clone(),
                            arguments: tc.arguments.clone(),
                        },
                    })
                    .collect()
            }),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }

    /// Convert a wire response into a CompletionResponse
    fn to_completion_response(response: ChatResponse) -> CompletionResponse {
        let choices = response
            .choices
            .into_iter()
            .map(|choice| {
                let message = choice.message.unwrap_or_default();
                Choice {
                    message: ResponseMessage {
                        content: message.content,
                        tool_calls: message.tool_calls.map(|calls| {
                            calls
                                .into_iter()
                                .map(|tc| ToolCall {
                                    id: tc.id,
                                    name: tc.function.name,
                                    arguments: tc.function.arguments,
                                })
                                .collect()
                        }),
                    },
                }
            })
            .collect();

        CompletionResponse {
            choices,
            usage: response.usage,
        }
    }

    /// Parse a response body
    fn parse_body(body: &str) -> Result<CompletionResponse> {
        let chat_response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| AgentError::provider(format!("Failed to parse response: {}", e)))?;
        Ok(Self::to_completion_response(chat_response))
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionsClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<CompletionResponse> {
        let body = ChatRequest {
            model: request.model,
            messages: request.messages.iter().map(Self::to_wire_message).collect(),
            tools: if request.tools.is_empty() {
                None
            } else {
                Some(request.tools)
            },
        };

        debug!(
            provider = %self.provider,
            messages = body.messages.len(),
            tools = request.tools.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::provider(format!(
                        "Request to {} timed out after {:?}",
                        self.provider, request.timeout
                    ))
                } else if e.is_connect() {
                    AgentError::provider(format!("Cannot connect to {}", self.base_url))
                } else {
                    AgentError::from(e)
                }
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AgentError::provider(format!(
                "{} API error ({}): {}",
                self.provider, status, text
            )));
        }

        debug!(bytes = text.len(), "received chat completion response");
        Self::parse_body(&text)
    }

    fn name(&self) -> &str {
        &self.provider
    }
}
