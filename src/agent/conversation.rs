//! Conversation history for a single run
//!
//! Append-only message log owned by the agent loop.

use serde::{Deserialize, Serialize};

use crate::core::{AgentError, Message, Result, Role, ToolCall, ToolResult};

/// Ordered message log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run: system prompt followed by the user's input
    pub fn start(system_prompt: impl Into<String>, user_input: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(user_input)],
        }
    }

    /// Add a final assistant message
    pub fn add_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Record the assistant turn that requested tools
    pub fn add_tool_calls(&mut self, content: Option<String>, calls: Vec<ToolCall>) {
        self.messages
            .push(Message::assistant_tool_calls(content, calls));
    }

    /// Append the tool-role message answering a call
    pub fn add_tool_result(&mut self, result: ToolResult) {
        self.messages.push(result.into_message());
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Consume into the message list
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Get message count
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Check that every tool message answers a call of the assistant turn
    /// directly before its group of tool messages
    pub fn check_tool_links(&self) -> Result<()> {
        let mut open_calls: Option<&[ToolCall]> = None;

        for (index, message) in self.messages.iter().enumerate() {
            match message.role {
                Role::Assistant => {
                    open_calls = message.tool_calls.as_deref();
                }
                Role::Tool => {
                    let id = message.tool_call_id.as_deref().unwrap_or("");
                    let linked = open_calls
                        .map(|calls| calls.iter().any(|c| c.id == id))
                        .unwrap_or(false);
                    if !linked {
                        return Err(AgentError::Other(format!(
                            "Tool message {} answers unknown call '{}'",
                            index, id
                        )));
                    }
                }
                Role::System | Role::User => open_calls = None,
            }
        }

        Ok(())
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}
