//! Ask-user tool
//!
//! Lets the model ask the human for clarification.

use async_trait::async_trait;

use crate::core::{AgentError, Console, ParamType, Result, ToolSchema};
use crate::tools::{string_arg, Tool, ToolArgs};

/// Reply used when nobody is at the terminal
pub const EVALUATION_MODE_REPLY: &str = "User feedback not available in evaluation mode";

/// Tool for asking the user a question
#[derive(Debug, Clone)]
pub struct AskUserTool {
    /// `None` in evaluation mode
    console: Option<Console>,
}

impl AskUserTool {
    /// Create the tool; a non-interactive tool never touches stdin
    pub fn new(interactive: bool) -> Self {
        Self {
            console: interactive.then(Console::stdin),
        }
    }

    /// Create an interactive tool reading answers from `console`
    pub fn with_console(console: Console) -> Self {
        Self {
            console: Some(console),
        }
    }

    async fn prompt(console: &Console, question: &str) -> std::io::Result<String> {
        let text = format!("\n🤔 Agent Question: {}\nYour answer: ", question);
        let reply = match console.prompt(&text).await? {
            None => "User interaction cancelled".to_string(),
            Some(line) if line.trim().is_empty() => "No response provided".to_string(),
            Some(line) => line.trim().to_string(),
        };
        Ok(reply)
    }
}

#[async_trait]
impl Tool for AskUserTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "ask_user",
            "Ask the user for clarification or additional information when the request is unclear",
        )
        .required_param(
            "question",
            ParamType::String,
            "A clear, specific question to ask the user",
        )
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let question = string_arg(args, "question")?;

        let Some(console) = &self.console else {
            return Ok(EVALUATION_MODE_REPLY.to_string());
        };

        Self::prompt(console, question)
            .await
            .map_err(|e| AgentError::tool(format!("Error asking user: {}", e)))
    }
}
