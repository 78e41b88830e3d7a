//! Approval gating for tool execution
//!
//! The loop asks an [`ApprovalHandler`] before running any tool unless the
//! agent was built with auto-approval.

use async_trait::async_trait;
use tracing::debug;

use crate::core::Console;
use crate::tools::ToolArgs;

/// Decides whether a requested tool call may run
#[async_trait]
pub trait ApprovalHandler: Send + Sync {
    /// Return `true` to let the tool run
    async fn approve(&self, tool_name: &str, args: &ToolArgs) -> bool;
}

/// Approves every call
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl ApprovalHandler for AutoApprove {
    async fn approve(&self, _tool_name: &str, _args: &ToolArgs) -> bool {
        true
    }
}

/// Asks the person at the terminal
#[derive(Debug, Clone)]
pub struct ConsoleApproval {
    console: Console,
}

/// Only an explicit yes approves
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl ConsoleApproval {
    /// Prompt through `console`
    pub fn new(console: Console) -> Self {
        Self { console }
    }

    async fn ask(&self, tool_name: &str, args: &ToolArgs) -> std::io::Result<bool> {
        let pretty = serde_json::to_string_pretty(args).unwrap_or_else(|_| format!("{:?}", args));
        let prompt = format!(
            "\n🔧 Agent wants to use tool: {}\nArguments: {}\nApprove? [y/N]: ",
            tool_name, pretty
        );

        let answer = self.console.prompt(&prompt).await?;
        Ok(answer.as_deref().is_some_and(is_affirmative))
    }
}

impl Default for ConsoleApproval {
    fn default() -> Self {
        Self::new(Console::stdin())
    }
}

#[async_trait]
impl ApprovalHandler for ConsoleApproval {
    async fn approve(&self, tool_name: &str, args: &ToolArgs) -> bool {
        match self.ask(tool_name, args).await {
            Ok(approved) => approved,
            Err(e) => {
                debug!(tool = tool_name, err = %e, "approval prompt failed, denying");
                false
            }
        }
    }
}
