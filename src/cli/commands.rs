//! CLI commands
//!
//! Special commands that can be executed in the REPL.

use crate::agent::Agent;

/// Result of parsing a command
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue processing as normal input
    Continue(String),
    /// Command was handled, show output
    Handled(String),
    /// Exit the REPL
    Exit,
    /// Conversation and metrics were reset
    Reset,
    /// No output needed
    None,
}

/// Parse and handle special commands
pub fn handle_command(input: &str, agent: &mut Agent) -> CommandResult {
    let input = input.trim();
    if input.is_empty() {
        return CommandResult::None;
    }

    let cmd = input.to_lowercase();
    match cmd.as_str() {
        "exit" | "quit" | "q" => CommandResult::Exit,

        "reset" | "clear" => {
            agent.reset_conversation();
            CommandResult::Reset
        }

        "help" | "?" => CommandResult::Handled(help_text()),

        "tools" => CommandResult::Handled(tools_text(agent)),

        "metrics" => CommandResult::Handled(metrics_text(agent)),

        _ => {
            if input.starts_with('/') {
                CommandResult::Handled(format!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    cmd
                ))
            } else {
                CommandResult::Continue(input.to_string())
            }
        }
    }
}

fn tools_text(agent: &Agent) -> String {
    let mut output = String::from("Available tools:");
    for schema in agent.tools().schemas() {
        output.push_str(&format!("\n  • {}: {}", schema.name, schema.description));
    }
    output
}

fn metrics_text(agent: &Agent) -> String {
    let m = agent.metrics();
    format!(
        "Agent Metrics:\n\
         ─────────────────────────────\n\
         Iterations:   {}\n\
         API calls:    {}\n\
         Tool calls:   {}\n\
         Total tokens: {}\n\
         Errors:       {}\n\
         History:      {} messages",
        m.iterations,
        m.api_calls,
        m.tool_calls,
        m.total_tokens,
        m.errors,
        agent.conversation().len()
    )
}

/// Generate help text
fn help_text() -> String {
    r#"Agent Commands:
─────────────────────────────────────────────
  help, ?          Show this help message
  exit, quit, q    Exit the session
  reset, clear     Clear conversation history and metrics
  tools            List available tools
  metrics          Show metrics of the last run

Anything else is sent to the agent.
─────────────────────────────────────────────"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, Result};
    use crate::llm::{CompletionProvider, CompletionRequest, CompletionResponse};
    use crate::tools::ToolRegistry;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Idle;

    #[async_trait]
    impl CompletionProvider for Idle {
        async fn complete(&self, _request: CompletionRequest<'_>) -> Result<CompletionResponse> {
            Ok(CompletionResponse::text(""))
        }

        fn name(&self) -> &str {
            "idle"
        }
    }

    fn agent() -> Agent {
        Agent::new(
            Config::default(),
            Arc::new(Idle),
            ToolRegistry::with_defaults(false),
        )
        .unwrap()
    }

    #[test]
    fn test_commands() {
        let mut agent = agent();
        assert_eq!(handle_command("EXIT", &mut agent), CommandResult::Exit);
        assert_eq!(handle_command("reset", &mut agent), CommandResult::Reset);
        assert_eq!(handle_command("   ", &mut agent), CommandResult::None);
        assert_eq!(
            handle_command("What is 2+2?", &mut agent),
            CommandResult::Continue("What is 2+2?".to_string())
        );
    }

    #[test]
    fn test_tools_listing() {
        let mut agent = agent();
        match handle_command("tools", &mut agent) {
            CommandResult::Handled(text) => {
                assert!(text.contains("ask_user"));
                assert!(text.contains("search_web"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
