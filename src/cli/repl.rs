//! Interactive REPL
//!
//! Provides the chat loop around a single [`Agent`].

use crate::agent::Agent;
use crate::cli::commands::{handle_command, CommandResult};
use crate::core::{Config, Console, Result};

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    agent: Agent,
    /// Shared with approval prompts and `ask_user`
    console: Console,
}

impl Repl {
    /// Create a REPL around an existing agent
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            console: Console::stdin(),
        }
    }

    /// Create a REPL with custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self::new(Agent::from_config(config)?))
    }

    /// Run the REPL until `exit` or EOF
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        loop {
            let input = match self.console.prompt("You: ").await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    // EOF (Ctrl+D)
                    println!("\nGoodbye!");
                    break;
                }
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            };

            match handle_command(&input, &mut self.agent) {
                CommandResult::Exit => {
                    println!("\nGoodbye!");
                    break;
                }
                CommandResult::Reset => println!("Conversation reset.\n"),
                CommandResult::Handled(output) => println!("{}\n", output),
                CommandResult::None => {}
                CommandResult::Continue(input) => {
                    let outcome = self.agent.run(&input, None).await;
                    println!("\nAssistant:\n{}\n", outcome.response);
                    if !outcome.tools_used.is_empty() {
                        println!("Tools used: {}\n", outcome.tools_used.join(", "));
                    }
                }
            }
        }

        Ok(())
    }

    /// Print the startup banner
    fn print_banner(&self) {
        let config = self.agent.config();

        println!("\nagent-eval interactive session");
        println!("Model:          {}", config.model.name);
        println!("Max iterations: {}", config.agent.max_iterations);
        println!(
            "Approval:       {}",
            if config.agent.auto_approve_tools {
                "automatic"
            } else {
                "ask before each tool"
            }
        );
        println!("Tools:          {}", self.agent.available_tools().join(", "));
        println!();
        println!("Commands: help, tools, metrics, reset, exit");
        println!("─────────────────────────────────────────────");
    }
}
