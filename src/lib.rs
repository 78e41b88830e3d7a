//! agent-eval - a minimal tool-using LLM agent loop
//!
//! Given a user instruction, the agent repeatedly calls a language model,
//! dispatches the tool invocations it requests, folds the results back into
//! the conversation, and stops on a final answer or the iteration cap.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Completion provider abstraction with an OpenAI-compatible client
//! - **Tools**: Tool contract, registry, and the built-in tools
//! - **Agent**: The loop, its conversation, metrics, retry, and approval gate
//! - **CLI**: Interactive REPL
//!
//! # Usage
//!
//! ```rust,no_run
//! use agent_eval::{Agent, Config};
//!
//! #[tokio::main]
//! async fn main() -> agent_eval::Result<()> {
//!     let mut agent = Agent::from_config(Config::load())?;
//!     let outcome = agent.run("What is 2+2?", None).await;
//!     println!("{}", outcome.response);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;
pub mod logging;
pub mod tools;

// Re-export commonly used items
pub use agent::{Agent, Metrics, RunOutcome, Termination};
pub use cli::Repl;
pub use core::{AgentError, Config, Result};
