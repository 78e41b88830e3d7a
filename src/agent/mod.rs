//! Agent module - the agent loop and its state
//!
//! Contains the loop that coordinates model calls and tool execution, plus
//! the conversation, metrics, retry and approval pieces it is built from.

pub mod approval;
pub mod conversation;
pub mod dispatch;
pub mod loop_state;
pub mod metrics;
pub mod orchestrator;
pub mod retry;

pub use approval::{ApprovalHandler, AutoApprove, ConsoleApproval};
pub use conversation::Conversation;
pub use dispatch::dispatch_tool_call;
pub use loop_state::{RunOutcome, RunState, Termination, MAX_ITERATIONS_RESPONSE};
pub use metrics::Metrics;
pub use orchestrator::{Agent, DEFAULT_SYSTEM_PROMPT};
pub use retry::{with_retry, RetryPolicy};
