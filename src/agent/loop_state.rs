//! Agent loop state management
//!
//! A fresh [`RunState`] is created for every run and threaded through the
//! loop explicitly; it becomes a [`RunOutcome`] when the run terminates.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agent::conversation::Conversation;
use crate::agent::metrics::Metrics;
use crate::core::{Message, Result};

/// Response returned when the iteration cap is hit
pub const MAX_ITERATIONS_RESPONSE: &str = "I've reached the maximum number of iterations. Please try rephrasing your request or breaking it into smaller parts.";

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The model answered without requesting tools
    Final,
    /// The iteration cap was reached
    MaxIterations,
    /// A run-level failure, such as exhausted model retries
    Error,
}

/// Mutable state of one run
#[derive(Debug, Clone)]
pub struct RunState {
    /// Current iteration (1-based once the loop has started)
    pub iteration: usize,
    /// Maximum allowed iterations
    pub max_iterations: usize,
    /// Messages exchanged so far
    pub conversation: Conversation,
    /// Counters for this run
    pub metrics: Metrics,
    /// Names of executed tools, one entry per execution
    pub tools_used: Vec<String>,
}

impl RunState {
    /// Create the state for a new run
    pub fn new(conversation: Conversation, metrics: Metrics, max_iterations: usize) -> Self {
        Self {
            iteration: 0,
            max_iterations,
            conversation,
            metrics,
            tools_used: Vec::new(),
        }
    }

    /// Check if the loop may run another iteration
    pub fn should_continue(&self) -> bool {
        self.iteration < self.max_iterations
    }

    /// Advance to the next iteration
    pub fn next_iteration(&mut self) {
        self.iteration += 1;
        self.metrics.iterations = self.iteration;
    }

    /// Stop the run and produce the outcome
    pub fn finish(mut self, termination: Termination, response: impl Into<String>) -> RunOutcome {
        self.metrics.finish();
        RunOutcome {
            response: response.into(),
            conversation_history: self.conversation.into_messages(),
            metrics: self.metrics,
            tools_used: self.tools_used,
            termination,
        }
    }
}

/// Result of one run, handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Final answer, the max-iterations notice, or the error text
    pub response: String,
    /// Every message of the run
    pub conversation_history: Vec<Message>,
    /// Metrics snapshot at termination
    pub metrics: Metrics,
    /// Executed tools in execution order
    pub tools_used: Vec<String>,
    /// Why the run stopped
    pub termination: Termination,
}

impl RunOutcome {
    /// Persist the outcome as pretty-printed JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load an outcome saved with [`RunOutcome::save_json`]
    pub fn load_json(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
