//! Agent orchestrator
//!
//! Main agent that coordinates between the model, the tools, and the
//! conversation. Each [`Agent::run`] call drives one loop:
//! call the model, dispatch the tools it asks for, feed the results back,
//! and stop on a final answer, the iteration cap, or an error.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::agent::approval::{ApprovalHandler, AutoApprove, ConsoleApproval};
use crate::agent::conversation::Conversation;
use crate::agent::dispatch::dispatch_tool_call;
use crate::agent::loop_state::{RunOutcome, RunState, Termination, MAX_ITERATIONS_RESPONSE};
use crate::agent::metrics::Metrics;
use crate::agent::retry::{with_retry, RetryPolicy};
use crate::core::{AgentError, Config, Message, Result, ToolCall, ToolDefinition, ToolResult};
use crate::llm::{ChatCompletionsClient, CompletionProvider, CompletionRequest, CompletionResponse};
use crate::tools::ToolRegistry;

/// System prompt used when the configuration does not set one
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant with access to tools.

Your goal is to help users by answering questions and completing tasks. When you need additional information or capabilities beyond your knowledge, use the available tools.

Guidelines:
1. Think step by step and explain your reasoning
2. Use tools when you need current information or specific capabilities
3. Ask for clarification if the user's request is unclear
4. Provide clear, accurate, and helpful responses
5. Be honest about limitations and uncertainties

Available tools will be provided in each request. Use them wisely and only when necessary.";

/// Main agent that orchestrates the model and tools
pub struct Agent {
    /// Configuration
    config: Config,
    /// Model backend
    provider: Arc<dyn CompletionProvider>,
    /// Model name sent to the provider
    model: String,
    /// Tool registry, built once
    tools: Arc<ToolRegistry>,
    /// Gate consulted before each tool execution
    approval: Arc<dyn ApprovalHandler>,
    /// Retry policy for model calls
    retry: RetryPolicy,
    system_prompt: String,
    /// Conversation of the last run
    conversation: Conversation,
    /// Metrics of the last run; counters accumulate until reset
    metrics: Metrics,
}

impl Agent {
    /// Create an agent around an existing provider and registry.
    ///
    /// The approval gate follows `config.agent.auto_approve_tools`.
    pub fn new(
        config: Config,
        provider: Arc<dyn CompletionProvider>,
        tools: ToolRegistry,
    ) -> Result<Self> {
        if config.agent.max_iterations == 0 {
            return Err(AgentError::config("max_iterations must be at least 1"));
        }
        if config.agent.max_retries == 0 {
            return Err(AgentError::config("max_retries must be at least 1"));
        }

        let approval: Arc<dyn ApprovalHandler> = if config.agent.auto_approve_tools {
            Arc::new(AutoApprove)
        } else {
            Arc::new(ConsoleApproval::default())
        };

        let model = config
            .model
            .name
            .split_once('/')
            .map(|(_, model)| model.to_string())
            .unwrap_or_else(|| config.model.name.clone());

        let retry = RetryPolicy::new(
            config.agent.max_retries,
            Duration::from_millis(config.agent.backoff_base_ms),
        );

        let system_prompt = config
            .agent
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        info!(
            model = %config.model.name,
            provider = provider.name(),
            tools = ?tools.names(),
            auto_approve = config.agent.auto_approve_tools,
            "agent initialized"
        );

        Ok(Self {
            config,
            provider,
            model,
            tools: Arc::new(tools),
            approval,
            retry,
            system_prompt,
            conversation: Conversation::new(),
            metrics: Metrics::new(),
        })
    }

    /// Build an agent from configuration alone: resolve the provider,
    /// connect the HTTP client and register the built-in tools.
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let settings = config.provider()?;
        let client = ChatCompletionsClient::new(&settings)?;

        let tools = ToolRegistry::with_defaults(!config.agent.auto_approve_tools);
        tools.validate()?;

        let mut agent = Self::new(config, Arc::new(client), tools)?;
        agent.model = settings.model;
        Ok(agent)
    }

    /// Replace the approval gate
    pub fn with_approval(mut self, approval: Arc<dyn ApprovalHandler>) -> Self {
        self.approval = approval;
        self
    }

    /// Run the loop for one user input.
    ///
    /// Never fails: model errors end the run with an error response and
    /// bump `metrics.errors`. `max_iterations` of `None` or zero uses the
    /// configured limit.
    pub async fn run(&mut self, user_input: &str, max_iterations: Option<usize>) -> RunOutcome {
        let max_iterations = max_iterations
            .filter(|n| *n > 0)
            .unwrap_or(self.config.agent.max_iterations);

        let mut state = RunState::new(
            Conversation::start(self.system_prompt.clone(), user_input),
            Metrics::begin_run(&self.metrics),
            max_iterations,
        );

        let (termination, response) = match self.drive(&mut state).await {
            Ok(Some(answer)) => (Termination::Final, answer),
            Ok(None) => {
                warn!(max_iterations, "max iterations reached");
                (Termination::MaxIterations, MAX_ITERATIONS_RESPONSE.to_string())
            }
            Err(e) => {
                state.metrics.errors += 1;
                error!(err = %e, "agent execution failed");
                (Termination::Error, format!("I encountered an error: {}", e))
            }
        };

        let outcome = state.finish(termination, response);
        info!(
            termination = ?outcome.termination,
            tools_used = outcome.tools_used.len(),
            "{}",
            outcome.metrics.summary()
        );

        self.conversation = Conversation::from(outcome.conversation_history.clone());
        self.metrics = outcome.metrics.clone();
        outcome
    }

    /// The loop body. `Ok(None)` means the iteration cap was hit.
    async fn drive(&self, state: &mut RunState) -> Result<Option<String>> {
        let definitions = self.tools.definitions();

        while state.should_continue() {
            state.next_iteration();
            info!(
                iteration = state.iteration,
                max = state.max_iterations,
                "agent iteration"
            );

            let response = self
                .call_model(state.conversation.messages(), &definitions, &mut state.metrics)
                .await?;

            let calls: Vec<ToolCall> = response.requested_tool_calls().to_vec();
            if calls.is_empty() {
                let answer = response.final_text();
                state.conversation.add_assistant(answer.clone());
                return Ok(Some(answer));
            }

            let content = response.first_message().and_then(|m| m.content.clone());
            state.conversation.add_tool_calls(content, calls.clone());

            for call in &calls {
                let result = self.dispatch(call).await;
                if result.status.was_executed() {
                    state.metrics.tool_calls += 1;
                    state.tools_used.push(result.tool_name.clone());
                }
                state.conversation.add_tool_result(result);
            }
        }

        Ok(None)
    }

    /// Call the model with retries.
    ///
    /// Every attempt counts toward `api_calls`; reported token usage is
    /// added to `total_tokens`.
    pub async fn call_model(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        metrics: &mut Metrics,
    ) -> Result<CompletionResponse> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            tools,
            timeout: self.config.timeout(),
        };

        let mut attempts = 0;
        let result = with_retry(&self.retry, "completion", &mut attempts, move || {
            self.provider.complete(request)
        })
        .await;

        let tokens = result.as_ref().map(|r| r.total_tokens()).unwrap_or(0);
        metrics.record_model_call(attempts, tokens);

        let response = result?;
        debug!(
            attempts,
            tokens,
            tool_calls = response.requested_tool_calls().len(),
            "model responded"
        );
        Ok(response)
    }

    /// Dispatch one tool call through validation and approval
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        dispatch_tool_call(&self.tools, self.approval.as_ref(), call).await
    }

    /// Clear conversation and metrics; configuration and tools are kept
    pub fn reset_conversation(&mut self) {
        self.conversation.clear();
        self.metrics = Metrics::new();
        info!("agent conversation reset");
    }

    /// Metrics of the last run
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Conversation of the last run
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Registered tool names
    pub fn available_tools(&self) -> Vec<String> {
        self.tools.names()
    }

    /// Tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Model name sent to the provider
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Active system prompt
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}
