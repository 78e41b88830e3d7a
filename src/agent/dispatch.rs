//! Tool dispatch
//!
//! Turns one model-requested [`ToolCall`] into a [`ToolResult`]. Every failure
//! mode (bad JSON, unknown tool, bad arguments, denial, execution error)
//! becomes result content the model can read; dispatch itself never fails.

use tracing::{error, info, warn};

use crate::agent::approval::ApprovalHandler;
use crate::core::{AgentError, DispatchStatus, ToolCall, ToolResult};
use crate::tools::ToolRegistry;

/// Content of a result whose call was refused
pub const CANCELLED_BY_USER: &str = "Tool execution cancelled by user";

fn error_content(err: &AgentError) -> String {
    match err {
        AgentError::ToolExecution(_) => err.to_string(),
        other => format!("Tool execution error: {}", other),
    }
}

/// Dispatch a single call. Calls are handled one at a time by the loop.
pub async fn dispatch_tool_call(
    tools: &ToolRegistry,
    approval: &dyn ApprovalHandler,
    call: &ToolCall,
) -> ToolResult {
    let args = match call.parse_arguments() {
        Ok(args) => args,
        Err(e) => {
            warn!(tool = %call.name, err = %e, "invalid tool arguments");
            return ToolResult::new(call, DispatchStatus::InvalidArguments, error_content(&e));
        }
    };

    let Some(tool) = tools.get(&call.name) else {
        warn!(tool = %call.name, "unknown tool requested");
        return ToolResult::new(
            call,
            DispatchStatus::UnknownTool,
            format!(
                "Error: Tool '{}' not found. Available tools: {:?}",
                call.name,
                tools.names()
            ),
        );
    };

    if let Err(e) = tool.validate_parameters(&args) {
        warn!(tool = %call.name, err = %e, "tool arguments rejected");
        return ToolResult::new(call, DispatchStatus::ValidationFailed, error_content(&e));
    }

    if !approval.approve(&call.name, &args).await {
        info!(tool = %call.name, "tool call denied");
        return ToolResult::new(call, DispatchStatus::Denied, CANCELLED_BY_USER);
    }

    info!(tool = %call.name, args = %call.arguments, "executing tool");
    match tool.execute(&args).await {
        Ok(output) => ToolResult::new(call, DispatchStatus::Executed, output),
        Err(e) => {
            error!(tool = %call.name, err = %e, "tool execution failed");
            ToolResult::new(call, DispatchStatus::Failed, error_content(&e))
        }
    }
}
