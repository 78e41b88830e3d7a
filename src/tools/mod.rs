//! Tools module - the tool contract and its implementations
//!
//! Every tool describes itself with a [`ToolSchema`], validates the arguments
//! the model sends, and executes to a single text result.

pub mod ask_user;
pub mod registry;
pub mod search_web;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::core::{json_type_name, AgentError, Result, ToolSchema};

pub use ask_user::AskUserTool;
pub use registry::ToolRegistry;
pub use search_web::WebSearchTool;

/// Tool arguments after JSON decoding
pub type ToolArgs = Map<String, Value>;

/// A capability the model can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Describe the tool. Must be pure and return the same schema every time.
    fn schema(&self) -> ToolSchema;

    /// Check arguments against the schema.
    ///
    /// Required parameters must be present, and every argument that the
    /// schema declares must have the declared type. Undeclared arguments
    /// are allowed through.
    fn validate_parameters(&self, args: &ToolArgs) -> Result<()> {
        validate_against(&self.schema(), args)
    }

    /// Run the tool and return its text output
    async fn execute(&self, args: &ToolArgs) -> Result<String>;
}

/// Validate `args` against `schema`
pub fn validate_against(schema: &ToolSchema, args: &ToolArgs) -> Result<()> {
    for name in &schema.required {
        if !args.contains_key(name) {
            return Err(AgentError::validation(format!(
                "Missing required parameter: {}",
                name
            )));
        }
    }

    for (name, value) in args {
        let Some(spec) = schema.parameters.get(name) else {
            continue;
        };
        match spec.param_type.matches(value) {
            Some(true) => {}
            Some(false) => {
                return Err(AgentError::validation(format!(
                    "Parameter '{}' must be a {}, got {}",
                    name,
                    spec.param_type,
                    json_type_name(value)
                )))
            }
            None => {
                return Err(AgentError::validation(format!(
                    "Unsupported parameter type '{}' for parameter '{}'",
                    spec.param_type, name
                )))
            }
        }
    }

    Ok(())
}

/// Fetch a required string argument
pub(crate) fn string_arg<'a>(args: &'a ToolArgs, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AgentError::validation(format!("Missing required parameter: {}", key)))
}
