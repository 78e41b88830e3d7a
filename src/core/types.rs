//! Shared types used across agent-eval modules
//!
//! Contains message structures, tool schemas, and dispatch results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::{AgentError, Result};

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Text content; assistant turns that only request tools may carry none
    pub content: Option<String>,
    /// Tool calls requested by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// The call this tool result answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// Create an assistant message that requests tool calls
    pub fn assistant_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    /// Create a tool result message
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Content as a string slice, empty when absent
    pub fn content_str(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-generated identifier, unique within one response
    pub id: String,
    /// Name of the tool to invoke
    pub name: String,
    /// Raw JSON-encoded argument object
    pub arguments: String,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parse the raw arguments into a JSON object
    pub fn parse_arguments(&self) -> Result<Map<String, Value>> {
        match serde_json::from_str::<Value>(&self.arguments)? {
            Value::Object(map) => Ok(map),
            other => Err(AgentError::validation(format!(
                "Tool arguments must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

/// Declared type of a tool parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
    String,
    Integer,
    Boolean,
    Number,
    Array,
    Object,
    /// A type name outside the recognised set
    Other(String),
}

impl ParamType {
    /// The JSON-schema name of this type
    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Number => "number",
            ParamType::Array => "array",
            ParamType::Object => "object",
            ParamType::Other(name) => name,
        }
    }

    /// Check a runtime value against this type.
    ///
    /// Returns `None` for unrecognised types.
    pub fn matches(&self, value: &Value) -> Option<bool> {
        let ok = match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Number => value.is_number(),
            ParamType::Array => value.is_array(),
            ParamType::Object => value.is_object(),
            ParamType::Other(_) => return None,
        };
        Some(ok)
    }
}

impl From<String> for ParamType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "string" => ParamType::String,
            "integer" => ParamType::Integer,
            "boolean" => ParamType::Boolean,
            "number" => ParamType::Number,
            "array" => ParamType::Array,
            "object" => ParamType::Object,
            _ => ParamType::Other(name),
        }
    }
}

impl From<ParamType> for String {
    fn from(ty: ParamType) -> Self {
        ty.as_str().to_string()
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a JSON value's type, as used in validation messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Specification of one tool parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub description: String,
}

/// Declarative contract of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, ParamSpec>,
    pub required: Vec<String>,
}

impl ToolSchema {
    /// Start a schema with no parameters
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    /// Declare an optional parameter
    pub fn param(
        mut self,
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        self.parameters.insert(
            name.into(),
            ParamSpec {
                param_type,
                description: description.into(),
            },
        );
        self
    }

    /// Declare a required parameter
    pub fn required_param(
        self,
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let mut schema = self.param(name.clone(), param_type, description);
        schema.required.push(name);
        schema
    }

    /// The JSON Schema object describing the parameters
    pub fn parameters_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|(name, spec)| {
                (
                    name.clone(),
                    serde_json::json!({
                        "type": spec.param_type.as_str(),
                        "description": spec.description,
                    }),
                )
            })
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}

/// Definition of a tool in the wire format expected by chat-completions APIs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Type of tool (always "function" for now)
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function details
    pub function: FunctionDefinition,
}

/// Function definition within a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function
    pub name: String,
    /// Description of what the function does
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: Value,
}

impl From<&ToolSchema> for ToolDefinition {
    fn from(schema: &ToolSchema) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: schema.name.clone(),
                description: schema.description.clone(),
                parameters: schema.parameters_json(),
            },
        }
    }
}

/// How a single tool dispatch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Tool ran and returned output
    Executed,
    /// Tool ran and reported an error
    Failed,
    /// Arguments were not a JSON object
    InvalidArguments,
    /// Name not present in the registry
    UnknownTool,
    /// Arguments did not match the schema
    ValidationFailed,
    /// Approval was refused
    Denied,
}

impl DispatchStatus {
    /// Whether the tool was actually invoked
    pub fn was_executed(self) -> bool {
        matches!(self, DispatchStatus::Executed | DispatchStatus::Failed)
    }
}

/// Result of dispatching one tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call this result answers
    pub tool_call_id: String,
    /// Name of the tool that was requested
    pub tool_name: String,
    /// Text fed back to the model
    pub content: String,
    /// How the dispatch ended
    pub status: DispatchStatus,
}

impl ToolResult {
    /// Create a result for a call
    pub fn new(call: &ToolCall, status: DispatchStatus, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            content: content.into(),
            status,
        }
    }

    /// Convert into the tool-role message that answers the call
    pub fn into_message(self) -> Message {
        Message::tool(self.tool_call_id, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serialization_skips_absent_fields() {
        let value = serde_json::to_value(Message::user("Hello")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "Hello"}));

        let value = serde_json::to_value(Message::tool("call_1", "done")).unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["tool_call_id"], "call_1");
    }

    #[test]
    fn test_parse_arguments() {
        let call = ToolCall::new("1", "search_web", r#"{"query": "rust"}"#);
        let args = call.parse_arguments().unwrap();
        assert_eq!(args["query"], "rust");

        let bad = ToolCall::new("2", "search_web", "invalid json {");
        assert!(matches!(bad.parse_arguments(), Err(AgentError::Json(_))));

        let not_object = ToolCall::new("3", "search_web", "[1, 2]");
        assert!(matches!(
            not_object.parse_arguments(),
            Err(AgentError::Validation(_))
        ));
    }

    #[test]
    fn test_param_type_matching() {
        assert_eq!(ParamType::Integer.matches(&json!(3)), Some(true));
        assert_eq!(ParamType::Integer.matches(&json!(3.5)), Some(false));
        assert_eq!(ParamType::Number.matches(&json!(3)), Some(true));
        assert_eq!(ParamType::Number.matches(&json!(3.5)), Some(true));
        assert_eq!(ParamType::Boolean.matches(&json!("true")), Some(false));
        assert_eq!(ParamType::from("date".to_string()).matches(&json!("x")), None);
    }

    #[test]
    fn test_schema_renders_function_definition() {
        let schema = ToolSchema::new("search_web", "Search the web")
            .required_param("query", ParamType::String, "Search query")
            .param("limit", ParamType::Integer, "Max results");
        let def = ToolDefinition::from(&schema);

        assert_eq!(def.tool_type, "function");
        assert_eq!(def.function.parameters["type"], "object");
        assert_eq!(def.function.parameters["required"], json!(["query"]));
        assert_eq!(
            def.function.parameters["properties"]["limit"]["type"],
            "integer"
        );
    }

    #[test]
    fn test_dispatch_status_execution() {
        assert!(DispatchStatus::Executed.was_executed());
        assert!(DispatchStatus::Failed.was_executed());
        assert!(!DispatchStatus::Denied.was_executed());
        assert!(!DispatchStatus::UnknownTool.was_executed());
    }
}
