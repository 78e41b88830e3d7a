//! Tool registry - maps tool names to tool instances
//!
//! Tools are registered explicitly at startup. Lookup is exact and
//! case-sensitive; an unknown name is an ordinary dispatch outcome.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::{AgentError, Result, ToolDefinition, ToolSchema};
use crate::tools::{AskUserTool, Tool, WebSearchTool};

/// Registry of available tools
#[derive(Clone, Default)]
pub struct ToolRegistry {
    /// Tools indexed by schema name
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in tools
    ///
    /// `interactive` controls whether `ask_user` may block on stdin.
    pub fn with_defaults(interactive: bool) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AskUserTool::new(interactive)));
        registry.register(Arc::new(WebSearchTool::new()));
        registry
    }

    /// Register a tool under its schema name, replacing any previous tool
    /// with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.schema().name;
        self.tools.insert(name, tool);
    }

    /// Builder-style registration
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Look up a tool by exact name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Check whether a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Schemas of every registered tool
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Wire definitions sent to the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.schemas().iter().map(ToolDefinition::from).collect()
    }

    /// Get tool count
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Check that every registered tool exposes a usable schema
    pub fn validate(&self) -> Result<()> {
        for (key, tool) in &self.tools {
            let schema = tool.schema();

            if schema.name.trim().is_empty() {
                return Err(AgentError::tool(format!(
                    "Tool '{}' schema missing required field: name",
                    key
                )));
            }
            if &schema.name != key {
                return Err(AgentError::tool(format!(
                    "Tool '{}' is registered under a different name than its schema ('{}')",
                    key, schema.name
                )));
            }
            if schema.description.trim().is_empty() {
                return Err(AgentError::tool(format!(
                    "Tool '{}' schema missing required field: description",
                    key
                )));
            }
            if let Some(missing) = schema
                .required
                .iter()
                .find(|name| !schema.parameters.contains_key(*name))
            {
                return Err(AgentError::tool(format!(
                    "Tool '{}' requires undeclared parameter '{}'",
                    key, missing
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
