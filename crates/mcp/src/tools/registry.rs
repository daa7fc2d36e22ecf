// MCP tool trait, registry and the shared tool error wrapper

use crate::protocol::{CallToolResult, ToolContent, ToolSchema};
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments.
    ///
    /// Returning `Err` produces an `Error in {tool}: ...` result; it never
    /// becomes a JSON-RPC error.
    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult>;
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name.clone(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas, sorted by name
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Run a registered tool, converting any failure into a text result.
    ///
    /// Returns `None` if no tool has that name.
    pub async fn call(&self, name: &str, arguments: serde_json::Value) -> Option<CallToolResult> {
        let tool = self.get(name)?;

        info!(tool = name, args = %arguments, "MCP tool invoke");
        let result = match tool.execute(arguments).await {
            Ok(result) => {
                info!(tool = name, "MCP tool success");
                result
            }
            Err(e) => tool_error(name, &e),
        };
        Some(result)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn tool_error(name: &str, err: &anyhow::Error) -> CallToolResult {
    let message = format!("{:#}", err);
    error!(tool = name, error = %message, "MCP tool error");
    CallToolResult {
        content: vec![ToolContent::text(format!("Error in {}: {}", name, message))],
        is_error: Some(true),
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_enum(values: &[&str], description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "enum": values,
        "description": description
    })
}

pub fn json_schema_array(items: serde_json::Value, description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": items,
        "description": description
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    struct EchoTool;

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".to_string(),
                description: "Echo the message argument".to_string(),
                input_schema: json_schema_object(
                    serde_json::json!({ "message": json_schema_string("Text to echo") }),
                    vec!["message"],
                ),
                annotations: None,
            }
        }

        async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
            let message = arguments
                .get("message")
                .and_then(|m| m.as_str())
                .context("missing message")?;
            Ok(CallToolResult::text(message))
        }
    }

    #[tokio::test]
    async fn test_call_success() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let result = registry
            .call("echo", serde_json::json!({"message": "hi"}))
            .await
            .unwrap();

        assert_eq!(result.content, vec![ToolContent::text("hi")]);
        assert!(result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_call_error_is_wrapped() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let result = registry.call("echo", serde_json::json!({})).await.unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.content,
            vec![ToolContent::text("Error in echo: missing message")]
        );
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        assert!(!registry.contains("echo"));
        assert!(registry.call("echo", serde_json::json!({})).await.is_none());
    }
}
