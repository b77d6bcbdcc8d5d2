use crate::types::{AppError, Result, ToolDefinition};
use crate::utils::toml_config::RegulationsConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, args: Value) -> Result<Value>;
}

struct RegisteredTool {
    tool: Arc<dyn Tool>,
    enabled: bool,
    timeout: Duration,
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a new registry with the built-in tools (web search, page fetch)
    pub fn with_default_tools() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::tools::search::SearchTool::new()));
        registry.register(Arc::new(crate::tools::search::FetchPageTool::new()));
        registry
    }

    /// Built-in tools with `enabled` and `timeout_secs` taken from `[tools.*]`
    ///
    /// Built-in tools absent from the config stay registered but disabled.
    pub fn with_config(config: &RegulationsConfig) -> Self {
        let mut registry = Self::with_default_tools();
        for (name, entry) in registry.tools.iter_mut() {
            match config.get_tool(name) {
                Some(tool_config) => {
                    entry.enabled = tool_config.enabled;
                    entry.timeout = Duration::from_secs(tool_config.timeout_secs);
                }
                None => entry.enabled = false,
            }
        }
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(
            tool.name().to_string(),
            RegisteredTool {
                tool,
                enabled: true,
                timeout: DEFAULT_TIMEOUT,
            },
        );
    }

    /// Definitions for the enabled tools among `names`, in the given order
    pub fn get_tool_definitions_for(&self, names: &[&str]) -> Vec<ToolDefinition> {
        names
            .iter()
            .filter_map(|name| self.tools.get(*name))
            .filter(|entry| entry.enabled)
            .map(|entry| Self::definition(entry.tool.as_ref()))
            .collect()
    }

    fn definition(tool: &dyn Tool) -> ToolDefinition {
        ToolDefinition {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters_schema(),
        }
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<Value> {
        let entry = self
            .tools
            .get(name)
            .filter(|entry| entry.enabled)
            .ok_or_else(|| AppError::Tool(format!("Tool not found: {}", name)))?;

        tokio::time::timeout(entry.timeout, entry.tool.execute(args))
            .await
            .map_err(|_| {
                AppError::Tool(format!(
                    "Tool '{}' timed out after {}s",
                    name,
                    entry.timeout.as_secs()
                ))
            })?
    }

    /// Check if a tool is registered
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Check if a tool is registered and enabled
    pub fn is_enabled(&self, name: &str) -> bool {
        self.tools.get(name).map(|e| e.enabled).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Returns its arguments"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, args: Value) -> Result<Value> {
            Ok(args)
        }
    }

    struct SlowTool;

    #[async_trait]
    impl Tool for SlowTool {
        fn name(&self) -> &str {
            "slow"
        }

        fn description(&self) -> &str {
            "Never finishes in time"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object"})
        }

        async fn execute(&self, _args: Value) -> Result<Value> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = ToolRegistry::new();
        assert!(!registry.has_tool("web_search"));
        assert!(registry.get_tool_definitions_for(&["web_search"]).is_empty());
    }

    #[test]
    fn test_registry_with_default_tools() {
        let registry = ToolRegistry::with_default_tools();
        assert!(registry.has_tool("web_search"));
        assert!(registry.has_tool("fetch_page"));
        assert_eq!(
            registry
                .get_tool_definitions_for(&["web_search", "fetch_page"])
                .len(),
            2
        );
    }

    #[test]
    fn test_with_config_disables_unlisted_tools() {
        let config: RegulationsConfig = toml::from_str(
            r#"
[tools.web_search]
enabled = true
timeout_secs = 5
"#,
        )
        .unwrap();

        let registry = ToolRegistry::with_config(&config);
        assert!(registry.is_enabled("web_search"));
        assert!(!registry.is_enabled("fetch_page"));
        assert!(registry.has_tool("fetch_page"));
    }

    #[test]
    fn test_definitions_for_subset() {
        let mut registry = ToolRegistry::with_default_tools();
        registry.register(Arc::new(EchoTool));

        let defs = registry.get_tool_definitions_for(&["echo", "unknown"]);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
        assert!(defs[0].parameters.is_object());
    }

    #[tokio::test]
    async fn test_execute_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let value = registry.execute("echo", json!({"q": 1})).await.unwrap();
        assert_eq!(value["q"], 1);
    }

    #[tokio::test]
    async fn test_nonexistent_tool() {
        let registry = ToolRegistry::new();
        let result = registry.execute("nonexistent_tool", json!({})).await;
        assert!(matches!(result, Err(AppError::Tool(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tool_timeout() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(SlowTool));

        let result = registry.execute("slow", json!({})).await;
        match result {
            Err(AppError::Tool(msg)) => assert!(msg.contains("timed out")),
            other => panic!("Expected timeout, got {:?}", other),
        }
    }
}
