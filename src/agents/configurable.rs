//! Configurable LLM agent
//!
//! A generic agent whose behavior comes from an `[agents.*]` entry with
//! `type = "llm"`: a model, a system prompt and an allow-list of tools.

use crate::agents::Agent;
use crate::llm::LLMClient;
use crate::tools::registry::ToolRegistry;
use crate::types::{AppError, Result, ToolCall, ToolDefinition};
use async_trait::async_trait;
use std::sync::Arc;

/// An LLM agent driven by configuration
pub struct ConfigurableAgent {
    /// The agent's name (`web`, `db`, ...)
    name: String,
    /// The LLM client to use for generation
    llm: Box<dyn LLMClient>,
    /// The system prompt from configuration
    system_prompt: String,
    /// Tools available to this agent
    tool_registry: Option<Arc<ToolRegistry>>,
    /// List of tool names this agent is allowed to use
    allowed_tools: Vec<String>,
    /// Maximum number of model turns
    max_tool_iterations: usize,
}

impl ConfigurableAgent {
    pub fn new(
        name: &str,
        llm: Box<dyn LLMClient>,
        system_prompt: Option<String>,
        tool_registry: Option<Arc<ToolRegistry>>,
        allowed_tools: Vec<String>,
        max_tool_iterations: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            llm,
            system_prompt: system_prompt.unwrap_or_else(|| Self::default_system_prompt(name)),
            tool_registry,
            allowed_tools,
            max_tool_iterations: max_tool_iterations.max(1),
        }
    }

    /// Get default system prompt for an agent name
    pub fn default_system_prompt(name: &str) -> String {
        match name {
            "web" => r#"You are a research assistant for Turkish university legislation.
Use the available web search tools to find current, official information (YÖK, Resmî Gazete, university senate decisions).
Cite the pages you relied on."#
                .to_string(),

            "db" => r#"You are a legislation assistant for Turkish universities.
Answer from the regulation texts you know or are given, quote article and regulation numbers, and say when you are unsure."#
                .to_string(),

            _ => format!("You are the {} agent of a university legislation QA system.", name),
        }
    }

    /// Definitions for the allowed tools that are registered and enabled
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        match &self.tool_registry {
            Some(registry) => {
                let allowed: Vec<&str> = self.allowed_tools.iter().map(|s| s.as_str()).collect();
                registry.get_tool_definitions_for(&allowed)
            }
            None => Vec::new(),
        }
    }

    /// Run the requested tools and render their results for the next turn
    async fn run_tools(&self, calls: &[ToolCall]) -> String {
        let mut rendered = Vec::with_capacity(calls.len());

        for call in calls {
            let allowed = self.allowed_tools.iter().any(|t| t == &call.name);
            let result = match (&self.tool_registry, allowed) {
                (Some(registry), true) => registry
                    .execute(&call.name, call.arguments.clone())
                    .await
                    .map(|v| v.to_string()),
                _ => Err(AppError::Tool(format!(
                    "Tool '{}' is not available to this agent",
                    call.name
                ))),
            };

            let body = match result {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!(agent = %self.name, tool = %call.name, error = %e, "Tool call failed");
                    format!("error: {}", e)
                }
            };

            rendered.push(format!("[{}#{}] {}", call.name, call.id, body));
        }

        rendered.join("\n")
    }
}

#[async_trait]
impl Agent for ConfigurableAgent {
    async fn run(&self, prompt: &str) -> Result<String> {
        let tools = self.tool_definitions();

        if tools.is_empty() {
            return self
                .llm
                .generate_with_system(&self.system_prompt, prompt)
                .await;
        }

        let mut transcript = prompt.to_string();

        for iteration in 0..self.max_tool_iterations {
            let response = self
                .llm
                .generate_with_tools(&self.system_prompt, &transcript, &tools)
                .await?;

            if response.tool_calls.is_empty() {
                return Ok(response.content);
            }

            tracing::debug!(
                agent = %self.name,
                iteration,
                calls = response.tool_calls.len(),
                "Executing tool calls"
            );

            let results = self.run_tools(&response.tool_calls).await;
            transcript.push_str("\n\nTool results:\n");
            transcript.push_str(&results);
            transcript.push_str("\n\nUse these results to continue.");
        }

        Err(AppError::Agent(format!(
            "Agent '{}' did not produce an answer within {} tool iterations",
            self.name, self.max_tool_iterations
        )))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> &str {
        "llm"
    }
}
