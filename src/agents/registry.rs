//! Agent Registry for building the agent handles from configuration
//!
//! Each `[agents.*]` entry in `regulations.toml` names a backend. The
//! registry turns those entries into live [`Agent`] instances and assembles
//! the [`AgentSet`] the API routes requests to.
//!
//! ## Build order
//!
//! `web` and `db` are built first because a `manager` backend on `multi`
//! holds handles to both.

use crate::agents::configurable::ConfigurableAgent;
use crate::agents::manager::ManagerAgent;
use crate::agents::remote::RemoteAgent;
use crate::agents::{Agent, AgentSet};
use crate::llm::ProviderRegistry;
use crate::tools::registry::ToolRegistry;
use crate::types::{AppError, Result};
use crate::utils::toml_config::{AgentConfig, RegulationsConfig};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry for agent configurations and agent construction
pub struct AgentRegistry {
    /// Agent configurations keyed by name
    configs: HashMap<String, AgentConfig>,
    /// Provider registry for creating LLM clients
    provider_registry: Arc<ProviderRegistry>,
    /// Tool registry shared across agents
    tool_registry: Arc<ToolRegistry>,
}

impl AgentRegistry {
    /// Create a new agent registry
    pub fn new(provider_registry: Arc<ProviderRegistry>, tool_registry: Arc<ToolRegistry>) -> Self {
        Self {
            configs: HashMap::new(),
            provider_registry,
            tool_registry,
        }
    }

    /// Create an agent registry from TOML configuration
    pub fn from_config(
        config: &RegulationsConfig,
        provider_registry: Arc<ProviderRegistry>,
        tool_registry: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            configs: config.agents.clone(),
            provider_registry,
            tool_registry,
        }
    }

    /// Register an agent configuration
    pub fn register(&mut self, name: &str, config: AgentConfig) {
        self.configs.insert(name.to_string(), config);
    }

    /// Get an agent configuration by name
    pub fn get_config(&self, name: &str) -> Option<&AgentConfig> {
        self.configs.get(name)
    }

    fn require(&self, name: &str) -> Result<&AgentConfig> {
        self.get_config(name).ok_or_else(|| {
            AppError::Configuration(format!("Agent '{}' not found in configuration", name))
        })
    }

    /// Create a specialist agent (`llm` or `remote`) by name
    pub async fn create_agent(&self, name: &str) -> Result<Arc<dyn Agent>> {
        let config = self.require(name)?;

        match config {
            AgentConfig::Llm {
                model,
                system_prompt,
                tools,
                max_tool_iterations,
            } => {
                let llm = self.provider_registry.create_client_for_model(model).await?;

                let agent_tool_registry = if tools.is_empty() {
                    None
                } else {
                    Some(Arc::clone(&self.tool_registry))
                };

                Ok(Arc::new(ConfigurableAgent::new(
                    name,
                    llm,
                    system_prompt.clone(),
                    agent_tool_registry,
                    tools.clone(),
                    *max_tool_iterations,
                )))
            }

            AgentConfig::Remote {
                url,
                api_key_env,
                timeout_secs,
            } => {
                let api_key = match api_key_env {
                    Some(env) => Some(std::env::var(env).map_err(|_| {
                        AppError::Configuration(format!(
                            "Environment variable '{}' is not set",
                            env
                        ))
                    })?),
                    None => None,
                };

                Ok(Arc::new(RemoteAgent::new(name, url, api_key, *timeout_secs)?))
            }

            AgentConfig::Manager { .. } => Err(AppError::Configuration(format!(
                "Agent '{}' is a manager; only 'multi' can coordinate other agents",
                name
            ))),
        }
    }

    /// Build the three handles requests are routed to
    pub async fn build(&self) -> Result<AgentSet> {
        let web = self.create_agent("web").await?;
        let db = self.create_agent("db").await?;

        let multi: Arc<dyn Agent> = match self.require("multi")? {
            AgentConfig::Manager {
                model,
                system_prompt,
            } => {
                let llm = self.provider_registry.create_client_for_model(model).await?;
                Arc::new(ManagerAgent::new(
                    llm,
                    system_prompt.clone(),
                    Arc::clone(&web),
                    Arc::clone(&db),
                ))
            }
            _ => self.create_agent("multi").await?,
        };

        for agent in [&multi, &web, &db] {
            tracing::debug!(agent = agent.name(), backend = agent.backend(), "Agent ready");
        }

        Ok(AgentSet::new(multi, web, db))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgentKind;
    use crate::utils::toml_config::{ModelConfig, ProviderConfig};

    fn remote(url: &str) -> AgentConfig {
        AgentConfig::Remote {
            url: url.to_string(),
            api_key_env: None,
            timeout_secs: None,
        }
    }

    fn create_test_provider_registry() -> Arc<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        registry.register_provider(
            "ollama-local",
            ProviderConfig::Ollama {
                base_url: "http://localhost:11434".to_string(),
                default_model: "llama3.2".to_string(),
            },
        );
        registry.register_model(
            "default",
            ModelConfig {
                provider: "ollama-local".to_string(),
                model: "qwen2.5:7b".to_string(),
            },
        );
        Arc::new(registry)
    }

    fn registry() -> AgentRegistry {
        AgentRegistry::new(
            create_test_provider_registry(),
            Arc::new(ToolRegistry::with_default_tools()),
        )
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = registry();
        registry.register("db", remote("http://localhost:9000/run"));

        assert_eq!(registry.get_config("db").unwrap().backend(), "remote");
        assert!(registry.get_config("web").is_none());
    }

    #[tokio::test]
    async fn test_build_all_remote() {
        let mut registry = registry();
        registry.register("web", remote("http://localhost:9001/run"));
        registry.register("db", remote("http://localhost:9002/run"));
        registry.register("multi", remote("http://localhost:9003/run"));

        let set = registry.build().await.unwrap();
        let backends: Vec<_> = set.iter().map(|(_, a)| a.backend().to_string()).collect();
        assert_eq!(backends, vec!["remote", "remote", "remote"]);
        assert_eq!(set.select(AgentKind::Web).name(), "web");
    }

    #[tokio::test]
    async fn test_build_requires_all_handles() {
        let mut registry = registry();
        registry.register("web", remote("http://localhost:9001/run"));

        match registry.build().await {
            Err(AppError::Configuration(msg)) => assert!(msg.contains("'db'")),
            Err(other) => panic!("Expected configuration error, got {:?}", other),
            Ok(_) => panic!("Expected configuration error"),
        }
    }

    #[tokio::test]
    async fn test_specialist_cannot_be_manager() {
        let mut registry = registry();
        registry.register(
            "web",
            AgentConfig::Manager {
                model: "default".to_string(),
                system_prompt: None,
            },
        );

        assert!(matches!(
            registry.create_agent("web").await,
            Err(AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_remote_api_key_env_must_be_set() {
        let mut registry = registry();
        registry.register(
            "db",
            AgentConfig::Remote {
                url: "http://localhost:9000".to_string(),
                api_key_env: Some("REGULATIONS_TEST_UNSET_KEY".to_string()),
                timeout_secs: None,
            },
        );

        match registry.create_agent("db").await {
            Err(AppError::Configuration(msg)) => assert!(msg.contains("REGULATIONS_TEST_UNSET_KEY")),
            Err(other) => panic!("Expected configuration error, got {:?}", other),
            Ok(_) => panic!("Expected configuration error"),
        }
    }

    #[cfg(feature = "ollama")]
    #[tokio::test]
    async fn test_build_with_llm_agents_and_manager() {
        let mut registry = registry();
        registry.register(
            "web",
            AgentConfig::Llm {
                model: "default".to_string(),
                system_prompt: None,
                tools: vec!["web_search".to_string()],
                max_tool_iterations: 5,
            },
        );
        registry.register("db", remote("http://localhost:9002/run"));
        registry.register(
            "multi",
            AgentConfig::Manager {
                model: "default".to_string(),
                system_prompt: None,
            },
        );

        let set = registry.build().await.unwrap();
        assert_eq!(set.select(AgentKind::Multi).backend(), "manager");
        assert_eq!(set.select(AgentKind::Web).backend(), "llm");
        assert_eq!(set.select(AgentKind::Db).backend(), "remote");
    }

    #[tokio::test]
    async fn test_unknown_model_fails() {
        let mut registry = registry();
        registry.register(
            "web",
            AgentConfig::Llm {
                model: "missing".to_string(),
                system_prompt: None,
                tools: vec![],
                max_tool_iterations: 5,
            },
        );

        assert!(registry.create_agent("web").await.is_err());
    }
}
