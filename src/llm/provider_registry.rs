//! Provider Registry for managing named LLM providers
//!
//! Models in `regulations.toml` reference providers by name; agents reference
//! models by name. The registry resolves that chain into a live client.

use crate::llm::client::{LLMClient, Provider};
use crate::types::{AppError, Result};
use crate::utils::toml_config::{ModelConfig, ProviderConfig, RegulationsConfig};
use std::collections::HashMap;

/// Registry for managing multiple named LLM providers
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    /// Provider configurations keyed by name
    providers: HashMap<String, ProviderConfig>,
    /// Model configurations keyed by name
    models: HashMap<String, ModelConfig>,
}

impl ProviderRegistry {
    /// Create a new empty provider registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider registry from TOML configuration
    pub fn from_config(config: &RegulationsConfig) -> Self {
        Self {
            providers: config.providers.clone(),
            models: config.models.clone(),
        }
    }

    /// Register a provider configuration
    pub fn register_provider(&mut self, name: &str, config: ProviderConfig) {
        self.providers.insert(name.to_string(), config);
    }

    /// Register a model configuration
    pub fn register_model(&mut self, name: &str, config: ModelConfig) {
        self.models.insert(name.to_string(), config);
    }

    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }

    pub fn get_model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.get(name)
    }

    /// Resolve a model name into a provider without connecting
    pub fn resolve(&self, model_name: &str) -> Result<Provider> {
        let model_config = self.get_model(model_name).ok_or_else(|| {
            AppError::Configuration(format!("Model '{}' not found in configuration", model_name))
        })?;

        let provider_config = self.get_provider(&model_config.provider).ok_or_else(|| {
            AppError::Configuration(format!(
                "Provider '{}' referenced by model '{}' not found",
                model_config.provider, model_name
            ))
        })?;

        Provider::from_model_config(model_config, provider_config)
    }

    /// Create an LLM client for a specific model by name
    pub async fn create_client_for_model(&self, model_name: &str) -> Result<Box<dyn LLMClient>> {
        let provider = self.resolve(model_name)?;
        tracing::debug!(
            model = model_name,
            provider = provider.name(),
            "Creating LLM client"
        );
        provider.create_client().await
    }

    /// Check if a model exists in the registry
    pub fn has_model(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ProviderRegistry {
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
        registry
    }

    #[test]
    fn test_resolve_model() {
        let provider = registry().resolve("default").unwrap();
        assert_eq!(provider.name(), "Ollama");
        assert_eq!(provider.model(), "qwen2.5:7b");
    }

    #[test]
    fn test_resolve_unknown_model() {
        let result = registry().resolve("missing");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_resolve_dangling_provider() {
        let mut registry = registry();
        registry.register_model(
            "orphan",
            ModelConfig {
                provider: "gone".to_string(),
                model: "x".to_string(),
            },
        );

        match registry.resolve("orphan") {
            Err(AppError::Configuration(msg)) => assert!(msg.contains("gone")),
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_has_model() {
        let registry = registry();
        assert!(registry.has_model("default"));
        assert!(!registry.has_model("other"));
    }
}
