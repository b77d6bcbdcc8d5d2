//! TOML-based configuration for the regulations agent server
//!
//! This module provides declarative configuration for the HTTP server, CORS
//! allow-list, LLM providers, models, tools and the three agent handles
//! (`multi`, `web`, `db`) via a TOML file (`regulations.toml`).
//!
//! Secrets are never stored in the file: providers and remote agents name the
//! environment variable that holds their key.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name looked up by the CLI
pub const DEFAULT_CONFIG_FILE: &str = "regulations.toml";

/// Agent names every configuration must define
pub const REQUIRED_AGENTS: [&str; 3] = ["multi", "web", "db"];

/// Root configuration structure loaded from regulations.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulationsConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    /// Named LLM provider configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Named model configurations that reference providers
    #[serde(default)]
    pub models: HashMap<String, ModelConfig>,

    /// Tool configurations
    #[serde(default)]
    pub tools: HashMap<String, ToolConfig>,

    /// Agent configurations keyed by agent name (`multi`, `web`, `db`)
    #[serde(default)]
    pub agents: HashMap<String, AgentConfig>,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Whether agent failure descriptions are returned to clients verbatim
    #[serde(default = "default_true")]
    pub expose_error_details: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            expose_error_details: true,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ============= CORS Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_true")]
    pub allow_credentials: bool,
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "https://regulations-agent.com".to_string(),
        "https://www.regulations-agent.com".to_string(),
        "https://regulations-agent.vercel.app".to_string(),
    ]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allow_credentials: true,
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        default_model: String,
    },
    OpenAI {
        /// Environment variable containing API key
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        default_model: String,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

// ============= Model Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Reference to a provider name defined in [providers]
    pub provider: String,

    /// Model name/identifier to use with the provider
    pub model: String,
}

// ============= Tool Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default = "default_tool_timeout")]
    pub timeout_secs: u64,
}

fn default_tool_timeout() -> u64 {
    30
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            description: None,
            timeout_secs: default_tool_timeout(),
        }
    }
}

// ============= Agent Configuration =============

/// Backend behind one agent handle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AgentConfig {
    /// An LLM with a system prompt and an optional tool allow-list
    Llm {
        /// Reference to a model name defined in [models]
        model: String,

        #[serde(default)]
        system_prompt: Option<String>,

        #[serde(default)]
        tools: Vec<String>,

        #[serde(default = "default_max_tool_iterations")]
        max_tool_iterations: usize,
    },

    /// An external agent service reached over HTTP
    Remote {
        url: String,

        /// Environment variable holding a bearer token
        #[serde(default)]
        api_key_env: Option<String>,

        /// Request timeout; unset means no timeout
        #[serde(default)]
        timeout_secs: Option<u64>,
    },

    /// Queries the `web` and `db` agents and merges their answers
    Manager {
        model: String,

        #[serde(default)]
        system_prompt: Option<String>,
    },
}

fn default_max_tool_iterations() -> usize {
    5
}

impl AgentConfig {
    /// Short backend label (`llm`, `remote`, `manager`)
    pub fn backend(&self) -> &'static str {
        match self {
            AgentConfig::Llm { .. } => "llm",
            AgentConfig::Remote { .. } => "remote",
            AgentConfig::Manager { .. } => "manager",
        }
    }

    /// Model referenced by this agent, if any
    pub fn model(&self) -> Option<&str> {
        match self {
            AgentConfig::Llm { model, .. } | AgentConfig::Manager { model, .. } => Some(model),
            AgentConfig::Remote { .. } => None,
        }
    }

    /// Tools referenced by this agent
    pub fn tools(&self) -> &[String] {
        match self {
            AgentConfig::Llm { tools, .. } => tools,
            _ => &[],
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Configuration warnings that don't prevent operation but may indicate issues
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub kind: ConfigWarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarningKind {
    UnusedProvider,
    UnusedModel,
    UnusedTool,
    UnusedAgent,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Provider '{0}' referenced by model '{1}' does not exist")]
    MissingProvider(String, String),

    #[error("Model '{0}' referenced by agent '{1}' does not exist")]
    MissingModel(String, String),

    #[error("Tool '{0}' referenced by agent '{1}' does not exist")]
    MissingTool(String, String),

    #[error("Required agent '{0}' is not configured")]
    MissingAgent(String),
}

impl RegulationsConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: RegulationsConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Apply `HOST` / `PORT` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("PORT must be a number, got '{}'", port))
            })?;
        }
        Ok(())
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        for origin in &self.cors.allowed_origins {
            if origin == "*" || axum::http::HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid CORS origin '{}': origins must be explicit",
                    origin
                )));
            }
        }

        for provider in self.providers.values() {
            if let ProviderConfig::OpenAI { api_key_env, .. } = provider {
                self.validate_env_var(api_key_env)?;
            }
        }

        for (model_name, model_config) in &self.models {
            if !self.providers.contains_key(&model_config.provider) {
                return Err(ConfigError::MissingProvider(
                    model_config.provider.clone(),
                    model_name.clone(),
                ));
            }
        }

        for name in REQUIRED_AGENTS {
            if !self.agents.contains_key(name) {
                return Err(ConfigError::MissingAgent(name.to_string()));
            }
        }

        for (agent_name, agent_config) in &self.agents {
            if let Some(model) = agent_config.model() {
                if !self.models.contains_key(model) {
                    return Err(ConfigError::MissingModel(
                        model.to_string(),
                        agent_name.clone(),
                    ));
                }
            }

            for tool_name in agent_config.tools() {
                if !self.tools.contains_key(tool_name) {
                    return Err(ConfigError::MissingTool(
                        tool_name.clone(),
                        agent_name.clone(),
                    ));
                }
            }

            match agent_config {
                AgentConfig::Manager { .. } if agent_name != "multi" => {
                    return Err(ConfigError::ValidationError(format!(
                        "Agent '{}' cannot be a manager: only 'multi' coordinates other agents",
                        agent_name
                    )));
                }
                AgentConfig::Remote {
                    url, api_key_env, ..
                } => {
                    if !(url.starts_with("http://") || url.starts_with("https://")) {
                        return Err(ConfigError::ValidationError(format!(
                            "Remote agent '{}' has invalid url '{}'",
                            agent_name, url
                        )));
                    }
                    if let Some(env) = api_key_env {
                        self.validate_env_var(env)?;
                    }
                }
                AgentConfig::Llm {
                    max_tool_iterations,
                    ..
                } if *max_tool_iterations == 0 => {
                    return Err(ConfigError::ValidationError(format!(
                        "Agent '{}' must allow at least one model turn (max_tool_iterations = 0)",
                        agent_name
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Validate configuration with warnings for unused items
    pub fn validate_with_warnings(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.validate()?;

        let used_providers: HashSet<&str> =
            self.models.values().map(|m| m.provider.as_str()).collect();
        let used_models: HashSet<&str> = self.agents.values().filter_map(|a| a.model()).collect();
        let used_tools: HashSet<&str> = self
            .agents
            .values()
            .flat_map(|a| a.tools().iter().map(String::as_str))
            .collect();

        let mut warnings = Vec::new();
        warnings.extend(unreferenced(self.providers.keys(), &used_providers, |name| ConfigWarning {
            kind: ConfigWarningKind::UnusedProvider,
            message: format!("Provider '{name}' is not used by any model"),
        }));
        warnings.extend(unreferenced(self.models.keys(), &used_models, |name| ConfigWarning {
            kind: ConfigWarningKind::UnusedModel,
            message: format!("Model '{name}' is not used by any agent"),
        }));
        warnings.extend(unreferenced(self.tools.keys(), &used_tools, |name| ConfigWarning {
            kind: ConfigWarningKind::UnusedTool,
            message: format!("Tool '{name}' is not granted to any agent"),
        }));

        // Only multi, web and db are ever routed to
        let routed: HashSet<&str> = REQUIRED_AGENTS.iter().copied().collect();
        warnings.extend(unreferenced(self.agents.keys(), &routed, |name| ConfigWarning {
            kind: ConfigWarningKind::UnusedAgent,
            message: format!(
                "Agent '{name}' is defined but requests are only routed to multi, web and db"
            ),
        }));

        warnings.sort_by(|a, b| a.message.cmp(&b.message));
        Ok(warnings)
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get provider by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }

    /// Get model by name
    pub fn get_model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.get(name)
    }

    /// Get agent config by name
    pub fn get_agent(&self, name: &str) -> Option<&AgentConfig> {
        self.agents.get(name)
    }

    /// Get tool config by name
    pub fn get_tool(&self, name: &str) -> Option<&ToolConfig> {
        self.tools.get(name)
    }

    /// Get all enabled tools
    pub fn enabled_tools(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter(|(_, config)| config.enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Get the enabled tools an agent may call
    pub fn agent_tools(&self, agent_name: &str) -> Vec<&str> {
        self.get_agent(agent_name)
            .map(|agent| {
                agent
                    .tools()
                    .iter()
                    .filter(|t| self.get_tool(t).map(|tc| tc.enabled).unwrap_or(false))
                    .map(|s| s.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Names in `defined` missing from `used`, mapped to warnings
fn unreferenced<'a>(
    defined: impl Iterator<Item = &'a String>,
    used: &HashSet<&str>,
    warn: impl Fn(&str) -> ConfigWarning,
) -> Vec<ConfigWarning> {
    defined
        .filter(|name| !used.contains(name.as_str()))
        .map(|name| warn(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> String {
        r#"
[server]
host = "127.0.0.1"
port = 8000
log_level = "debug"

[providers.ollama-local]
type = "ollama"
base_url = "http://localhost:11434"
default_model = "llama3.2"

[models.default]
provider = "ollama-local"
model = "llama3.2"

[tools.web_search]
enabled = true
description = "DuckDuckGo search"
timeout_secs = 10

[agents.web]
type = "llm"
model = "default"
tools = ["web_search"]
max_tool_iterations = 3

[agents.db]
type = "remote"
url = "http://localhost:9000/run"

[agents.multi]
type = "manager"
model = "default"
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let content = create_test_config();
        let config: RegulationsConfig = toml::from_str(&content).expect("Failed to parse config");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert!(config.providers.contains_key("ollama-local"));
        assert!(config.models.contains_key("default"));
        assert_eq!(config.get_agent("web").unwrap().backend(), "llm");
        assert_eq!(config.get_agent("db").unwrap().backend(), "remote");
        assert_eq!(config.get_agent("multi").unwrap().backend(), "manager");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config: RegulationsConfig = toml::from_str("").unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert!(config.server.expose_error_details);

        assert_eq!(
            config.cors.allowed_origins,
            vec![
                "https://regulations-agent.com",
                "https://www.regulations-agent.com",
                "https://regulations-agent.vercel.app",
            ]
        );
        assert!(config.cors.allow_credentials);
    }

    #[test]
    fn test_validation_missing_agent() {
        let content = r#"
[providers.test]
type = "ollama"
default_model = "llama3.2"
[models.default]
provider = "test"
model = "llama3.2"
[agents.web]
type = "llm"
model = "default"
[agents.multi]
type = "manager"
model = "default"
"#;

        let config: RegulationsConfig = toml::from_str(content).unwrap();
        let result = config.validate();

        assert!(matches!(result, Err(ConfigError::MissingAgent(name)) if name == "db"));
    }

    #[test]
    fn test_validation_missing_provider() {
        let content = create_test_config().replace(
            "provider = \"ollama-local\"",
            "provider = \"nonexistent\"",
        );

        let config: RegulationsConfig = toml::from_str(&content).unwrap();
        let result = config.validate();

        assert!(matches!(result, Err(ConfigError::MissingProvider(_, _))));
    }

    #[test]
    fn test_validation_missing_model() {
        let content = create_test_config().replace(
            "[agents.multi]\ntype = \"manager\"\nmodel = \"default\"",
            "[agents.multi]\ntype = \"manager\"\nmodel = \"nonexistent\"",
        );

        let config: RegulationsConfig = toml::from_str(&content).unwrap();
        let result = config.validate();

        assert!(matches!(result, Err(ConfigError::MissingModel(_, _))));
    }

    #[test]
    fn test_validation_missing_tool() {
        let content =
            create_test_config().replace("tools = [\"web_search\"]", "tools = [\"calculator\"]");

        let config: RegulationsConfig = toml::from_str(&content).unwrap();
        let result = config.validate();

        assert!(matches!(result, Err(ConfigError::MissingTool(_, _))));
    }

    #[test]
    fn test_validation_rejects_nested_manager() {
        let content = create_test_config().replace(
            "[agents.db]\ntype = \"remote\"\nurl = \"http://localhost:9000/run\"",
            "[agents.db]\ntype = \"manager\"\nmodel = \"default\"",
        );

        let config: RegulationsConfig = toml::from_str(&content).unwrap();
        let result = config.validate();

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_rejects_wildcard_origin() {
        let mut config: RegulationsConfig = toml::from_str(&create_test_config()).unwrap();
        config.cors.allowed_origins = vec!["*".to_string()];

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_remote_url() {
        let content = create_test_config().replace("http://localhost:9000/run", "localhost:9000");

        let config: RegulationsConfig = toml::from_str(&content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_missing_env_var() {
        let content = create_test_config().replace(
            "url = \"http://localhost:9000/run\"",
            "url = \"http://localhost:9000/run\"\napi_key_env = \"REGULATIONS_TEST_SURELY_UNSET_KEY\"",
        );

        let config: RegulationsConfig = toml::from_str(&content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_agent_tools_skips_disabled() {
        let content = create_test_config().replace(
            "[tools.web_search]\nenabled = true",
            "[tools.web_search]\nenabled = false",
        );
        let config: RegulationsConfig = toml::from_str(&content).unwrap();

        assert!(config.agent_tools("web").is_empty());
        assert!(config.enabled_tools().is_empty());
    }

    #[test]
    fn test_unused_provider_warning() {
        let content = format!(
            "{}\n[providers.unused]\ntype = \"ollama\"\ndefault_model = \"llama3.2\"\n",
            create_test_config()
        );

        let config: RegulationsConfig = toml::from_str(&content).unwrap();
        let warnings = config.validate_with_warnings().unwrap();

        assert!(warnings.iter().any(
            |w| w.kind == ConfigWarningKind::UnusedProvider && w.message.contains("unused")
        ));
    }

    #[test]
    fn test_unused_agent_warning() {
        let content = format!(
            "{}\n[agents.extra]\ntype = \"remote\"\nurl = \"http://localhost:9001\"\n",
            create_test_config()
        );

        let config: RegulationsConfig = toml::from_str(&content).unwrap();
        let warnings = config.validate_with_warnings().unwrap();

        assert!(warnings
            .iter()
            .any(|w| w.kind == ConfigWarningKind::UnusedAgent && w.message.contains("extra")));
    }

    #[test]
    fn test_no_warnings_for_fully_connected_config() {
        let config: RegulationsConfig = toml::from_str(&create_test_config()).unwrap();
        let warnings = config.validate_with_warnings().unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn test_load_missing_file() {
        let result = RegulationsConfig::load("/nonexistent/regulations.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, create_test_config()).unwrap();

        let config = RegulationsConfig::load(&path).unwrap();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8000");
    }
}
