//! Init command implementation
//!
//! Writes a commented default `regulations.toml` and a `.env.example`.

use super::output::Output;
use crate::utils::toml_config::DEFAULT_CONFIG_FILE;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    Success,
    /// regulations.toml exists and `--force` was not given
    AlreadyExists,
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    pub path: PathBuf,
    pub force: bool,
    /// LLM provider to configure (ollama, openai, or both)
    pub provider: String,
    pub host: String,
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing configuration");

    let config_path = config.path.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !config.force {
        output.warning(&format!("{} already exists!", DEFAULT_CONFIG_FILE));
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if let Err(e) = fs::create_dir_all(&config.path) {
        output.error(&format!("Failed to create {}: {}", config.path.display(), e));
        return InitResult::Error(e.to_string());
    }

    let files = [
        ("config", DEFAULT_CONFIG_FILE, generate_config_toml(&config)),
        ("env", ".env.example", generate_env_example(&config.provider)),
    ];

    for (kind, name, content) in &files {
        let path = config.path.join(name);
        if path.exists() && !config.force {
            output.skipped(name, "already exists");
            continue;
        }
        if let Err(e) = write_file(&path, content, config.force) {
            output.error(&format!("Failed to create {}: {}", name, e));
            return InitResult::Error(e.to_string());
        }
        output.created(kind, name);
    }

    output.complete("Configuration written");

    output.header("Next Steps");
    output.newline();
    output.info("1. Set up environment variables:");
    output.command("cp .env.example .env");
    output.newline();

    if config.provider != "openai" {
        output.info("2. Start Ollama and pull the model:");
        output.command("ollama serve");
        output.command("ollama pull qwen2.5:7b");
        output.newline();
    }

    output.info("3. Start the server:");
    output.command("regulations-agent");

    output.hint(&format!(
        "Ask a question: curl -X POST http://{}:{}/ask -H 'content-type: application/json' -d '{{\"question\": \"Devamsızlık sınırı nedir?\", \"agent_type\": \"db\"}}'",
        config.host, config.port
    ));

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_config_toml(config: &InitConfig) -> String {
    let ollama = r#"# Ollama - local inference (no API key required)
[providers.ollama-local]
type = "ollama"
base_url = "http://localhost:11434"
default_model = "qwen2.5:7b"
"#;
    let openai = r#"# OpenAI API (set OPENAI_API_KEY in .env, build with --features openai)
[providers.openai]
type = "openai"
api_key_env = "OPENAI_API_KEY"
api_base = "https://api.openai.com/v1"
default_model = "gpt-4o-mini"
"#;

    let (provider_section, model_provider, model_name) = match config.provider.as_str() {
        "openai" => (openai.to_string(), "openai", "gpt-4o-mini"),
        "both" => (format!("{}\n{}", ollama, openai), "ollama-local", "qwen2.5:7b"),
        _ => (ollama.to_string(), "ollama-local", "qwen2.5:7b"),
    };

    format!(
        r#"# University Legislation QA System
# Generated by: regulations-agent init

# =============================================================================
# Server
# =============================================================================
[server]
host = "{host}"
port = {port}
log_level = "info"
# "pretty" or "json"
log_format = "pretty"
# When false, failed requests return {{"detail": "Agent invocation failed"}}
# and the real error is only logged.
expose_error_details = true

# =============================================================================
# CORS
# =============================================================================
[cors]
allowed_origins = [
    "https://regulations-agent.com",
    "https://www.regulations-agent.com",
    "https://regulations-agent.vercel.app",
]
allow_credentials = true

# =============================================================================
# LLM Providers
# =============================================================================
{provider_section}
# =============================================================================
# Models
# =============================================================================
[models.default]
provider = "{model_provider}"
model = "{model_name}"

# =============================================================================
# Tools
# =============================================================================
[tools.web_search]
enabled = true
description = "Search the web using DuckDuckGo (no API key required)"
timeout_secs = 30

[tools.fetch_page]
enabled = true
description = "Fetch a page and convert it to markdown"
timeout_secs = 30

# =============================================================================
# Agents: multi, web and db are required
# =============================================================================
[agents.web]
type = "llm"
model = "default"
tools = ["web_search", "fetch_page"]
max_tool_iterations = 5

[agents.db]
type = "llm"
model = "default"
# Point db at an existing retrieval service instead:
# type = "remote"
# url = "http://localhost:9000/run"
# api_key_env = "DB_AGENT_TOKEN"
# timeout_secs = 120

[agents.multi]
type = "manager"
model = "default"
"#,
        host = config.host,
        port = config.port,
    )
}

fn generate_env_example(provider: &str) -> String {
    let mut content = String::from(
        r#"# Environment variables for regulations-agent
# Copy this file to .env and fill in the values.

# Optional: Logging filter (overrides server.log_level)
RUST_LOG=info,regulations_agent=debug

# Optional: Override server.host / server.port
# HOST=0.0.0.0
# PORT=8000
"#,
    );

    if provider == "openai" || provider == "both" {
        content.push_str("\n# REQUIRED by the openai provider\nOPENAI_API_KEY=sk-...\n");
    } else {
        content.push_str("\n# Optional: OpenAI API key (if using the openai provider)\n# OPENAI_API_KEY=sk-...\n");
    }

    content.push_str("\n# Optional: bearer token for a remote db agent\n# DB_AGENT_TOKEN=...\n");
    content
}
