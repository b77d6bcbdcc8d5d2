//! # University Legislation QA System
//!
//! An HTTP API that answers questions about Turkish university regulations.
//! A question is wrapped in an instruction prompt and routed to one of three
//! agent handles:
//!
//! - `multi` - a manager that asks both specialists and merges their answers
//! - `web` - an agent that researches current information on the web
//! - `db` - an agent that answers from the legislation database
//!
//! Each handle is backed by a configured LLM (optionally with web tools), a
//! remote agent service, or, for `multi`, the built-in manager.
//!
//! ## Library usage
//!
//! ```rust,ignore
//! use regulations_agent::{AgentRegistry, AppState, ProviderRegistry, RegulationsConfig, ToolRegistry};
//! use std::sync::Arc;
//!
//! let config = RegulationsConfig::load("regulations.toml")?;
//! let providers = Arc::new(ProviderRegistry::from_config(&config));
//! let tools = Arc::new(ToolRegistry::with_config(&config));
//! let agents = AgentRegistry::from_config(&config, providers, tools).build().await?;
//!
//! let state = AppState::new(agents, config.server.expose_error_details);
//! let router = regulations_agent::api::routes::create_router(state, &config.cors)?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//! | `openai` | OpenAI API and compatible endpoints |
//! | `swagger-ui` | Interactive API docs at `/docs` |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Agent trait, handles and backends.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Tools available to LLM-backed agents.
pub mod tools;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use agents::{Agent, AgentRegistry, AgentSet};
pub use llm::{LLMClient, LLMResponse, Provider, ProviderRegistry};
pub use tools::registry::ToolRegistry;
pub use types::{AgentKind, AppError, Result};
pub use utils::toml_config::RegulationsConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Agent handles requests are routed to
    pub agents: AgentSet,
    /// Return agent failure descriptions to clients
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(agents: AgentSet, expose_error_details: bool) -> Self {
        Self {
            agents,
            expose_error_details,
        }
    }
}
