//! LLM Provider Clients and Abstractions
//!
//! LLM-backed agents talk to a model through the [`LLMClient`] trait. Concrete
//! clients are compiled in per cargo feature:
//! - `ollama` - Local Ollama server (default)
//! - `openai` - OpenAI API and compatible endpoints
//!
//! [`ProviderRegistry`] resolves the model names used in `regulations.toml`
//! into clients.

/// Core LLM client trait and provider selection.
pub mod client;
/// Registry for named providers and models.
pub mod provider_registry;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{LLMClient, LLMResponse, Provider};
pub use provider_registry::ProviderRegistry;
