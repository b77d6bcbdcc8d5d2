//! Built-in Tools for LLM-backed agents
//!
//! Tools let a configured LLM agent reach beyond text generation. The web
//! agent typically gets both built-ins:
//!
//! - `web_search` - DuckDuckGo search, optionally pinned to one site
//! - `fetch_page` - fetch a page and convert it to markdown
//!
//! Which tools an agent may call is set by `tools = [...]` on its
//! `[agents.*]` entry; `[tools.*]` entries toggle tools and set timeouts.
//!
//! ```ignore
//! let registry = ToolRegistry::with_config(&config);
//! let result = registry.execute("web_search", json!({"query": "YÖK yatay geçiş"})).await?;
//! ```

/// Tool registry for managing available tools.
pub mod registry;
/// Web search and page fetch tools using daedra.
pub mod search;
