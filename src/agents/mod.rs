//! Agent handles and dispatch
//!
//! Every backend that can answer a question implements [`Agent`]: one call,
//! prompt in, text out. The three handles a request can be routed to are
//! bundled in an [`AgentSet`], built once at startup and shared read-only by
//! all requests.

pub mod configurable;
pub mod manager;
pub mod prompts;
pub mod registry;
pub mod remote;

use crate::types::{AgentKind, Result};
use async_trait::async_trait;
use std::sync::Arc;

// Re-export commonly used types
pub use configurable::ConfigurableAgent;
pub use manager::ManagerAgent;
pub use registry::AgentRegistry;
pub use remote::RemoteAgent;

/// Base trait for all agents
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Agent: Send + Sync {
    /// Run the agent on a fully composed instruction prompt
    async fn run(&self, prompt: &str) -> Result<String>;

    /// Answer `question` as the `kind` handle.
    ///
    /// Composes the instruction prompt for `kind` and calls [`Agent::run`].
    /// Coordinating agents override this to brief their sub-agents.
    async fn answer(&self, kind: AgentKind, question: &str) -> Result<String> {
        self.run(&prompts::build_prompt(kind, question)).await
    }

    /// Name used in logs and listings
    fn name(&self) -> &str;

    /// Backend label (`llm`, `remote`, `manager`, ...)
    fn backend(&self) -> &str {
        "custom"
    }
}

/// The three agent handles requests are routed to
#[derive(Clone)]
pub struct AgentSet {
    multi: Arc<dyn Agent>,
    web: Arc<dyn Agent>,
    db: Arc<dyn Agent>,
}

impl AgentSet {
    pub fn new(multi: Arc<dyn Agent>, web: Arc<dyn Agent>, db: Arc<dyn Agent>) -> Self {
        Self { multi, web, db }
    }

    /// Pick the handle for a kind
    pub fn select(&self, kind: AgentKind) -> &Arc<dyn Agent> {
        match kind {
            AgentKind::Multi => &self.multi,
            AgentKind::Web => &self.web,
            AgentKind::Db => &self.db,
        }
    }

    /// Route `question` to the handle for `kind`
    pub async fn ask(&self, kind: AgentKind, question: &str) -> Result<String> {
        self.select(kind).answer(kind, question).await
    }

    /// `(kind, agent)` pairs in listing order
    pub fn iter(&self) -> impl Iterator<Item = (AgentKind, &Arc<dyn Agent>)> {
        AgentKind::ALL.into_iter().map(move |kind| (kind, self.select(kind)))
    }
}
