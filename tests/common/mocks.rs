//! Mock agents shared by the integration tests.

use async_trait::async_trait;
use regulations_agent::types::{AppError, Result};
use regulations_agent::{Agent, AgentSet};
use std::sync::{Arc, Mutex};

/// Agent that records every prompt and replies with a fixed answer or error.
pub struct RecordingAgent {
    name: String,
    outcome: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingAgent {
    pub fn answering(name: &str, answer: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            outcome: Ok(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(name: &str, error: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            outcome: Err(error.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Agent for RecordingAgent {
    async fn run(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.outcome.clone().map_err(AppError::Agent)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> &str {
        "mock"
    }
}

/// Three recording agents plus the set built from them
pub struct MockAgents {
    pub multi: Arc<RecordingAgent>,
    pub web: Arc<RecordingAgent>,
    pub db: Arc<RecordingAgent>,
}

impl MockAgents {
    pub fn new(multi: Arc<RecordingAgent>, web: Arc<RecordingAgent>, db: Arc<RecordingAgent>) -> Self {
        Self { multi, web, db }
    }

    /// Each agent answers with its own name
    pub fn answering() -> Self {
        Self::new(
            RecordingAgent::answering("multi", "multi answer"),
            RecordingAgent::answering("web", "web answer"),
            RecordingAgent::answering("db", "db answer"),
        )
    }

    pub fn set(&self) -> AgentSet {
        AgentSet::new(self.multi.clone(), self.web.clone(), self.db.clone())
    }

    /// Total `run` calls across all three agents
    pub fn total_calls(&self) -> usize {
        self.multi.calls() + self.web.calls() + self.db.calls()
    }
}
