use crate::agents::{prompts, Agent};
use crate::llm::LLMClient;
use crate::types::{AgentKind, AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are the coordinator of a university legislation assistant.
You receive a user's request together with two answers: one from a web research agent and one from a legislation database agent.
Combine them into a single comprehensive answer. Prefer the database answer for regulation text and article numbers, and the web answer for recent changes.
If the answers conflict, say so and explain which source is likely more reliable.
If one agent failed, answer from the other and mention that its source was unavailable."#;

/// Manager agent behind the `multi` handle.
///
/// Briefs the `web` and `db` agents concurrently, each with its own
/// instruction template, and asks its LLM to merge the two answers.
pub struct ManagerAgent {
    llm: Box<dyn LLMClient>,
    system_prompt: String,
    web: Arc<dyn Agent>,
    db: Arc<dyn Agent>,
}

impl ManagerAgent {
    pub fn new(
        llm: Box<dyn LLMClient>,
        system_prompt: Option<String>,
        web: Arc<dyn Agent>,
        db: Arc<dyn Agent>,
    ) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            web,
            db,
        }
    }

    /// Render one sub-agent outcome for the merge prompt
    fn section(label: &str, outcome: &Result<String>) -> String {
        match outcome {
            Ok(answer) => format!("### {} answer\n{}", label, answer.trim()),
            Err(e) => format!("### {} answer\n(unavailable: {})", label, e),
        }
    }

    fn merge_prompt(prompt: &str, web: &Result<String>, db: &Result<String>) -> String {
        format!(
            "## Request\n{}\n\n{}\n\n{}\n\nWrite the final merged answer.",
            prompt.trim(),
            Self::section("Web agent", web),
            Self::section("Database agent", db)
        )
    }

    /// Run both sub-agents on their prompts and merge against `request`
    async fn coordinate(&self, request: &str, web_prompt: &str, db_prompt: &str) -> Result<String> {
        let (web, db) = tokio::join!(self.web.run(web_prompt), self.db.run(db_prompt));

        if let (Err(web_err), Err(db_err)) = (&web, &db) {
            return Err(AppError::Agent(format!(
                "Both agents failed. web: {}; db: {}",
                web_err, db_err
            )));
        }

        for (label, outcome) in [("web", &web), ("db", &db)] {
            if let Err(e) = outcome {
                tracing::warn!(agent = label, error = %e, "Sub-agent failed, merging partial results");
            }
        }

        let merge = Self::merge_prompt(request, &web, &db);
        self.llm
            .generate_with_system(&self.system_prompt, &merge)
            .await
    }
}

#[async_trait]
impl Agent for ManagerAgent {
    /// A pre-composed prompt goes to both sub-agents as is
    async fn run(&self, prompt: &str) -> Result<String> {
        self.coordinate(prompt, prompt, prompt).await
    }

    async fn answer(&self, kind: AgentKind, question: &str) -> Result<String> {
        let request = prompts::build_prompt(kind, question);
        let web_prompt = prompts::build_prompt(AgentKind::Web, question);
        let db_prompt = prompts::build_prompt(AgentKind::Db, question);
        self.coordinate(&request, &web_prompt, &db_prompt).await
    }

    fn name(&self) -> &str {
        "manager"
    }

    fn backend(&self) -> &str {
        "manager"
    }
}
