use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AskRequest {
    /// The user's question, embedded verbatim into the agent prompt.
    pub question: String,
    /// Which agent answers the question. Defaults to `multi`.
    #[serde(default)]
    pub agent_type: AgentKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Error payload shared by every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

// ============= Agent Types =============

/// The agent a question is routed to.
///
/// Only the exact strings `"web"` and `"db"` select a specialist; any other
/// string, including `"multi"`, falls back to the manager agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    #[default]
    Multi,
    Web,
    Db,
}

impl AgentKind {
    /// All kinds, in the order they are listed by the CLI.
    pub const ALL: [AgentKind; 3] = [AgentKind::Multi, AgentKind::Web, AgentKind::Db];

    pub fn from_string(s: &str) -> Self {
        match s {
            "web" => AgentKind::Web,
            "db" => AgentKind::Db,
            _ => AgentKind::Multi,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Multi => "multi",
            AgentKind::Web => "web",
            AgentKind::Db => "db",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgentKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(AgentKind::from_string(&raw))
    }
}

// ============= Tool Types =============

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An agent's `run` call failed. The message is surfaced as-is.
    #[error("{0}")]
    Agent(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            AppError::InvalidInput(_) => axum::http::StatusCode::UNPROCESSABLE_ENTITY,
            _ => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let detail = match self {
            AppError::InvalidInput(msg) => msg,
            other => other.to_string(),
        };

        (status, axum::Json(ErrorBody { detail })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
