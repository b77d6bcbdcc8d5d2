use crate::{types::AgentKind, AppState};
use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// List the routable agent handles and their backends
#[utoipa::path(
    get,
    path = "/agents",
    responses(
        (status = 200, description = "Configured agents", body = [AgentInfo])
    ),
    tag = "system"
)]
pub async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentInfo>> {
    Json(
        state
            .agents
            .iter()
            .map(|(kind, agent)| AgentInfo {
                agent_type: kind,
                name: agent.name().to_string(),
                backend: agent.backend().to_string(),
            })
            .collect(),
    )
}

#[derive(Serialize, ToSchema)]
pub struct AgentInfo {
    pub agent_type: AgentKind,
    pub name: String,
    pub backend: String,
}
