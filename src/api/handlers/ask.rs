use crate::{
    types::{AppError, AskRequest, AskResponse, ErrorBody, Result},
    AppState,
};
use axum::{extract::FromRequest, extract::State, Json};
use std::time::Instant;

/// Detail returned in place of the agent's error when details are hidden
pub const REDACTED_DETAIL: &str = "Agent invocation failed";

/// JSON body extractor whose rejections render as `{"detail": ...}`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AskJson<T>(pub T);

/// Ask a question about university legislation
#[utoipa::path(
    post,
    path = "/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "The selected agent's answer", body = AskResponse),
        (status = 422, description = "Malformed body or empty question", body = ErrorBody),
        (status = 500, description = "The agent failed", body = ErrorBody)
    ),
    tag = "ask"
)]
pub async fn ask(
    State(state): State<AppState>,
    AskJson(payload): AskJson<AskRequest>,
) -> Result<Json<AskResponse>> {
    if payload.question.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "question must not be empty".to_string(),
        ));
    }

    let kind = payload.agent_type;
    let started = Instant::now();

    tracing::info!(
        agent = %kind,
        question_len = payload.question.chars().count(),
        "Routing question"
    );

    match state.agents.ask(kind, &payload.question).await {
        Ok(answer) => {
            tracing::info!(
                agent = %kind,
                elapsed_ms = started.elapsed().as_millis() as u64,
                answer_len = answer.chars().count(),
                "Agent answered"
            );
            Ok(Json(AskResponse { answer }))
        }
        Err(e) => {
            tracing::error!(
                agent = %kind,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "Agent invocation failed"
            );

            let detail = if state.expose_error_details {
                e.to_string()
            } else {
                REDACTED_DETAIL.to_string()
            };
            Err(AppError::Agent(detail))
        }
    }
}
