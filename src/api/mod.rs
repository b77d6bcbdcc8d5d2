//! HTTP API Handlers and Routes
//!
//! The REST surface of the regulations agent, built on axum.
//!
//! # API Endpoints
//!
//! - `GET /` - Welcome message
//! - `POST /ask` - Route a question to the `multi`, `web` or `db` agent
//! - `GET /health` - Liveness probe
//! - `GET /agents` - Configured agent handles and their backends
//! - `GET /openapi.json` - OpenAPI document
//!
//! Every error response has the shape `{"detail": "..."}`.
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/docs`.

/// CORS layer built from the origin allow-list.
pub mod cors;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use crate::types::{AgentKind, AskRequest, AskResponse, ErrorBody, WelcomeResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "University Legislation QA System",
        description = "An API that answers questions related to university legislation"
    ),
    paths(
        handlers::root::welcome,
        handlers::root::health,
        handlers::ask::ask,
        handlers::agents::list_agents,
    ),
    components(schemas(
        AskRequest,
        AskResponse,
        WelcomeResponse,
        ErrorBody,
        AgentKind,
        handlers::root::HealthResponse,
        handlers::agents::AgentInfo,
    )),
    tags(
        (name = "ask", description = "Question answering"),
        (name = "system", description = "Service metadata")
    )
)]
pub struct ApiDoc;
