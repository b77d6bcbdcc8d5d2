use crate::api::{cors::cors_layer, handlers, ApiDoc};
use crate::types::Result;
use crate::utils::toml_config::CorsConfig;
use crate::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Build the application router with CORS and request tracing applied.
pub fn create_router(state: AppState, cors: &CorsConfig) -> Result<Router> {
    let router = Router::new()
        .route("/", get(handlers::root::welcome))
        .route("/ask", post(handlers::ask::ask))
        .route("/health", get(handlers::root::health))
        .route("/agents", get(handlers::agents::list_agents));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()),
    );

    #[cfg(not(feature = "swagger-ui"))]
    let router = router.route("/openapi.json", get(openapi_json));

    Ok(router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors)?),
        )
        .with_state(state))
}

#[cfg_attr(feature = "swagger-ui", allow(dead_code))]
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
