pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Action Worker API",
        version = "1.0.0",
        description = "Runs one action per request and returns its events, logs and response"
    ),
    paths(routes::health_check, routes::get_about, routes::execute_action),
    components(schemas(
        routes::HealthResponse,
        error::ErrorResponse,
        worker_core::About,
        worker_core::ActionRequest,
        worker_core::ConnectionDescriptor,
        worker_core::ExecuteRequest,
        worker_core::ExecutionResult,
        worker_core::Event,
        worker_core::LogEntry,
        worker_core::LogLevel,
        worker_core::ResponseEnvelope,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "runtime", description = "Action execution endpoints"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::get_about))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(openapi_json))
        .route("/{action}", post(routes::execute_action))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
