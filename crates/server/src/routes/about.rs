use axum::extract::State;
use axum::Json;
use worker_core::About;

use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Runtime identification", body = About)
    ),
    tag = "runtime"
)]
pub async fn get_about(State(state): State<AppState>) -> Json<About> {
    Json(state.orchestrator.get())
}
