use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use orchestrator::RuntimeError;
use serde_json::Value;
use worker_core::{ExecuteRequest, ExecutionResult};

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

/// The body is decoded here rather than by the `Json` extractor so malformed
/// input is reported like every other execution error.
#[utoipa::path(
    post,
    path = "/{action}",
    params(
        ("action" = String, Path, description = "Name of the action to run")
    ),
    request_body = ExecuteRequest,
    responses(
        (status = 200, description = "Action executed", body = ExecutionResult),
        (status = 400, description = "Malformed execute request", body = ErrorResponse),
        (status = 404, description = "Unknown action", body = ErrorResponse),
        (status = 422, description = "Action cannot be invoked", body = ErrorResponse),
        (status = 500, description = "Action or connection lookup failed", body = ErrorResponse),
        (status = 502, description = "Connection could not be constructed", body = ErrorResponse)
    ),
    tag = "runtime"
)]
pub async fn execute_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
    body: Bytes,
) -> Result<Json<ExecutionResult>, AppError> {
    let payload: Value = serde_json::from_slice(&body).map_err(RuntimeError::InvalidPayload)?;

    let result = state.orchestrator.run(&action, payload).await?;
    Ok(Json(result))
}
