use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use connectors::ConnectorError;
use orchestrator::RuntimeError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug)]
pub enum AppError {
    Runtime(RuntimeError),
    Internal(String),
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    error: String,
    message: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Runtime(err) => match err {
                RuntimeError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
                RuntimeError::ActionNotFound(_) => StatusCode::NOT_FOUND,
                RuntimeError::InvalidAction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                RuntimeError::Connection(ConnectorError::Construction { .. }) => {
                    StatusCode::BAD_GATEWAY
                }
                RuntimeError::Connection(_)
                | RuntimeError::HandlerFault(_)
                | RuntimeError::InvalidTransition { .. }
                | RuntimeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (error_type, message) = match self {
            AppError::Runtime(err) => {
                if status.is_server_error() {
                    tracing::error!(kind = err.kind(), "Execution failed: {:?}", err);
                }
                (err.kind().to_string(), describe(&err))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("internal_error".to_string(), msg)
            }
        };

        let body = Json(ErrorResponse {
            error: error_type,
            message,
        });

        (status, body).into_response()
    }
}

/// Error message followed by its immediate cause, if the message lacks it.
fn describe(err: &RuntimeError) -> String {
    let message = err.to_string();
    match std::error::Error::source(err).map(|cause| cause.to_string()) {
        Some(cause) if !message.contains(&cause) => format!("{message}: {cause}"),
        _ => message,
    }
}

impl From<RuntimeError> for AppError {
    fn from(err: RuntimeError) -> Self {
        AppError::Runtime(err)
    }
}
