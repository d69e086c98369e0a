use connectors::ConnectorError;
use thiserror::Error;

use crate::state_machine::ExecutionState;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Could not read execute payload")]
    InvalidPayload(#[source] serde_json::Error),

    #[error(transparent)]
    Connection(#[from] ConnectorError),

    #[error("Provided action does not exist: {0}")]
    ActionNotFound(String),

    #[error("Provided action {action} is not invocable: {reason}")]
    InvalidAction { action: String, reason: String },

    /// An error raised by the action itself, passed through untouched.
    #[error(transparent)]
    HandlerFault(anyhow::Error),

    #[error("Invalid execution state transition from {from} to {to}")]
    InvalidTransition {
        from: ExecutionState,
        to: ExecutionState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    pub fn invalid_action(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAction {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Classify an error returned by an action.
    ///
    /// Runtime and connector errors the action propagated with `?` keep their
    /// kind; anything else is a handler fault.
    pub fn from_handler(err: anyhow::Error) -> Self {
        let err = match err.downcast::<RuntimeError>() {
            Ok(runtime) => return runtime,
            Err(err) => err,
        };
        match err.downcast::<ConnectorError>() {
            Ok(connector) => Self::Connection(connector),
            Err(err) => Self::HandlerFault(err),
        }
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "invalid_payload",
            Self::Connection(ConnectorError::NotFound(_)) => "connection_not_found",
            Self::Connection(ConnectorError::UnsupportedType { .. }) => "unsupported_connection_type",
            Self::Connection(ConnectorError::Construction { .. }) => "connection_failed",
            Self::Connection(_) => "connection_error",
            Self::ActionNotFound(_) => "action_not_found",
            Self::InvalidAction { .. } => "invalid_action",
            Self::HandlerFault(_) => "handler_fault",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Io(_) => "io_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
