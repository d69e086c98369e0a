use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid execute payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}
