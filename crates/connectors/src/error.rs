use thiserror::Error;

/// Failure while decoding a connection config or building its client.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Config is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config must be a JSON object")]
    NotAnObject,

    #[error("Missing required config field: {0}")]
    MissingField(String),

    #[error("Invalid config field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("MongoDB error: {0}")]
    MongoDb(#[from] mongodb::error::Error),

    #[error("GitHub error: {0}")]
    GitHub(#[from] octocrab::Error),

    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an error raised by a third-party backend.
    pub fn custom(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Custom(Box::new(err))
    }
}

/// Failure resolving a named connection.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Connection {0} does not exist")]
    NotFound(String),

    #[error("Connection {name} uses a not supported connection type: {kind}")]
    UnsupportedType { name: String, kind: String },

    #[error("Could not establish connection {name}")]
    Construction {
        name: String,
        #[source]
        source: BackendError,
    },

    #[error("Connection {name} is not a {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("Connection type already registered: {0}")]
    DuplicateType(String),
}

impl ConnectorError {
    pub fn construction(name: impl Into<String>, source: BackendError) -> Self {
        Self::Construction {
            name: name.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
