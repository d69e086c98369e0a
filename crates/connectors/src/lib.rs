//! Connection resolution for action executions.
//!
//! - [`ConnectionFactory`] - resolves and caches the named connections of one execution
//! - [`BackendRegistry`] - maps connection type tags to [`Backend`] constructors
//! - [`Connection`] - the handle every backend produces
//! - [`ConnectionConfig`] - decoded base64 JSON connection config

pub mod backends;
mod config;
mod connection;
mod error;
mod factory;
mod registry;

pub use backends::{DocumentStore, HttpClient};
pub use config::ConnectionConfig;
pub use connection::Connection;
pub use error::{BackendError, ConnectorError, Result};
pub use factory::ConnectionFactory;
pub use registry::{tags, Backend, BackendRegistry};

// Client types handed out by the built-in backends.
pub use elasticsearch::Elasticsearch;
pub use octocrab::Octocrab;
pub use sqlx::AnyPool;
