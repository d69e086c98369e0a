//! Registry of connection backends keyed by their type tag.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::{
    ElasticsearchBackend, GitHubBackend, HttpBackend, MongoDbBackend, SqlBackend, SqlDsnBackend,
};
use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::error::{BackendError, ConnectorError, Result};

/// Stable connection type tags.
pub mod tags {
    pub const SQL: &str = "relational-db-simple";
    pub const SQL_DSN: &str = "relational-db-dsn";
    pub const HTTP: &str = "http-client";
    pub const MONGODB: &str = "document-store";
    pub const ELASTICSEARCH: &str = "search-engine";
    pub const GITHUB: &str = "github";

    /// Namespaced tags sent by existing orchestrators; they map to the same backends.
    pub mod legacy {
        pub const SQL: &str = "Fusio.Adapter.Sql.Connection.Sql";
        pub const SQL_DSN: &str = "Fusio.Adapter.Sql.Connection.SqlAdvanced";
        pub const HTTP: &str = "Fusio.Adapter.Http.Connection.Http";
        pub const MONGODB: &str = "Fusio.Adapter.Mongodb.Connection.MongoDB";
        pub const ELASTICSEARCH: &str = "Fusio.Adapter.Elasticsearch.Connection.Elasticsearch";
    }
}

/// Builds a client for one connection type.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn connect(&self, config: &ConnectionConfig) -> std::result::Result<Arc<dyn Connection>, BackendError>;
}

/// Maps type tags to backends.
///
/// Built once by the host and shared read-only by every execution.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn Backend>>,
}

impl BackendRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in backend under its short and legacy tags
    pub fn with_defaults() -> Self {
        let sql: Arc<dyn Backend> = Arc::new(SqlBackend);
        let sql_dsn: Arc<dyn Backend> = Arc::new(SqlDsnBackend);
        let http: Arc<dyn Backend> = Arc::new(HttpBackend);
        let mongodb: Arc<dyn Backend> = Arc::new(MongoDbBackend);
        let elasticsearch: Arc<dyn Backend> = Arc::new(ElasticsearchBackend);

        let entries: [(&str, Arc<dyn Backend>); 11] = [
            (tags::SQL, sql.clone()),
            (tags::legacy::SQL, sql),
            (tags::SQL_DSN, sql_dsn.clone()),
            (tags::legacy::SQL_DSN, sql_dsn),
            (tags::HTTP, http.clone()),
            (tags::legacy::HTTP, http),
            (tags::MONGODB, mongodb.clone()),
            (tags::legacy::MONGODB, mongodb),
            (tags::ELASTICSEARCH, elasticsearch.clone()),
            (tags::legacy::ELASTICSEARCH, elasticsearch),
            (tags::GITHUB, Arc::new(GitHubBackend)),
        ];

        Self {
            backends: entries
                .into_iter()
                .map(|(tag, backend)| (tag.to_string(), backend))
                .collect(),
        }
    }

    /// Register a backend under a new tag. Existing tags are never replaced.
    pub fn register(&mut self, tag: impl Into<String>, backend: impl Backend + 'static) -> Result<()> {
        let tag = tag.into();
        if self.backends.contains_key(&tag) {
            return Err(ConnectorError::DuplicateType(tag));
        }
        self.backends.insert(tag, Arc::new(backend));
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, tag: impl Into<String>, backend: impl Backend + 'static) -> Result<Self> {
        self.register(tag, backend)?;
        Ok(self)
    }

    pub fn get(&self, tag: &str) -> Option<Arc<dyn Backend>> {
        self.backends.get(tag).cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.backends.contains_key(tag)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.backends.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
