//! Document store connections scoped to one MongoDB database.

use async_trait::async_trait;
use mongodb::{Client, Database};
use std::any::Any;
use std::sync::Arc;

use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::error::BackendError;
use crate::registry::Backend;

/// A MongoDB client together with the database the connection is scoped to.
///
/// The driver tears its monitors down when the last handle is dropped.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    client: Client,
    database: Database,
}

impl DocumentStore {
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> mongodb::Collection<T> {
        self.database.collection(name)
    }
}

#[async_trait]
impl Connection for DocumentStore {
    fn kind(&self) -> &'static str {
        "mongodb"
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// `document-store`: `url` and `database`.
pub struct MongoDbBackend;

#[async_trait]
impl Backend for MongoDbBackend {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>, BackendError> {
        let url = config.require("url")?;
        let database = config.require("database")?;

        let client = Client::with_uri_str(&url).await?;
        let database = client.database(&database);

        Ok(Arc::new(DocumentStore { client, database }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> ConnectionConfig {
        match value {
            serde_json::Value::Object(map) => ConnectionConfig::new(map),
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_requires_database() {
        let err = MongoDbBackend
            .connect(&config(json!({"url": "mongodb://localhost:27017"})))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::MissingField(ref f) if f == "database"));
    }

    #[tokio::test]
    async fn test_rejects_malformed_url() {
        let err = MongoDbBackend
            .connect(&config(json!({"url": "localhost:27017", "database": "app"})))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::MongoDb(_)));
    }
}
