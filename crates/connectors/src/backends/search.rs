//! Search engine connections.

use async_trait::async_trait;
use elasticsearch::http::transport::{MultiNodeConnectionPool, TransportBuilder};
use elasticsearch::http::Url;
use elasticsearch::Elasticsearch;
use std::any::Any;
use std::sync::Arc;

use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::error::BackendError;
use crate::registry::Backend;

/// Parse a comma separated host list; hosts without a scheme get `http://`.
pub(crate) fn parse_hosts(hosts: &str) -> Result<Vec<Url>, BackendError> {
    let urls = hosts
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(|host| {
            let candidate = if host.contains("://") {
                host.to_string()
            } else {
                format!("http://{host}")
            };
            Url::parse(&candidate).map_err(|e| BackendError::invalid("host", format!("{host}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if urls.is_empty() {
        return Err(BackendError::missing("host"));
    }
    Ok(urls)
}

#[async_trait]
impl Connection for Elasticsearch {
    fn kind(&self) -> &'static str {
        "elasticsearch"
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// `search-engine`: comma separated `host` list, round-robin across nodes.
pub struct ElasticsearchBackend;

#[async_trait]
impl Backend for ElasticsearchBackend {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>, BackendError> {
        let nodes = parse_hosts(&config.require("host")?)?;
        let pool = MultiNodeConnectionPool::round_robin(nodes, None);
        let transport = TransportBuilder::new(pool)
            .build()
            .map_err(BackendError::custom)?;

        Ok(Arc::new(Elasticsearch::new(transport)))
    }
}
