//! Per-execution connection resolution and caching.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use worker_core::ConnectionDescriptor;

use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::error::{ConnectorError, Result};
use crate::registry::BackendRegistry;

/// Resolves the connections of one execution.
///
/// Each name is constructed at most once; later lookups return the same
/// `Arc`. Instances live until [`close`](Self::close) is called.
pub struct ConnectionFactory {
    descriptors: BTreeMap<String, ConnectionDescriptor>,
    registry: Arc<BackendRegistry>,
    instances: Mutex<HashMap<String, Arc<dyn Connection>>>,
}

impl ConnectionFactory {
    pub fn new(
        descriptors: BTreeMap<String, ConnectionDescriptor>,
        registry: Arc<BackendRegistry>,
    ) -> Self {
        Self {
            descriptors,
            registry,
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// A factory without any connections
    pub fn empty(registry: Arc<BackendRegistry>) -> Self {
        Self::new(BTreeMap::new(), registry)
    }

    /// Resolve a connection by name, constructing it on first use.
    pub async fn resolve(&self, name: &str) -> Result<Arc<dyn Connection>> {
        // Held across construction so concurrent lookups of one name build once.
        let mut instances = self.instances.lock().await;

        if let Some(instance) = instances.get(name) {
            return Ok(instance.clone());
        }

        let descriptor = self
            .descriptors
            .get(name)
            .ok_or_else(|| ConnectorError::NotFound(name.to_string()))?;

        let backend = self.registry.get(&descriptor.kind).ok_or_else(|| {
            ConnectorError::UnsupportedType {
                name: name.to_string(),
                kind: descriptor.kind.clone(),
            }
        })?;

        let config = ConnectionConfig::decode(descriptor.config.as_deref())
            .map_err(|e| ConnectorError::construction(name, e))?;

        debug!(connection = %name, kind = %descriptor.kind, "Constructing connection");

        let instance = backend.connect(&config).await.map_err(|e| {
            warn!(connection = %name, kind = %descriptor.kind, error = %e, "Connection construction failed");
            ConnectorError::construction(name, e)
        })?;

        info!(connection = %name, kind = instance.kind(), "Connection established");

        instances.insert(name.to_string(), instance.clone());
        Ok(instance)
    }

    /// Resolve a connection and downcast it to its concrete client type.
    pub async fn resolve_as<T>(&self, name: &str) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let instance = self.resolve(name).await?;
        instance
            .into_any()
            .downcast::<T>()
            .map_err(|_| ConnectorError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Names of every connection this execution may resolve
    pub fn names(&self) -> Vec<String> {
        self.descriptors.keys().cloned().collect()
    }

    /// Number of connections constructed so far
    pub async fn resolved_count(&self) -> usize {
        self.instances.lock().await.len()
    }

    /// Close every constructed connection and empty the cache.
    ///
    /// Safe to call more than once.
    pub async fn close(&self) {
        let instances = std::mem::take(&mut *self.instances.lock().await);

        for (name, instance) in instances {
            debug!(connection = %name, kind = instance.kind(), "Closing connection");
            instance.close().await;
        }
    }
}

impl std::fmt::Debug for ConnectionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionFactory")
            .field("connections", &self.names())
            .finish()
    }
}
