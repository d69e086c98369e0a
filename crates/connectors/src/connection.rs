//! The handle type returned by connection resolution.

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

/// A live backend client owned by one execution.
///
/// Implementations hold whatever the backend needs (pools, HTTP clients,
/// driver handles). `close` is awaited once when the execution ends; clients
/// that release their resources on drop can keep the default no-op.
#[async_trait]
pub trait Connection: Any + Send + Sync {
    /// Short label used in logs and type-mismatch errors
    fn kind(&self) -> &'static str;

    async fn close(&self) {}

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl std::fmt::Debug for dyn Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("kind", &self.kind())
            .finish()
    }
}
