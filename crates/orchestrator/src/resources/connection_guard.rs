//! RAII guard for the connections of one execution.
//!
//! Connections resolved by an action must be torn down whether the action
//! succeeded, failed or panicked.

use connectors::ConnectionFactory;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Owns the connection factory of one execution.
///
/// Call [`release`](Self::release) on every path that can await. If the
/// guard is dropped without it, closing is spawned onto the current Tokio
/// runtime.
///
/// # Example
///
/// ```ignore
/// let guard = ConnectionGuard::new(execution_id, factory);
/// let output = action.handle(&request, &context, guard.factory(), ...).await;
/// guard.release().await;
/// ```
pub struct ConnectionGuard {
    execution_id: Uuid,
    factory: Arc<ConnectionFactory>,
    released: bool,
}

impl ConnectionGuard {
    pub fn new(execution_id: Uuid, factory: ConnectionFactory) -> Self {
        Self {
            execution_id,
            factory: Arc::new(factory),
            released: false,
        }
    }

    pub fn factory(&self) -> &ConnectionFactory {
        &self.factory
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Close every connection the execution constructed.
    pub async fn release(mut self) {
        debug!(execution_id = %self.execution_id, "Releasing connections");
        self.factory.close().await;
        self.released = true;
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        warn!(
            execution_id = %self.execution_id,
            "Connection guard dropped without release"
        );

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let factory = self.factory.clone();
                handle.spawn(async move { factory.close().await });
            }
            Err(_) => warn!(
                execution_id = %self.execution_id,
                "No runtime available, connections are dropped without closing"
            ),
        }
    }
}
