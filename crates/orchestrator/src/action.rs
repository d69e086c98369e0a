//! The action contract and in-process action loading.

use async_trait::async_trait;
use connectors::ConnectionFactory;
use events::{EventCollector, LogCollector};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use worker_core::ActionRequest;

use crate::error::{Result, RuntimeError};
use crate::response::{ActionOutput, ResponseBuilder};

/// An action handler, invoked once per execution.
///
/// The capabilities are owned by the execution and only valid for the
/// duration of the call.
#[async_trait]
pub trait Action: Send + Sync {
    async fn handle(
        &self,
        request: &ActionRequest,
        context: &Value,
        connections: &ConnectionFactory,
        response: &ResponseBuilder,
        events: &EventCollector,
        logs: &LogCollector,
    ) -> anyhow::Result<ActionOutput>;
}

/// Locates the action an execution should invoke.
#[async_trait]
pub trait ActionLoader: Send + Sync {
    /// Returns `ActionNotFound` when nothing is registered under `action`
    /// and `InvalidAction` when it exists but cannot be invoked.
    async fn load(&self, action: &str) -> Result<Arc<dyn Action>>;
}

/// Actions compiled into the host, looked up by name.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action, replacing any previous one under the same name.
    pub fn register(&mut self, name: impl Into<String>, action: impl Action + 'static) {
        self.actions.insert(name.into(), Arc::new(action));
    }

    pub fn with(mut self, name: impl Into<String>, action: impl Action + 'static) -> Self {
        self.register(name, action);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[async_trait]
impl ActionLoader for ActionRegistry {
    async fn load(&self, action: &str) -> Result<Arc<dyn Action>> {
        self.actions
            .get(action)
            .cloned()
            .ok_or_else(|| RuntimeError::ActionNotFound(action.to_string()))
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

/// Tries each loader in turn; the first one that does not report
/// `ActionNotFound` wins.
#[derive(Default)]
pub struct ChainLoader {
    loaders: Vec<Arc<dyn ActionLoader>>,
}

impl ChainLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, loader: impl ActionLoader + 'static) -> Self {
        self.loaders.push(Arc::new(loader));
        self
    }
}

#[async_trait]
impl ActionLoader for ChainLoader {
    async fn load(&self, action: &str) -> Result<Arc<dyn Action>> {
        for loader in &self.loaders {
            match loader.load(action).await {
                Err(RuntimeError::ActionNotFound(_)) => continue,
                other => return other,
            }
        }
        Err(RuntimeError::ActionNotFound(action.to_string()))
    }
}
