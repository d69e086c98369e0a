use connectors::{BackendRegistry, ConnectionFactory};
use events::{EventCollector, LogCollector};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;
use worker_core::{About, ExecuteRequest, ExecutionResult};

use crate::action::ActionLoader;
use crate::error::{Result, RuntimeError};
use crate::resources::ConnectionGuard;
use crate::response::{ResponseBuilder, ResponseNormalizer};
use crate::state_machine::{ExecutionState, ExecutionStateMachine};

/// Input of one execution.
#[derive(Debug, Clone)]
pub enum ExecutePayload {
    /// Undecoded JSON as received from the caller
    Raw(Value),
    Decoded(ExecuteRequest),
}

impl From<Value> for ExecutePayload {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

impl From<ExecuteRequest> for ExecutePayload {
    fn from(request: ExecuteRequest) -> Self {
        Self::Decoded(request)
    }
}

impl ExecutePayload {
    fn decode(self) -> Result<ExecuteRequest> {
        match self {
            Self::Raw(value) => serde_json::from_value(value).map_err(RuntimeError::InvalidPayload),
            Self::Decoded(request) => Ok(request),
        }
    }
}

struct ExecutionTracker {
    state: ExecutionState,
}

impl ExecutionTracker {
    fn new() -> Self {
        Self {
            state: ExecutionState::Received,
        }
    }

    fn advance(&mut self, to: ExecutionState) -> Result<()> {
        ExecutionStateMachine::validate_transition(&self.state, &to)?;
        debug!(from = %self.state, to = %to, "Execution state transition");
        self.state = to;
        Ok(())
    }

    /// Moves to `Errored` unless already terminal and hands the error back.
    fn fail(&mut self, err: RuntimeError) -> RuntimeError {
        if !self.state.is_terminal() {
            debug!(from = %self.state, kind = err.kind(), "Execution errored");
            self.state = ExecutionState::Errored;
        }
        err
    }
}

/// Runs actions, one isolated execution per call.
///
/// Concurrent runs share only the backend registry and the action loader.
#[derive(Clone)]
pub struct ExecutionOrchestrator {
    registry: Arc<BackendRegistry>,
    loader: Arc<dyn ActionLoader>,
}

impl ExecutionOrchestrator {
    /// Orchestrator with every built-in connection backend.
    pub fn new(loader: impl ActionLoader + 'static) -> Self {
        Self::from_parts(Arc::new(BackendRegistry::with_defaults()), Arc::new(loader))
    }

    pub fn from_parts(registry: Arc<BackendRegistry>, loader: Arc<dyn ActionLoader>) -> Self {
        Self { registry, loader }
    }

    pub fn with_registry(mut self, registry: BackendRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Runtime identification.
    pub fn get(&self) -> About {
        About::current()
    }

    /// Execute `action` against `payload`.
    ///
    /// Connections the action resolved are closed before this returns,
    /// whether the action succeeded or not.
    pub async fn run(
        &self,
        action: &str,
        payload: impl Into<ExecutePayload>,
    ) -> Result<ExecutionResult> {
        let execution_id = Uuid::new_v4();
        let span = info_span!("execution", execution_id = %execution_id, action = %action);

        self.execute(execution_id, action, payload.into())
            .instrument(span)
            .await
    }

    async fn execute(
        &self,
        execution_id: Uuid,
        action: &str,
        payload: ExecutePayload,
    ) -> Result<ExecutionResult> {
        let mut tracker = ExecutionTracker::new();

        let request = match payload.decode() {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, "Invalid execute payload");
                return Err(tracker.fail(e));
            }
        };
        tracker.advance(ExecutionState::Decoded)?;

        let factory = ConnectionFactory::new(
            request.connections.clone().unwrap_or_default(),
            self.registry.clone(),
        );
        let guard = ConnectionGuard::new(execution_id, factory);
        let events = EventCollector::new();
        let logs = LogCollector::new();
        let response = ResponseBuilder::new();
        tracker.advance(ExecutionState::Ready)?;

        let handler = match self.loader.load(action).await {
            Ok(handler) => handler,
            Err(e) => {
                error!(error = %e, "Failed to load action");
                guard.release().await;
                return Err(tracker.fail(e));
            }
        };
        tracker.advance(ExecutionState::Invoking)?;

        info!(
            connections = request.connection_names().len(),
            "Invoking action"
        );

        let output = handler
            .handle(
                &request.request,
                &request.context,
                guard.factory(),
                &response,
                &events,
                &logs,
            )
            .await;

        guard.release().await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                let err = RuntimeError::from_handler(e);
                error!(kind = err.kind(), error = %err, "Action failed");
                return Err(tracker.fail(err));
            }
        };
        tracker.advance(ExecutionState::Normalizing)?;

        let result = ExecutionResult {
            events: events.drain(),
            logs: logs.drain(),
            response: ResponseNormalizer::normalize(output),
        };
        tracker.advance(ExecutionState::Completed)?;

        info!(
            status = result.response.status_code,
            events = result.events.len(),
            logs = result.logs.len(),
            "Action completed"
        );

        Ok(result)
    }
}

impl std::fmt::Debug for ExecutionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionOrchestrator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
