use orchestrator::ExecutionOrchestrator;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AppState {
    pub orchestrator: Arc<ExecutionOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: ExecutionOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}
