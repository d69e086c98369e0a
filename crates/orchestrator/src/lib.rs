//! Single-action execution runtime.
//!
//! An [`ExecutionOrchestrator`] decodes an execute request, hands the
//! action its capabilities (connections, response builder, event and log
//! collectors), invokes it once and assembles the [`ExecutionResult`].
//!
//! [`ExecutionResult`]: worker_core::ExecutionResult

pub mod action;
pub mod error;
pub mod executor;
pub mod process;
pub mod resources;
pub mod response;
pub mod state_machine;

pub use action::{Action, ActionLoader, ActionRegistry, ChainLoader};
pub use error::{Result, RuntimeError};
pub use executor::{ExecutePayload, ExecutionOrchestrator};
pub use process::{ProcessAction, ProcessActionLoader};
pub use resources::ConnectionGuard;
pub use response::{ActionOutput, ResponseBuilder, ResponseNormalizer};
pub use state_machine::{ExecutionState, ExecutionStateMachine};
