//! Per-execution side-effect collectors.
//!
//! An action receives one [`EventCollector`] and one [`LogCollector`] per
//! execution. Both are append-only and keep insertion order; draining them
//! never clears what was recorded.

mod event_collector;
mod log_collector;

pub use event_collector::EventCollector;
pub use log_collector::LogCollector;
pub use worker_core::{Event, LogEntry, LogLevel};
