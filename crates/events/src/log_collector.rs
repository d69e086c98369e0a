//! Log collector handed to actions

use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;
use worker_core::{LogEntry, LogLevel};

/// Ordered record of log lines an action wrote.
///
/// Levels carry no filtering here: every line is kept. Lines are mirrored to
/// `tracing` under the `action` target so the host can see them too.
#[derive(Default)]
pub struct LogCollector {
    logs: Mutex<Vec<LogEntry>>,
}

impl LogCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emergency(&self, message: impl Into<String>) {
        self.log(LogLevel::Emergency, message);
    }

    pub fn alert(&self, message: impl Into<String>) {
        self.log(LogLevel::Alert, message);
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::Critical, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn notice(&self, message: impl Into<String>) {
        self.log(LogLevel::Notice, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry::new(level, message);
        debug!(target: "action", level = %entry.level, "{}", entry.message);
        self.lock().push(entry);
    }

    /// Everything logged so far, in order. The collector keeps its contents.
    pub fn drain(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.logs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LogCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogCollector")
            .field("log_count", &self.len())
            .finish()
    }
}
