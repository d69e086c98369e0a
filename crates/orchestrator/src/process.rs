//! Actions implemented as external executables.
//!
//! The executable receives one JSON document on stdin:
//!
//! ```json
//! {"request": {...}, "context": {...}, "connections": ["db", "api"]}
//! ```
//!
//! and writes JSON lines to stdout, each one an event, a log line or the
//! response:
//!
//! ```json
//! {"type": "event", "name": "order.created", "data": {"id": 1}}
//! {"type": "log", "level": "INFO", "message": "created order"}
//! {"type": "response", "statusCode": 201, "headers": {}, "body": {"id": 1}}
//! ```
//!
//! A non-zero exit status is a handler fault.

use anyhow::{anyhow, bail, Context as _};
use async_trait::async_trait;
use connectors::ConnectionFactory;
use events::{EventCollector, LogCollector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};
use worker_core::{ActionRequest, LogLevel, ResponseEnvelope};

use crate::action::{Action, ActionLoader};
use crate::error::{Result, RuntimeError};
use crate::response::{ActionOutput, ResponseBuilder};

#[derive(Serialize)]
struct ProcessInput<'a> {
    request: &'a ActionRequest,
    context: &'a Value,
    connections: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ProcessMessage {
    Event {
        name: String,
        #[serde(default)]
        data: Value,
    },
    Log {
        level: LogLevel,
        message: String,
    },
    Response(ResponseEnvelope),
}

/// Loads actions from executables in a directory, addressed by file name.
#[derive(Debug, Clone)]
pub struct ProcessActionLoader {
    root: PathBuf,
}

impl ProcessActionLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Only plain file names resolve; anything that could leave the root does not.
    fn locate(&self, action: &str) -> Option<PathBuf> {
        let valid = !action.is_empty()
            && action != "."
            && action != ".."
            && !action.contains(['/', '\\']);
        valid.then(|| self.root.join(action))
    }
}

#[async_trait]
impl ActionLoader for ProcessActionLoader {
    async fn load(&self, action: &str) -> Result<Arc<dyn Action>> {
        let path = self
            .locate(action)
            .ok_or_else(|| RuntimeError::ActionNotFound(action.to_string()))?;

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RuntimeError::ActionNotFound(action.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        if !metadata.is_file() {
            return Err(RuntimeError::invalid_action(action, "not a regular file"));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if metadata.permissions().mode() & 0o111 == 0 {
                return Err(RuntimeError::invalid_action(action, "file is not executable"));
            }
        }

        debug!(action = %action, path = %path.display(), "Process action located");
        Ok(Arc::new(ProcessAction { path }))
    }
}

/// One executable action.
#[derive(Debug, Clone)]
pub struct ProcessAction {
    path: PathBuf,
}

impl ProcessAction {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Action for ProcessAction {
    async fn handle(
        &self,
        request: &ActionRequest,
        context: &Value,
        connections: &ConnectionFactory,
        _response: &ResponseBuilder,
        events: &EventCollector,
        logs: &LogCollector,
    ) -> anyhow::Result<ActionOutput> {
        let input = serde_json::to_vec(&ProcessInput {
            request,
            context,
            connections: connections.names(),
        })?;

        let mut child = Command::new(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to start {}", self.path.display()))?;

        // Written from a separate task so a child that talks before reading
        // cannot deadlock against a full pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&input).await {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        warn!(error = %e, "Failed to write action input");
                    }
                }
            })
        });

        let output = child.wait_with_output().await?;
        if let Some(writer) = writer {
            writer.await.ok();
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "action {} exited with {}: {}",
                self.path.display(),
                output.status,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8(output.stdout).context("action output is not UTF-8")?;
        let mut result = ActionOutput::None;

        for (index, line) in stdout.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let message: ProcessMessage = serde_json::from_str(line)
                .map_err(|e| anyhow!("invalid action output on line {}: {e}", index + 1))?;

            match message {
                ProcessMessage::Event { name, data } => events.record(name, data),
                ProcessMessage::Log { level, message } => logs.log(level, message),
                ProcessMessage::Response(response) => result = ActionOutput::Response(response),
            }
        }

        Ok(result)
    }
}
