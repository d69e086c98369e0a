use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "action-worker.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// Where process actions live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    pub dir: PathBuf,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("actions"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Worker configuration, read from a TOML file.
///
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 8080
///
/// [actions]
/// dir = "/srv/actions"
///
/// [log]
/// filter = "info,orchestrator=debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub server: ServerConfig,
    pub actions: ActionsConfig,
    pub log: LogConfig,
}

impl WorkerConfig {
    /// Read config from `path`. A missing file yields the defaults.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file does not exist, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "Config loaded successfully");
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = WorkerConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:3001");
        assert_eq!(config.actions.dir, PathBuf::from("actions"));
        assert_eq!(config.log.filter, "info");
    }

    #[tokio::test]
    async fn test_config_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let config = WorkerConfig::load(&temp_dir.path().join(DEFAULT_CONFIG_FILE))
            .await
            .unwrap();
        assert_eq!(config, WorkerConfig::default());
    }

    #[tokio::test]
    async fn test_config_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[server]\nport = 8080\n\n[actions]\ndir = \"/srv/actions\"\n")
            .unwrap();

        let config = WorkerConfig::load(&path).await.unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.actions.dir, PathBuf::from("/srv/actions"));
        assert_eq!(config.log.filter, "info");
    }

    #[tokio::test]
    async fn test_config_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = WorkerConfig::load(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
