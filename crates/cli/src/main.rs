use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orchestrator::{ExecutionOrchestrator, ProcessActionLoader, RuntimeError};
use serde_json::Value;
use server::config::{WorkerConfig, DEFAULT_CONFIG_FILE};
use server::{create_router, state::AppState};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "action-worker")]
#[command(about = "Runs single actions from the command line or over HTTP", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve actions over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,

        /// Directory holding the action executables
        #[arg(long)]
        actions: Option<PathBuf>,
    },
    /// Run one action and print its result as JSON
    Execute {
        action: String,

        /// Execute request file, `-` for stdin
        #[arg(long, default_value = "-")]
        payload: String,

        #[arg(long)]
        actions: Option<PathBuf>,
    },
    /// Print runtime identification
    About,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = WorkerConfig::load(&cli.config)
        .await
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    init_tracing(&config);

    match cli.command {
        Commands::Serve {
            host,
            port,
            actions,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(actions) = actions {
                config.actions.dir = actions;
            }
            serve(&config).await
        }
        Commands::Execute {
            action,
            payload,
            actions,
        } => {
            let dir = actions.unwrap_or(config.actions.dir);
            execute(&dir, &action, &payload).await
        }
        Commands::About => {
            let about =
                ExecutionOrchestrator::new(ProcessActionLoader::new(&config.actions.dir)).get();
            println!("{}", serde_json::to_string_pretty(&about)?);
            Ok(())
        }
    }
}

fn init_tracing(config: &WorkerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter));

    // stdout is reserved for `execute` output
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn orchestrator(actions_dir: &Path) -> ExecutionOrchestrator {
    if !actions_dir.is_dir() {
        tracing::warn!(dir = %actions_dir.display(), "Actions directory does not exist");
    }
    ExecutionOrchestrator::new(ProcessActionLoader::new(actions_dir))
}

async fn serve(config: &WorkerConfig) -> Result<()> {
    let state = AppState::new(orchestrator(&config.actions.dir));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    tracing::info!(
        actions = %config.actions.dir.display(),
        "Server listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn execute(actions_dir: &Path, action: &str, payload: &str) -> Result<()> {
    let raw = if payload == "-" {
        let mut buffer = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buffer)
            .await
            .context("Failed to read payload from stdin")?;
        buffer
    } else {
        tokio::fs::read(payload)
            .await
            .with_context(|| format!("Failed to read payload from {payload}"))?
    };

    let payload: Value = serde_json::from_slice(&raw).map_err(RuntimeError::InvalidPayload)?;

    let result = orchestrator(actions_dir).run(action, payload).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
