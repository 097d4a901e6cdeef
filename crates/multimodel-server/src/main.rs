//! multimodel-mcp
//!
//! MCP server exposing the multimodel query router over stdio.

mod mcp;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use multimodel_core::config::ConfigFile;
use multimodel_core::logging::SharedLogger;
use multimodel_core::{QueryOrchestrator, RouterSettings, ToolGateway, TracingLogger};

/// Query OpenAI, Gemini and Voyage from an MCP host
#[derive(Parser)]
#[command(name = "multimodel-mcp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (default: <config_dir>/multimodel/config.yaml)
    #[arg(short, long, env = "MULTIMODEL_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dotenv file loaded before reading API keys
    #[arg(long, env = "MULTIMODEL_ENV_FILE", default_value = ".env.local", value_name = "FILE")]
    env_file: PathBuf,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "MULTIMODEL_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dotenv = dotenvy::from_path(&cli.env_file);
    init_logging(&cli.log_level)?;
    report_env_file(&cli.env_file, dotenv);

    let settings = load_settings(cli.config.as_deref())?;
    let logger: SharedLogger = Arc::new(TracingLogger::with_component("router"));
    let orchestrator = QueryOrchestrator::from_settings(&settings, Arc::clone(&logger));
    let gateway = Arc::new(ToolGateway::new(Arc::new(orchestrator), logger));

    info!("Multimodel MCP server running");
    mcp::serve_stdio(gateway).await
}

/// Logs go to stderr; stdout carries the protocol
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}

fn report_env_file(path: &Path, result: dotenvy::Result<()>) {
    match result {
        Ok(()) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No env file at {}", path.display()),
        Err(e) => warn!("Failed to load {}: {}", path.display(), e),
    }
}

fn load_settings(path: Option<&Path>) -> Result<RouterSettings> {
    let file = match path {
        Some(path) => ConfigFile::new(path),
        None => ConfigFile::user(),
    };
    let settings = file
        .read()
        .with_context(|| format!("Failed to load config from {}", file.path().display()))?;

    if file.exists() {
        info!("Using config {}", file.path().display());
    }
    Ok(settings)
}
