//! Pager - service health pager with timed escalation.
//!
//! Main entry point for the pager CLI and API server.

mod cli;
mod register;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pager_api::{ApiConfig, ApiServer, AppState};
use pager_config::{Config, ConfigLoader, ConfigValidator};
use pager_core::PagerService;
use pager_timer::TokioTimerService;

use crate::cli::{Cli, Commands};

/// Pager data directory (`~/.pager`).
fn pager_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".pager"))
        .unwrap_or_else(|| PathBuf::from(".pager"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.pager/logs/ with daily rotation.
fn init_tracing() -> Result<()> {
    let log_dir = pager_dir().join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pager")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes buffered lines on drop and must live as long as the process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.starts_server() {
        init_tracing()?;
    }

    match cli.command {
        None => run_server(&cli.config, None, None).await,
        Some(Commands::Run { host, port }) => run_server(&cli.config, host, port).await,
        Some(Commands::CheckConfig) => check_config(&cli.config),
        Some(Commands::Services) => list_services(&cli.config),
    }
}

/// Load and validate the configuration, logging warnings.
fn load_config(path: &Path) -> Result<Config> {
    let config = ConfigLoader::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;

    let result = ConfigValidator::validate(&config);
    for warning in &result.warnings {
        warn!("Config: {}", warning);
    }
    if !result.is_valid() {
        for err in &result.errors {
            error!("Config: {}", err);
        }
        bail!("configuration has {} error(s)", result.errors.len());
    }

    Ok(config)
}

/// Run the API server in foreground until Ctrl-C.
async fn run_server(config_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    info!("Starting pager v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let persistence = register::build_persistence(&config.storage, &pager_dir()).await?;
    let pager = Arc::new(PagerService::new().with_persistence(persistence));

    let timer = Arc::new(TokioTimerService::new());
    register::register_services(&pager, &config, timer.clone())?;
    pager.restore().await;

    let api_config = ApiConfig::new(config.server.host.clone(), config.server.port);
    let server = ApiServer::new(api_config, Arc::new(AppState::new(pager)));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
        info!("Shutdown requested");
    };

    let served = server.run(shutdown).await;
    timer.cancel_all();
    served.map_err(|e| anyhow::anyhow!("API server failed: {}", e))?;

    info!("Pager stopped");
    Ok(())
}

/// Print validation results. Exits non-zero when the file has errors.
fn check_config(config_path: &Path) -> Result<()> {
    let config = ConfigLoader::load(config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;
    let result = ConfigValidator::validate(&config);

    for warning in &result.warnings {
        println!("warning: {}", warning);
    }
    for err in &result.errors {
        println!("error: {}", err);
    }

    if !result.is_valid() {
        bail!("{} has {} error(s)", config_path.display(), result.errors.len());
    }

    println!(
        "{} is valid ({} target(s), {} service(s))",
        config_path.display(),
        config.targets.len(),
        config.services.len()
    );
    Ok(())
}

/// Print each service with its escalation levels.
fn list_services(config_path: &Path) -> Result<()> {
    let config = ConfigLoader::load(config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;
    let result = ConfigValidator::validate(&config);
    for err in &result.errors {
        eprintln!("error: {}", err);
    }
    if !result.is_valid() {
        bail!("{} has {} error(s)", config_path.display(), result.errors.len());
    }

    if config.services.is_empty() {
        println!("No services configured");
        return Ok(());
    }

    println!(
        "Acknowledgment timeout: {}s",
        config.escalation.ack_timeout_secs
    );
    for service in &config.services {
        println!("{}", service.id);
        if service.levels.is_empty() {
            println!("  (no escalation levels)");
        }
        for (n, level) in service.levels.iter().enumerate() {
            println!("  level {}: {}", n, level.join(", "));
        }
    }
    Ok(())
}
