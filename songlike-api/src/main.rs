//! songlike-api - Song identification and "like" service
//!
//! Receives `{videoUrl, accessToken}` from the browser extension, identifies
//! the song via link lookup or audio recognition, and saves it to the user's
//! liked songs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songlike_api::config::{load_env_file, CliOverrides, EnvFileStatus, ServiceConfig};
use songlike_api::{build_router, AppState};
use songlike_common::config::{default_config_path, load_toml_config};

/// Command-line arguments for songlike-api
#[derive(Parser, Debug)]
#[command(name = "songlike-api")]
#[command(about = "Identify the song in a video and add it to liked songs")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "SONGLIKE_HOST")]
    host: Option<String>,

    /// TOML configuration file
    #[arg(short, long, env = "SONGLIKE_CONFIG")]
    config: Option<PathBuf>,

    /// `.env` file loaded before anything else
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Must run before clap so `.env` values can satisfy `env = ...` args.
    // The path itself can only come from the command line.
    let env_file = env_file_from_args();
    let env_status = load_env_file(&env_file);

    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => Default::default(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                let level = &toml_config.logging.level;
                format!("songlike_api={level},songlike_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting songlike-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &env_status {
        EnvFileStatus::Loaded => info!("Loaded environment from {}", env_file.display()),
        EnvFileStatus::Missing => {}
        EnvFileStatus::Invalid(e) => warn!("Ignoring {}: {}", env_file.display(), e),
    }
    match &config_path {
        Some(path) if path.exists() => info!("Config file: {}", path.display()),
        Some(path) => warn!("Config file not found at {}, using defaults", path.display()),
        None => warn!("No config directory on this platform, using defaults"),
    }

    let cli = CliOverrides {
        host: args.host.clone(),
        port: args.port,
    };
    let config = ServiceConfig::resolve(&cli, &toml_config).context("Invalid configuration")?;
    info!("Configuration: {:?}", config);

    std::fs::create_dir_all(&config.work_dir).with_context(|| {
        format!("Failed to create work directory {}", config.work_dir.display())
    })?;

    let state = AppState::from_config(&config).context("Failed to initialize clients")?;
    let app = build_router(state);

    let bind_addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// `--env-file <path>` / `--env-file=<path>` from raw arguments, else `.env`
fn env_file_from_args() -> PathBuf {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--env-file" {
            if let Some(path) = args.next() {
                return PathBuf::from(path);
            }
        } else if let Some(path) = arg.strip_prefix("--env-file=") {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(".env")
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
