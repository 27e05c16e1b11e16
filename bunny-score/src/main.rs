//! bunny-score - Brand registry matching and product scoring service
//!
//! Checks companies against cruelty-free and vegan brand registries and
//! combines that verdict with ingredient-safety and labor-practice data into
//! one product score.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bunny_common::config::{resolve_config_path, TomlConfig};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use bunny_score::{build_router, AppState};

/// Command-line arguments for bunny-score
#[derive(Parser, Debug)]
#[command(name = "bunny-score")]
#[command(about = "Brand registry matching and product scoring service")]
#[command(version)]
struct Args {
    /// Config file (overrides BUNNY_CONFIG and the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides server.host)
    #[arg(long, env = "BUNNY_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long, env = "BUNNY_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let config = TomlConfig::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;

    bunny_common::logging::init_tracing(&config.logging)
        .context("Failed to initialize logging")?;

    info!("Starting bunny-score v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Config: {}", path.display()),
        None => info!("Config: built-in defaults"),
    }

    let state = AppState::from_config(&config).context("Failed to build application state")?;
    for cache in state.registries.iter() {
        info!(
            "Registry {}: {} ({})",
            cache.source().id,
            cache.source().label,
            cache.source().base_url
        );
    }

    let app = build_router(state);

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", host, port))?;
    let addr: SocketAddr = listener.local_addr().context("Listener has no local address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
