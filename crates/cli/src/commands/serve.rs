//! Serve command implementation
//!
//! This module implements the `marquee serve` command: load the seed
//! dataset, build the movie service, and serve it over HTTP until Ctrl+C.

use anyhow::{Context, Result};
use marquee_adapters::{HttpServer, ServerConfig};
use marquee_catalog::{seed, MovieService, MovieStore};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "marquee=info,tower_http=info";

/// Arguments for the serve command
pub struct ServeArgs {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed origins; the built-in allowlist when empty
    pub origins: Vec<String>,
    /// Alternative seed dataset
    pub seed: Option<String>,
}

/// Execute the serve command
pub async fn execute_serve_command(args: ServeArgs) -> Result<()> {
    init_tracing();

    let listen_addr = listen_address(&args.host, args.port)?;
    let store = load_store(args.seed.as_deref())?;
    let service = Arc::new(MovieService::new(store));

    let mut config = ServerConfig {
        listen_addr,
        ..ServerConfig::default()
    };
    if !args.origins.is_empty() {
        config.allowed_origins = args.origins;
    }
    info!("Allowed origins: {:?}", config.allowed_origins);

    let server = HttpServer::new(config, service);
    server
        .run(wait_for_shutdown())
        .await
        .context("Movie server failed")?;

    info!("Shutdown complete");
    Ok(())
}

/// Install the global tracing subscriber, honoring `RUST_LOG`
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // a subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load the seed dataset from `path`, or the bundled one
pub fn load_store(path: Option<&str>) -> Result<MovieStore> {
    let store = match path {
        Some(path) => seed::load_from_path(path)
            .with_context(|| format!("Failed to load seed dataset from {}", path))?,
        None => seed::load_default().context("Bundled seed dataset is invalid")?,
    };
    info!("Loaded {} movies", store.len());
    Ok(store)
}

/// Build the listen address with helpful error messages
pub fn listen_address(host: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = host.parse().with_context(|| {
        format!(
            "Invalid host '{}'. Expected an IP address (e.g., 0.0.0.0 or 127.0.0.1)",
            host
        )
    })?;
    Ok(SocketAddr::new(ip, port))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
