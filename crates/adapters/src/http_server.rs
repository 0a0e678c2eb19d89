//! HTTP server.
//!
//! Binds the movie router to a TCP listener and serves it until the provided
//! shutdown future resolves.

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use marquee_catalog::MovieService;
use tokio::net::TcpListener;
use tracing::info;

use crate::access_control::{OriginPolicy, DEFAULT_ALLOWED_ORIGINS};
use crate::movie_router;

/// Port used when none is configured
pub const DEFAULT_PORT: u16 = 1234;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on
    pub listen_addr: SocketAddr,
    /// Origins granted cross-origin access
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        }
    }
}

/// HTTP front end for a [`MovieService`].
pub struct HttpServer {
    config: ServerConfig,
    service: Arc<MovieService>,
}

impl HttpServer {
    /// Creates a new [`HttpServer`] serving `service` with the given configuration.
    pub fn new(config: ServerConfig, service: Arc<MovieService>) -> Self {
        Self { config, service }
    }

    /// Access the configuration associated with this server.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn service(&self) -> &Arc<MovieService> {
        &self.service
    }

    /// The complete application router.
    pub fn router(&self) -> Router {
        movie_router::router(
            Arc::clone(&self.service),
            OriginPolicy::new(self.config.allowed_origins.iter().cloned()),
        )
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.listen_addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.config.listen_addr))?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr().context("Listener has no local address")?;
        info!(
            "Server listening on port {} ({} movies loaded)",
            local_addr.port(),
            self.service.len()
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server terminated with an error")?;

        info!("Server on {} stopped", local_addr);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr.port(), DEFAULT_PORT);
        assert_eq!(config.allowed_origins.len(), DEFAULT_ALLOWED_ORIGINS.len());
    }

    #[tokio::test]
    async fn test_serves_over_tcp_and_shuts_down() {
        let service = Arc::new(MovieService::from_default_seed().unwrap());
        let server = HttpServer::new(ServerConfig::default(), service);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(
                b"GET /movies/nope HTTP/1.1\r\nHost: localhost\r\nOrigin: http://movies.com\r\nConnection: close\r\n\r\n",
            )
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();

        assert!(raw.starts_with("HTTP/1.1 404"), "unexpected response: {}", raw);
        assert!(raw.to_ascii_lowercase().contains("access-control-allow-origin: http://movies.com"));
        assert!(raw.contains("Movie not found"));

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
