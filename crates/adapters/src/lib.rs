//! Protocol adapters (HTTP)
//!
//! This crate exposes the movie catalog over HTTP: the axum routes, the
//! origin allowlist middleware applied to all of them, and the server that
//! binds them to a socket.

pub mod access_control;
pub mod error;
pub mod http_server;
pub mod movie_router;

pub use access_control::{OriginCheck, OriginPolicy, DEFAULT_ALLOWED_ORIGINS, PREFLIGHT_METHODS};
pub use error::ApiError;
pub use http_server::{HttpServer, ServerConfig, DEFAULT_PORT};
pub use movie_router::router;
