//! Origin allowlist middleware.
//!
//! Every route passes through [`access_control`]. A request whose `Origin`
//! header is on the allowlist gets that origin echoed back in
//! `Access-Control-Allow-Origin`. Requests without an `Origin` header
//! (same-origin browsers, curl, server-to-server) are treated as permitted.
//! Disallowed origins are still served; they just receive no permitting
//! headers, so browsers refuse to hand the response to the calling script.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

/// Origins permitted when no allowlist is configured
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:8080",
    "http://localhost:1234",
    "http://movies.com",
];

/// Methods advertised by the single-movie preflight response
pub const PREFLIGHT_METHODS: &str = "GET, POST, PATCH, DELETE";

/// Fixed set of origins allowed cross-origin access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: origins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Whether a request declaring `origin` may be answered with permitting
    /// headers. A missing origin is always permitted.
    pub fn permits(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.allowed.iter().any(|allowed| allowed == origin),
        }
    }

    /// Decide on the raw header value. Non-UTF-8 origins are never permitted.
    pub fn check(&self, origin: Option<&HeaderValue>) -> OriginCheck {
        let permitted = match origin {
            None => true,
            Some(value) => value
                .to_str()
                .map(|origin| self.permits(Some(origin)))
                .unwrap_or(false),
        };

        OriginCheck {
            origin: origin.cloned(),
            permitted,
        }
    }
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_ORIGINS.iter().copied())
    }
}

/// Outcome of the origin check, stored in request extensions so handlers
/// (the preflight route) can act on it without repeating the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginCheck {
    /// Declared origin, if any
    pub origin: Option<HeaderValue>,
    pub permitted: bool,
}

/// Middleware applying the origin policy to every response
pub async fn access_control(
    State(policy): State<Arc<OriginPolicy>>,
    mut request: Request,
    next: Next,
) -> Response {
    let check = policy.check(request.headers().get(ORIGIN));
    if !check.permitted {
        debug!(
            "Origin {:?} not in allowlist, omitting CORS headers",
            check.origin
        );
    }
    request.extensions_mut().insert(check.clone());

    let mut response = next.run(request).await;

    if let (true, Some(origin)) = (check.permitted, check.origin) {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.append(VARY, HeaderValue::from_static("origin"));
    }

    response
}
