//! # CORS
//!
//! Per-request CORS header selection. Local development origins get a
//! wildcard header set; every other request gets the header set scoped to
//! the production storefront. Preflight requests are answered here and never
//! reach a handler.

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";

/// Which CORS header set was selected for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorsMode {
    /// `Access-Control-Allow-Origin: *`
    Development,
    /// `Access-Control-Allow-Origin: <storefront origin>`
    Production,
}

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origin: HeaderValue,
    allow_localhost: bool,
}

impl CorsPolicy {
    /// `allow_localhost = false` always answers with the production header set.
    pub fn new(allowed_origin: &str, allow_localhost: bool) -> anyhow::Result<Self> {
        let allowed_origin = HeaderValue::from_str(allowed_origin)
            .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {:?}", allowed_origin))?;

        Ok(Self {
            allowed_origin,
            allow_localhost,
        })
    }

    pub fn mode_for(&self, origin: Option<&str>) -> CorsMode {
        match origin {
            Some(origin) if self.allow_localhost && is_local_origin(origin) => CorsMode::Development,
            _ => CorsMode::Production,
        }
    }

    /// Insert the selected header set into `headers`
    pub fn apply(&self, headers: &mut HeaderMap, origin: Option<&str>) {
        let allow_origin = match self.mode_for(origin) {
            CorsMode::Development => HeaderValue::from_static("*"),
            CorsMode::Production => self.allowed_origin.clone(),
        };

        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    }
}

/// Origins of a developer's machine
pub fn is_local_origin(origin: &str) -> bool {
    origin.contains("localhost") || origin.contains("127.0.0.1")
}

/// Middleware: answer preflights, attach CORS headers to everything else.
pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    policy.apply(response.headers_mut(), origin.as_deref());
    response
}
