//! CORS origin enforcement.
//!
//! The allow-list is the configured set unioned with hard-coded local dev
//! defaults. Unlike a plain CORS layer that silently omits the response
//! headers, a disallowed origin is rejected outright with 403 — browser
//! *and* non-browser callers get the same explicit answer. Requests without
//! an `Origin` header (same-origin, curl, server-to-server) pass untouched.

use std::collections::HashSet;

use axum::http::header::{ORIGIN, VARY};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config::Config;

/// Origins always accepted, covering the local dev web and mobile tooling.
pub const DEFAULT_DEV_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:8081",
    "http://127.0.0.1:3000",
];

/// Immutable allow-list computed once at startup.
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: HashSet<String>,
}

impl AllowedOrigins {
    pub fn from_config(config: &Config) -> Self {
        let mut origins: HashSet<String> =
            DEFAULT_DEV_ORIGINS.iter().map(|s| s.to_string()).collect();
        origins.extend(config.allowed_origins.iter().cloned());
        Self { origins }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.origins.contains(origin.trim_end_matches('/'))
    }
}

/// Enforce the origin allow-list and answer preflights.
pub async fn enforce(req: Request<axum::body::Body>, next: Next) -> Response {
    let Some(ctx) = req.extensions().get::<ApiContext>().cloned() else {
        return ApiError::Internal("missing API context".into()).into_response();
    };

    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let Some(origin) = origin else {
        // Same-origin or non-browser caller.
        return next.run(req).await;
    };

    if !ctx.allowed_origins.is_allowed(&origin) {
        tracing::warn!(%origin, "rejected cross-origin request");
        return ApiError::OriginForbidden(origin).into_response();
    }

    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(&mut response, &origin);
        response
            .headers_mut()
            .insert("Access-Control-Max-Age", HeaderValue::from_static("86400"));
        return response;
    }

    let mut response = next.run(req).await;
    apply_cors_headers(&mut response, &origin);
    response
}

fn apply_cors_headers(response: &mut Response, origin: &str) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert("Access-Control-Allow-Origin", value);
    }
    headers.insert(VARY, HeaderValue::from_static("Origin"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Authorization, Content-Type"),
    );
}
