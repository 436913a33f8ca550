//! Rate-limiting middleware.
//!
//! Two entry points share one implementation: `limit_global` wraps the whole
//! router, `limit_auth` is stacked on the auth endpoints, so an auth request
//! spends budget from both limiters. `RateLimit-*` headers ride on every
//! response; when both limiters stamped a response, the stricter (inner)
//! instance wins because the outer one only fills absent headers.

use axum::extract::ConnectInfo;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;

use crate::api::error::ApiError;
use crate::api::limiter::{RateDecision, RateLimiter};
use crate::api::types::ApiContext;

/// Key used when no client address can be attributed to the request.
const UNKNOWN_CLIENT: &str = "unknown";

/// Process-wide limiter, applied to every route including the 404 fallback.
pub async fn limit_global(req: Request<axum::body::Body>, next: Next) -> Response {
    apply(Instance::Global, req, next).await
}

/// Strict limiter for the auth endpoints.
pub async fn limit_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    apply(Instance::Auth, req, next).await
}

enum Instance {
    Global,
    Auth,
}

async fn apply(which: Instance, req: Request<axum::body::Body>, next: Next) -> Response {
    let Some(ctx) = req.extensions().get::<ApiContext>().cloned() else {
        return ApiError::Internal("missing API context".into()).into_response();
    };
    let limiter: &RateLimiter = match which {
        Instance::Global => &ctx.global_limiter,
        Instance::Auth => &ctx.auth_limiter,
    };

    let key = client_key(&req);
    let decision = limiter.check(&key);

    if !decision.allowed {
        tracing::warn!(client = %key, "rate limit exceeded");
        let mut response = ApiError::RateLimited {
            message: limiter.message().to_string(),
            retry_after: decision.reset_after.as_secs(),
        }
        .into_response();
        stamp_headers(&mut response, &decision, true);
        return response;
    }

    let mut response = next.run(req).await;
    stamp_headers(&mut response, &decision, false);
    response
}

/// Resolve the client key: first forwarded hop, else the socket peer
/// address, else a shared sentinel bucket.
fn client_key(req: &Request<axum::body::Body>) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Write the draft `RateLimit-*` headers. With `overwrite` false, headers
/// already stamped by an inner (stricter) limiter are left in place.
fn stamp_headers(response: &mut Response, decision: &RateDecision, overwrite: bool) {
    let headers = response.headers_mut();
    if !overwrite && headers.contains_key("RateLimit-Limit") {
        return;
    }
    let pairs = [
        ("RateLimit-Limit", decision.limit.to_string()),
        ("RateLimit-Remaining", decision.remaining.to_string()),
        ("RateLimit-Reset", decision.reset_after.as_secs().to_string()),
    ];
    for (name, value) in pairs {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }
}
