//! Bearer token verification middleware.
//!
//! Extracts `Authorization: Bearer <token>`, forwards it to the hosted auth
//! service for validation, and injects [`UserContext`] into request
//! extensions for downstream handlers. No local token state: every request
//! costs one upstream call, and an upstream outage fails the request.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};

/// Require a valid bearer token from the hosted auth service.
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let user = ctx.store.auth_user(&token).await.map_err(|err| {
        tracing::debug!(%err, "token verification failed");
        ApiError::from(err)
    })?;

    req.extensions_mut().insert(UserContext {
        user_id: user.id,
        email: user.email,
    });

    Ok(next.run(req).await)
}
