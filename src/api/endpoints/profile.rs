//! Authenticated profile endpoint.

use axum::extract::State;
use axum::{Extension, Json};
use serde_json::Value as JsonValue;

use crate::api::error::ApiError;
use crate::api::types::{ok, ApiContext, Envelope, UserContext};

/// `GET /api/auth/profile` — the caller's profile row.
///
/// Identity comes from the auth middleware; this handler only looks the
/// matching row up in the hosted `profiles` table.
pub async fn me(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<Envelope<JsonValue>>, ApiError> {
    let rows = ctx
        .store
        .select("profiles", &[("id", format!("eq.{}", user.user_id))])
        .await?;
    let profile = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;
    Ok(ok(profile))
}
