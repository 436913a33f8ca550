//! Category endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::api::error::ApiError;
use crate::api::types::{ok, ApiContext, Envelope};

/// `GET /api/categories` — all categories, alphabetical.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Envelope<Vec<JsonValue>>>, ApiError> {
    let rows = ctx.store.list("categories", "name.asc").await?;
    Ok(ok(rows))
}

#[derive(Debug, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

/// `POST /api/categories` — insert one category.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<JsonValue>>), ApiError> {
    let Json(payload) = payload?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Category name is required".into()));
    }

    let row = ctx
        .store
        .insert_one("categories", &json!({ "name": name }))
        .await?;
    Ok((StatusCode::CREATED, ok(row)))
}
