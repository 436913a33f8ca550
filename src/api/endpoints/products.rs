//! Product endpoints — the one resource with a full CRUD surface.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ok, ApiContext, Envelope};

/// `GET /api/products` — all products, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Envelope<Vec<JsonValue>>>, ApiError> {
    let rows = ctx.store.list("products", "created_at.desc").await?;
    Ok(ok(rows))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub price: i64,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i32>,
}

/// `POST /api/products` — insert one product.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<JsonValue>>), ApiError> {
    let Json(payload) = payload?;
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Product name is required".into()));
    }
    if payload.price < 0 {
        return Err(ApiError::BadRequest("Price cannot be negative".into()));
    }

    let body = serde_json::to_value(&payload)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let row = ctx.store.insert_one("products", &body).await?;
    Ok((StatusCode::CREATED, ok(row)))
}

/// Partial update; absent fields are left untouched by the data API.
#[derive(Debug, Deserialize, Serialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i32>,
}

/// `PUT /api/products/:id` — update one product.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Envelope<JsonValue>>, ApiError> {
    let Json(patch) = payload?;
    if let Some(price) = patch.price {
        if price < 0 {
            return Err(ApiError::BadRequest("Price cannot be negative".into()));
        }
    }

    let body = serde_json::to_value(&patch)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let rows = ctx
        .store
        .update_by_id("products", &id.to_string(), &body)
        .await?;
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
    Ok(ok(row))
}

/// `DELETE /api/products/:id` — delete one product.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<JsonValue>>, ApiError> {
    let rows = ctx.store.delete_by_id("products", &id.to_string()).await?;
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
    Ok(ok(row))
}
