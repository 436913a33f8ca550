//! Stock movement endpoints.
//!
//! Recording a movement also adjusts the product's quantity. Both effects
//! happen in one `record_stock_movement` database function call, so the
//! movement row and the stock level cannot drift apart on a crash — the
//! hosted database is the only tier that can make that pair atomic.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ok, ApiContext, Envelope};
use crate::models::MovementKind;

/// `GET /api/movements` — movement history through the pre-joined
/// `movements_with_products` view, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Envelope<Vec<JsonValue>>>, ApiError> {
    let rows = ctx
        .store
        .list("movements_with_products", "created_at.desc")
        .await?;
    Ok(ok(rows))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewMovement {
    pub product_id: Uuid,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: i32,
    #[serde(default)]
    pub note: Option<String>,
}

/// `POST /api/movements` — record a movement and apply its stock delta.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewMovement>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<JsonValue>>), ApiError> {
    let Json(movement) = payload?;
    if movement.quantity <= 0 {
        return Err(ApiError::BadRequest(
            "Movement quantity must be positive".into(),
        ));
    }

    let kind_tag = serde_json::to_value(movement.kind)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let result = ctx
        .store
        .rpc(
            "record_stock_movement",
            &json!({
                "p_product_id": movement.product_id,
                "p_type": kind_tag,
                "p_quantity": movement.quantity,
                "p_note": movement.note,
            }),
        )
        .await?;

    Ok((StatusCode::CREATED, ok(result)))
}
