//! Transfer endpoints — cash moved between the till and a platform float.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ok, ApiContext, Envelope};

/// `GET /api/transfers` — all transfers, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Envelope<Vec<JsonValue>>>, ApiError> {
    let rows = ctx.store.list("transfers", "created_at.desc").await?;
    Ok(ok(rows))
}

#[derive(Debug, Deserialize)]
pub struct NewTransfer {
    pub platform_id: Uuid,
    pub kind: String,
    pub amount: i64,
}

/// `POST /api/transfers` — insert one transfer.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewTransfer>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<JsonValue>>), ApiError> {
    let Json(transfer) = payload?;
    if transfer.amount <= 0 {
        return Err(ApiError::BadRequest(
            "Transfer amount must be positive".into(),
        ));
    }

    let row = ctx
        .store
        .insert_one(
            "transfers",
            &json!({
                "platform_id": transfer.platform_id,
                "kind": transfer.kind,
                "amount": transfer.amount,
            }),
        )
        .await?;
    Ok((StatusCode::CREATED, ok(row)))
}
