//! Sale endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ok, ApiContext, Envelope};

/// `GET /api/sales` — all sales, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Envelope<Vec<JsonValue>>>, ApiError> {
    let rows = ctx.store.list("sales", "created_at.desc").await?;
    Ok(ok(rows))
}

#[derive(Debug, Deserialize)]
pub struct NewSale {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_payment_method() -> String {
    "espèces".to_string()
}

/// `POST /api/sales` — insert one sale line. The line total is derived
/// server-side; clients only send quantity and unit price.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewSale>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<JsonValue>>), ApiError> {
    let Json(sale) = payload?;
    if sale.quantity <= 0 {
        return Err(ApiError::BadRequest("Sale quantity must be positive".into()));
    }
    if sale.unit_price < 0 {
        return Err(ApiError::BadRequest("Unit price cannot be negative".into()));
    }

    let total = sale.unit_price * i64::from(sale.quantity);
    let row = ctx
        .store
        .insert_one(
            "sales",
            &json!({
                "product_id": sale.product_id,
                "quantity": sale.quantity,
                "unit_price": sale.unit_price,
                "total": total,
                "payment_method": sale.payment_method,
            }),
        )
        .await?;
    Ok((StatusCode::CREATED, ok(row)))
}
