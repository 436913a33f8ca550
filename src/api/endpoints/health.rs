//! Root and health endpoints — fixed success payloads, no auth.

use axum::Json;
use serde_json::{json, Value as JsonValue};

use crate::api::types::{ok, Envelope};
use crate::config::{APP_NAME, APP_VERSION};

/// `GET /` — service banner.
pub async fn root() -> Json<Envelope<JsonValue>> {
    ok(json!({
        "service": APP_NAME,
        "version": APP_VERSION,
    }))
}

/// `GET /health` — liveness probe. Reports process health only; the hosted
/// backend is not consulted.
pub async fn check() -> Json<Envelope<JsonValue>> {
    ok(json!({ "status": "ok" }))
}
