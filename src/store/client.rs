//! Supabase data-API client (PostgREST passthrough).

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::config::Config;

/// Failures talking to the hosted service.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot reach hosted backend at {0}")]
    Connection(String),
    #[error("hosted backend transport error: {0}")]
    Transport(String),
    /// Non-2xx from the data API. `message` is the provider's own error
    /// message, which the HTTP layer surfaces verbatim in 500 bodies.
    #[error("hosted backend returned {status}: {message}")]
    Upstream { status: u16, message: String },
    /// The auth API rejected the presented credentials or token.
    #[error("authentication rejected by hosted backend")]
    Unauthorized,
    #[error("unexpected response shape from hosted backend: {0}")]
    Decode(String),
}

impl StoreError {
    fn from_reqwest(base_url: &str, err: reqwest::Error) -> Self {
        if err.is_connect() {
            StoreError::Connection(base_url.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

/// Thin client over the hosted project's REST surface.
///
/// Holds one shared `reqwest::Client`; cloning is cheap. The backend
/// constructs it with the service key in both roles; the mobile client core
/// pairs the public anon key with a signed-in user's access token so the
/// provider's row-level security decides what each call may touch.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    base_url: String,
    /// Sent as the `apikey` header on every call.
    api_key: String,
    /// Sent as the bearer token on data-API calls.
    bearer: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(base_url: &str, service_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: service_key.to_string(),
            bearer: service_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Client-side store: anon key plus the user's access token.
    pub fn for_user(base_url: &str, anon_key: &str, access_token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: anon_key.to_string(),
            bearer: access_token.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.supabase_url, &config.supabase_service_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    fn rest_url(&self, relation: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, relation)
    }

    fn data_request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.bearer)
    }

    /// `GET /rest/v1/{relation}` with raw PostgREST query pairs
    /// (e.g. `("order", "created_at.desc")`, `("id", "eq.<uuid>")`).
    pub async fn select(
        &self,
        relation: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<JsonValue>, StoreError> {
        let request = self
            .data_request(self.client.get(self.rest_url(relation)))
            .query(&[("select", "*")])
            .query(query);
        let rows = self.send(request).await?;
        as_rows(rows)
    }

    /// List every row of a relation in a fixed order.
    pub async fn list(&self, relation: &str, order: &str) -> Result<Vec<JsonValue>, StoreError> {
        self.select(relation, &[("order", order.to_string())]).await
    }

    /// `POST /rest/v1/{table}` returning the inserted row.
    pub async fn insert_one(
        &self,
        table: &str,
        body: &JsonValue,
    ) -> Result<JsonValue, StoreError> {
        let request = self
            .data_request(self.client.post(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .json(body);
        let rows = as_rows(self.send(request).await?)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no row".into()))
    }

    /// `PATCH /rest/v1/{table}?id=eq.{id}` returning the updated rows
    /// (empty when no row matched).
    pub async fn update_by_id(
        &self,
        table: &str,
        id: &str,
        body: &JsonValue,
    ) -> Result<Vec<JsonValue>, StoreError> {
        let request = self
            .data_request(self.client.patch(self.rest_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(body);
        as_rows(self.send(request).await?)
    }

    /// `DELETE /rest/v1/{table}?id=eq.{id}` returning the deleted rows
    /// (empty when no row matched).
    pub async fn delete_by_id(
        &self,
        table: &str,
        id: &str,
    ) -> Result<Vec<JsonValue>, StoreError> {
        let request = self
            .data_request(self.client.delete(self.rest_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");
        as_rows(self.send(request).await?)
    }

    /// `POST /rest/v1/rpc/{function}` — database-side function call. This is
    /// how multi-step writes stay atomic: the function body runs in one
    /// transaction inside the hosted database.
    pub async fn rpc(
        &self,
        function: &str,
        args: &JsonValue,
    ) -> Result<JsonValue, StoreError> {
        let request = self
            .data_request(self.client.post(self.rest_url(&format!("rpc/{function}"))))
            .json(args);
        self.send(request).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<JsonValue, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::from_reqwest(&self.base_url, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&text),
            });
        }
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Decode a list of rows into typed values.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<JsonValue>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| StoreError::Decode(e.to_string())))
        .collect()
}

fn as_rows(value: JsonValue) -> Result<Vec<JsonValue>, StoreError> {
    match value {
        JsonValue::Array(rows) => Ok(rows),
        JsonValue::Null => Ok(Vec::new()),
        other => Err(StoreError::Decode(format!(
            "expected a row array, got {other}"
        ))),
    }
}

/// PostgREST error bodies are `{"message": ..., "code": ...}`; fall back to
/// the raw text for anything else.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<JsonValue>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
