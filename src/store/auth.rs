//! Hosted auth-API (GoTrue) calls: token verification and password sign-in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::client::{StoreError, SupabaseStore};

/// Identity returned by the hosted auth service for a valid token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Session handed back by a successful password sign-in. The access token is
/// what mobile clients present as their bearer token afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

impl SupabaseStore {
    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url(), endpoint)
    }

    /// Validate a bearer token against `GET /auth/v1/user`.
    ///
    /// Any 401/403 from the provider collapses to `Unauthorized`; other
    /// failures propagate as upstream/transport errors.
    pub async fn auth_user(&self, token: &str) -> Result<AuthUser, StoreError> {
        let response = self
            .http()
            .get(self.auth_url("user"))
            .header("apikey", self.api_key())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(StoreError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<AuthUser>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Password grant against `POST /auth/v1/token?grant_type=password`.
    /// Used by the mobile login screen; the backend itself never signs in.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError> {
        let response = self
            .http()
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", self.api_key())
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(StoreError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<AuthSession>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}
