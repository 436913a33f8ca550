//! Login screen — password sign-in against the hosted auth service.

use crate::models::{Profile, ShopSettings};
use crate::store::{decode_rows, AuthUser, StoreError, SupabaseStore};

/// Entry point for the mobile app: project URL plus the public anon key.
#[derive(Debug, Clone)]
pub struct ShopClient {
    base_url: String,
    anon_key: String,
}

impl ShopClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    /// Sign in with email and password. On success the returned session
    /// carries a store client scoped to the user's token — every later call
    /// runs under the provider's row-level security for that user.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<MobileSession, StoreError> {
        let auth = SupabaseStore::new(&self.base_url, &self.anon_key);
        let session = auth.sign_in(email, password).await?;

        Ok(MobileSession {
            store: SupabaseStore::for_user(
                &self.base_url,
                &self.anon_key,
                &session.access_token,
            ),
            user: session.user,
            access_token: session.access_token,
        })
    }
}

/// An authenticated mobile session.
pub struct MobileSession {
    store: SupabaseStore,
    pub user: AuthUser,
    pub access_token: String,
}

impl MobileSession {
    pub fn store(&self) -> &SupabaseStore {
        &self.store
    }

    /// The signed-in user's profile row.
    pub async fn profile(&self) -> Result<Profile, StoreError> {
        let rows = self
            .store
            .select("profiles", &[("id", format!("eq.{}", self.user.id))])
            .await?;
        decode_rows::<Profile>(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("profile row missing".into()))
    }

    /// Shop settings shown in the app header (name, currency).
    pub async fn shop_settings(&self) -> Result<ShopSettings, StoreError> {
        let rows = self.store.select("shop_settings", &[]).await?;
        decode_rows::<ShopSettings>(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("shop settings row missing".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn login_builds_a_user_scoped_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(header("apikey", "anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "user-jwt",
                "refresh_token": "refresh",
                "user": {
                    "id": "aa8e6a51-2c30-4f39-8bb1-74a2b5f0a1d3",
                    "email": "fatou@example.com"
                }
            })))
            .mount(&server)
            .await;

        let client = ShopClient::new(&server.uri(), "anon-key");
        let session = client.login("fatou@example.com", "secret").await.unwrap();
        assert_eq!(session.access_token, "user-jwt");
        assert_eq!(session.user.email.as_deref(), Some("fatou@example.com"));
    }

    #[tokio::test]
    async fn profile_decodes_the_callers_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "user-jwt",
                "refresh_token": "refresh",
                "user": {
                    "id": "aa8e6a51-2c30-4f39-8bb1-74a2b5f0a1d3",
                    "email": "fatou@example.com"
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/profiles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "aa8e6a51-2c30-4f39-8bb1-74a2b5f0a1d3",
                "email": "fatou@example.com",
                "full_name": "Fatou Ndiaye",
                "role": "owner",
                "shop_name": "Boutique Fatou"
            }])))
            .mount(&server)
            .await;

        let client = ShopClient::new(&server.uri(), "anon-key");
        let session = client.login("fatou@example.com", "secret").await.unwrap();
        let profile = session.profile().await.unwrap();
        assert_eq!(profile.role, "owner");
        assert_eq!(profile.shop_name.as_deref(), Some("Boutique Fatou"));
    }

    #[tokio::test]
    async fn session_store_presents_the_user_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "user-jwt",
                "refresh_token": "refresh",
                "user": {
                    "id": "aa8e6a51-2c30-4f39-8bb1-74a2b5f0a1d3",
                    "email": null
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(header("apikey", "anon-key"))
            .and(wiremock::matchers::bearer_token("user-jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = ShopClient::new(&server.uri(), "anon-key");
        let session = client.login("fatou@example.com", "secret").await.unwrap();
        let rows = session.store().list("products", "name.asc").await.unwrap();
        assert!(rows.is_empty());
    }
}
