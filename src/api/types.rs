//! Shared state and response envelope for the API layer.

use std::sync::Arc;

use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::limiter::{RateLimitConfig, RateLimiter};
use crate::api::middleware::cors::AllowedOrigins;
use crate::config::Config;
use crate::store::SupabaseStore;

/// Shared context cloned into every route and middleware.
///
/// Holds the process-wide singletons: parsed config, the hosted-store client,
/// and the two rate limiter instances (loose global, strict auth) built from
/// the same factory.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<Config>,
    pub store: Arc<SupabaseStore>,
    pub allowed_origins: Arc<AllowedOrigins>,
    pub global_limiter: Arc<RateLimiter>,
    pub auth_limiter: Arc<RateLimiter>,
}

impl ApiContext {
    pub fn new(config: Config, store: SupabaseStore) -> Self {
        Self::with_limits(
            config,
            store,
            RateLimitConfig::global(),
            RateLimitConfig::auth(),
        )
    }

    /// Build a context with explicit limiter tuning.
    pub fn with_limits(
        config: Config,
        store: SupabaseStore,
        global: RateLimitConfig,
        auth: RateLimitConfig,
    ) -> Self {
        let allowed_origins = AllowedOrigins::from_config(&config);
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            allowed_origins: Arc::new(allowed_origins),
            global_limiter: Arc::new(RateLimiter::in_memory(global)),
            auth_limiter: Arc::new(RateLimiter::in_memory(auth)),
        }
    }
}

/// Verified caller identity, injected into request extensions by the auth
/// middleware after the hosted auth service accepted the bearer token.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub data: T,
}

/// Wrap a payload in the success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}
