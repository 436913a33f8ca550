//! Route table and middleware assembly.
//!
//! Layers are applied from bottom (innermost) to top (outermost):
//!
//!   security headers → Extension(ctx) → CORS → global limiter → routes
//!
//! so the hardening headers cover every response, CORS rejections happen
//! before any budget is spent, and the global limiter counts every request
//! including 404s. The auth endpoints additionally stack the strict limiter
//! and all `/api` routes sit behind token verification.

use axum::routing::{get, put};
use axum::Router;

use crate::api::endpoints::{
    categories, health, movements, products, profile, sales, transfers,
};
use crate::api::error::ApiError;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the full API router.
pub fn api_router(ctx: ApiContext) -> Router {
    let resources = Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            put(products::update).delete(products::remove),
        )
        .route("/movements", get(movements::list).post(movements::create))
        .route("/sales", get(sales::list).post(sales::create))
        .route("/transfers", get(transfers::list).post(transfers::create))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth));

    let auth_routes = Router::new()
        .route("/auth/profile", get(profile::me))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::middleware::from_fn(middleware::rate::limit_auth));

    let router = Router::new()
        .nest("/api", resources)
        .nest("/api", auth_routes)
        .route("/", get(health::root))
        .route("/health", get(health::check))
        .fallback(fallback)
        .layer(axum::middleware::from_fn(middleware::rate::limit_global))
        .layer(axum::middleware::from_fn(middleware::cors::enforce))
        .layer(axum::Extension(ctx.clone()));

    middleware::security::apply(router, ctx.config.environment)
}

async fn fallback() -> ApiError {
    ApiError::NotFound("Route not found".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{bearer_token, body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::limiter::RateLimitConfig;
    use crate::config::{Config, Environment};
    use crate::store::SupabaseStore;

    const USER_ID: &str = "aa8e6a51-2c30-4f39-8bb1-74a2b5f0a1d3";

    fn test_config(upstream: &str) -> Config {
        Config {
            supabase_url: upstream.trim_end_matches('/').to_string(),
            supabase_service_key: "service-key".into(),
            port: 0,
            allowed_origins: vec!["https://shop.example.com".into()],
            environment: Environment::Development,
        }
    }

    fn ctx_for(server: &MockServer) -> ApiContext {
        let config = test_config(&server.uri());
        let store = SupabaseStore::from_config(&config);
        ApiContext::new(config, store)
    }

    /// Context with tiny limiter budgets for exhaustion tests.
    fn ctx_with_limits(server: &MockServer, global_max: u32, auth_max: u32) -> ApiContext {
        let config = test_config(&server.uri());
        let store = SupabaseStore::from_config(&config);
        ApiContext::with_limits(
            config,
            store,
            RateLimitConfig {
                window: Duration::from_secs(60),
                max_requests: global_max,
                message: "Too many requests, please try again later.",
            },
            RateLimitConfig {
                window: Duration::from_secs(60),
                max_requests: auth_max,
                message: "Too many authentication attempts, please try again later.",
            },
        )
    }

    async fn mock_auth_user(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(bearer_token("user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": USER_ID,
                "email": "fatou@example.com"
            })))
            .mount(server)
            .await;
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 65536).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn root_and_health_are_public_fixed_payloads() {
        let server = MockServer::start().await;

        let app = api_router(ctx_for(&server));
        let response = app.oneshot(get_request("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["service"], "Boutik");

        let app = api_router(ctx_for(&server));
        let response = app.oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_route_returns_404_with_rate_headers() {
        let server = MockServer::start().await;
        let app = api_router(ctx_for(&server));

        let response = app
            .oneshot(get_request("/api/nonexistent", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("RateLimit-Limit"));
        let json = response_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn resource_routes_require_a_token() {
        let server = MockServer::start().await;
        let app = api_router(ctx_for(&server));

        let response = app
            .oneshot(get_request("/api/categories", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = response_json(response).await;
        assert_eq!(json["code"], "AUTH_REQUIRED");
    }

    #[tokio::test]
    async fn categories_list_passes_rows_through() {
        let server = MockServer::start().await;
        mock_auth_user(&server).await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/categories"))
            .and(query_param("order", "name.asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "c1", "name": "Boissons"},
                {"id": "c2", "name": "Épicerie"}
            ])))
            .mount(&server)
            .await;

        let app = api_router(ctx_for(&server));
        let response = app
            .oneshot(get_request("/api/categories", Some("user-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn malformed_json_body_is_400_not_500() {
        let server = MockServer::start().await;
        mock_auth_user(&server).await;

        let app = api_router(ctx_for(&server));
        let response = app
            .oneshot(post_json(
                "/api/categories",
                Some("user-token"),
                "{\"name\": ",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["code"], "INVALID_JSON");
        assert_eq!(json["error"], "Invalid JSON payload");
    }

    #[tokio::test]
    async fn disallowed_origin_is_rejected_with_403() {
        let server = MockServer::start().await;
        let app = api_router(ctx_for(&server));

        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .header("Origin", "https://evil.test")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = response_json(response).await;
        assert_eq!(json["code"], "ORIGIN_FORBIDDEN");
    }

    #[tokio::test]
    async fn allowed_origin_is_reflected() {
        let server = MockServer::start().await;
        let app = api_router(ctx_for(&server));

        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .header("Origin", "https://shop.example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "https://shop.example.com"
        );
    }

    #[tokio::test]
    async fn preflight_is_answered_without_touching_routes() {
        let server = MockServer::start().await;
        let app = api_router(ctx_for(&server));

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/products")
            .header("Origin", "http://localhost:5173")
            .header("Access-Control-Request-Method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response
            .headers()
            .contains_key("access-control-allow-methods"));
    }

    #[tokio::test]
    async fn nth_request_allowed_then_rejected_until_reset() {
        let server = MockServer::start().await;
        let ctx = ctx_with_limits(&server, 3, 2);
        let app = api_router(ctx);

        for expected_remaining in ["2", "1", "0"] {
            let response = app
                .clone()
                .oneshot(get_request("/health", None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers().get("RateLimit-Remaining").unwrap(),
                expected_remaining
            );
        }

        let response = app.oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get("RateLimit-Remaining").unwrap(),
            "0"
        );
        assert!(response.headers().contains_key("Retry-After"));
        let json = response_json(response).await;
        assert_eq!(json["code"], "RATE_LIMITED");
        assert_eq!(json["error"], "Too many requests, please try again later.");
    }

    #[tokio::test]
    async fn auth_endpoint_spends_the_strict_budget() {
        let server = MockServer::start().await;
        mock_auth_user(&server).await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/profiles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": USER_ID, "email": "fatou@example.com", "role": "owner"}
            ])))
            .mount(&server)
            .await;

        let ctx = ctx_with_limits(&server, 10, 2);
        let app = api_router(ctx);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(get_request("/api/auth/profile", Some("user-token")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            // The strict (inner) limiter's headers win over the global ones.
            assert_eq!(response.headers().get("RateLimit-Limit").unwrap(), "2");
        }

        let response = app
            .oneshot(get_request("/api/auth/profile", Some("user-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let json = response_json(response).await;
        assert_eq!(
            json["error"],
            "Too many authentication attempts, please try again later."
        );
    }

    #[tokio::test]
    async fn profile_returns_the_callers_row() {
        let server = MockServer::start().await;
        mock_auth_user(&server).await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/profiles"))
            .and(query_param("id", format!("eq.{USER_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": USER_ID, "email": "fatou@example.com", "role": "owner"}
            ])))
            .mount(&server)
            .await;

        let app = api_router(ctx_for(&server));
        let response = app
            .oneshot(get_request("/api/auth/profile", Some("user-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["data"]["email"], "fatou@example.com");
    }

    #[tokio::test]
    async fn invalid_token_is_401() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "invalid JWT"
            })))
            .mount(&server)
            .await;

        let app = api_router(ctx_for(&server));
        let response = app
            .oneshot(get_request("/api/products", Some("expired")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn recording_a_movement_goes_through_the_atomic_rpc() {
        let server = MockServer::start().await;
        mock_auth_user(&server).await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/record_stock_movement"))
            .and(body_json(json!({
                "p_product_id": "7f1f6a70-3c1e-4f24-9b56-0a9c2f8d5f11",
                "p_type": "Entrée",
                "p_quantity": 5,
                "p_note": null
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "movement_id": "m1",
                "quantity": 17
            })))
            .mount(&server)
            .await;

        let app = api_router(ctx_for(&server));
        let response = app
            .oneshot(post_json(
                "/api/movements",
                Some("user-token"),
                r#"{"product_id":"7f1f6a70-3c1e-4f24-9b56-0a9c2f8d5f11","type":"Entrée","quantity":5}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = response_json(response).await;
        assert_eq!(json["data"]["quantity"], 17);
    }

    #[tokio::test]
    async fn movement_with_nonpositive_quantity_is_400() {
        let server = MockServer::start().await;
        mock_auth_user(&server).await;

        let app = api_router(ctx_for(&server));
        let response = app
            .oneshot(post_json(
                "/api/movements",
                Some("user-token"),
                r#"{"product_id":"7f1f6a70-3c1e-4f24-9b56-0a9c2f8d5f11","type":"Sortie","quantity":0}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_500_with_message() {
        let server = MockServer::start().await;
        mock_auth_user(&server).await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/sales"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "message": "upstream maintenance"
            })))
            .mount(&server)
            .await;

        let app = api_router(ctx_for(&server));
        let response = app
            .oneshot(get_request("/api/sales", Some("user-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["code"], "INTERNAL");
        assert!(json["error"].as_str().unwrap().contains("upstream maintenance"));
    }

    #[tokio::test]
    async fn updating_a_missing_product_is_404() {
        let server = MockServer::start().await;
        mock_auth_user(&server).await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let app = api_router(ctx_for(&server));
        let request = Request::builder()
            .method("PUT")
            .uri(format!("/api/products/{USER_ID}"))
            .header("Authorization", "Bearer user-token")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"price": 900}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sale_total_is_derived_from_quantity_and_unit_price() {
        let server = MockServer::start().await;
        mock_auth_user(&server).await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/sales"))
            .and(body_json(json!({
                "product_id": "7f1f6a70-3c1e-4f24-9b56-0a9c2f8d5f11",
                "quantity": 3,
                "unit_price": 800,
                "total": 2400,
                "payment_method": "espèces"
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!([{"id": "s1", "total": 2400}])),
            )
            .mount(&server)
            .await;

        let app = api_router(ctx_for(&server));
        let response = app
            .oneshot(post_json(
                "/api/sales",
                Some("user-token"),
                r#"{"product_id":"7f1f6a70-3c1e-4f24-9b56-0a9c2f8d5f11","quantity":3,"unit_price":800}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = response_json(response).await;
        assert_eq!(json["data"]["total"], 2400);
    }
}
