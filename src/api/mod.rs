//! HTTP API layer.
//!
//! A thin axum surface in front of the hosted store: security headers, CORS
//! origin enforcement, fixed-window rate limiting, bearer-token
//! verification, then per-resource passthrough handlers. The router is
//! composable — [`router::api_router`] returns a `Router` that can be
//! mounted on any axum server.

pub mod endpoints;
pub mod error;
pub mod limiter;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use limiter::{MemoryStore, RateLimitConfig, RateLimiter, RateStore};
pub use router::api_router;
pub use server::{start, start_on, ApiServer};
pub use types::{ApiContext, UserContext};
