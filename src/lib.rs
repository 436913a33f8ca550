//! Boutik — point-of-sale and inventory backend for small retail shops that
//! double as mobile-money agents.
//!
//! Persistence and identity live entirely in a hosted Supabase service; this
//! crate is the thin HTTP layer in front of it ([`api`], [`store`]) and the
//! Rust core of the companion mobile app ([`mobile`]). There is no local
//! database, no scheduler, and no custom protocol anywhere.

pub mod api;
pub mod config;
pub mod mobile;
pub mod models;
pub mod store;

// Convenience re-exports (keeps call-sites clean)
pub use api::{api_router, ApiContext, ApiError};
pub use config::Config;
pub use store::{StoreError, SupabaseStore};
