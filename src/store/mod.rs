//! Hosted data-store client.
//!
//! Every durable read and write in the system goes through the managed
//! Supabase service: rows via its PostgREST data API, identity via its
//! GoTrue auth API. This module is a thin passthrough — no retry, no
//! caching, no timeout policy beyond the HTTP client defaults. A slow or
//! failing upstream call propagates to the caller as-is.

pub mod auth;
pub mod client;

pub use auth::{AuthSession, AuthUser};
pub use client::{decode_rows, StoreError, SupabaseStore};
