//! API endpoint handlers.
//!
//! One module per business resource. Every handler is a direct passthrough:
//! read or write the hosted store, wrap the rows in the success envelope,
//! and let [`crate::api::error::ApiError`] shape any failure.

pub mod categories;
pub mod health;
pub mod movements;
pub mod products;
pub mod profile;
pub mod sales;
pub mod transfers;
