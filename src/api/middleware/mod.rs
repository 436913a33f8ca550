//! Request-path middleware.
//!
//! Execution order (outermost → innermost):
//! 1. Security headers — stamped on every response
//! 2. CORS origin check — reject disallowed origins before spending budget
//! 3. Global rate limiter — every route, 404s included
//! 4. Auth rate limiter — auth endpoints only, stricter budget
//! 5. Token verification — injects the caller identity

pub mod auth;
pub mod cors;
pub mod rate;
pub mod security;
