//! Mobile client core — the Rust logic behind the app screens.
//!
//! Screens talk to the hosted store *directly* with the signed-in user's
//! token (row-level security is enforced provider-side), bypassing the
//! backend API for day-to-day reads and writes. What lives here besides the
//! passthrough calls is the local arithmetic: cash-denomination totals,
//! mobile-money balance projection, and sales analytics.

pub mod analytics;
pub mod balance;
pub mod cash;
pub mod inventory;
pub mod money;
pub mod sales;
pub mod session;

pub use balance::{project, reconcile, PlatformBalances, Reconciliation};
pub use cash::{CashCount, XOF_DENOMINATIONS};
pub use session::{MobileSession, ShopClient};
