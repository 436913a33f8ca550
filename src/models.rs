//! Typed views of the hosted database rows.
//!
//! The hosted service owns the schema; these structs only mirror what the
//! data API returns. Money amounts are whole XOF francs (the currency has no
//! minor unit), so `i64` everywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Sellable product with live stock count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    /// Unit sale price, whole francs.
    pub price: i64,
    pub quantity: i32,
    /// Stock level at or below which the product counts as low-stock.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,
    pub created_at: DateTime<Utc>,
}

fn default_low_stock_threshold() -> i32 {
    5
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

/// Direction of a stock movement. The tags are the literal values stored by
/// the hosted database ("Entrée" = stock in, "Sortie" = stock out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "Entrée")]
    Entree,
    #[serde(rename = "Sortie")]
    Sortie,
}

impl MovementKind {
    /// Signed stock delta this movement applies to the product quantity.
    pub fn signed_delta(self, quantity: i32) -> i32 {
        match self {
            MovementKind::Entree => quantity,
            MovementKind::Sortie => -quantity,
        }
    }
}

/// Stock movement row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row of the pre-joined `movements_with_products` read view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementWithProduct {
    pub id: Uuid,
    pub product_id: Uuid,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: i32,
    pub note: Option<String>,
    pub product_name: String,
    pub created_at: DateTime<Utc>,
}

/// Completed sale line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub total: i64,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

/// Cash transfer between the till and a mobile-money platform float.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    pub id: Uuid,
    pub platform_id: Uuid,
    pub kind: String,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// User profile row maintained by the hosted auth service triggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub shop_name: Option<String>,
}

/// Mobile-money platform the shop is an agent for (Orange Money, Wave, …).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileMoneyPlatform {
    pub id: Uuid,
    pub name: String,
    /// Electronic float held on the platform, whole francs.
    pub float_balance: i64,
    /// Physical cash attributed to this platform's operations.
    pub cash_balance: i64,
}

/// Direction of a mobile-money transaction, from the agent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Customer hands over cash, agent sends float to their wallet.
    Deposit,
    /// Customer cashes out, agent receives float back.
    Withdrawal,
}

/// Mobile-money transaction row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileMoneyTransaction {
    pub id: Uuid,
    pub platform_id: Uuid,
    pub kind: TransactionKind,
    pub amount: i64,
    /// Agent commission earned on the transaction, whole francs.
    #[serde(default)]
    pub commission: i64,
    pub created_at: DateTime<Utc>,
}

/// Per-shop settings row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSettings {
    pub id: Uuid,
    pub shop_name: String,
    pub currency: String,
    pub updated_at: DateTime<Utc>,
}
