//! Inventory screen — product list with category names and low-stock flags.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Category, MovementWithProduct, Product, StockMovement};
use crate::store::{decode_rows, StoreError};

use super::session::MobileSession;

/// Everything the inventory screen renders.
#[derive(Debug, Clone)]
pub struct InventoryView {
    pub items: Vec<InventoryItem>,
    pub low_stock_count: usize,
    /// Retail value of the stock on hand (Σ price × quantity).
    pub stock_value: i64,
}

#[derive(Debug, Clone)]
pub struct InventoryItem {
    pub product: Product,
    pub category_name: Option<String>,
    pub low_stock: bool,
}

/// Load the inventory screen: two store reads, then local assembly.
pub async fn load(session: &MobileSession) -> Result<InventoryView, StoreError> {
    let products: Vec<Product> =
        decode_rows(session.store().list("products", "name.asc").await?)?;
    let categories: Vec<Category> =
        decode_rows(session.store().list("categories", "name.asc").await?)?;
    Ok(build_view(products, &categories))
}

/// One product's movement history, newest first.
pub async fn stock_history(
    session: &MobileSession,
    product_id: Uuid,
) -> Result<Vec<StockMovement>, StoreError> {
    decode_rows(
        session
            .store()
            .select(
                "movements",
                &[
                    ("order", "created_at.desc".to_string()),
                    ("product_id", format!("eq.{product_id}")),
                ],
            )
            .await?,
    )
}

/// Recent movements across all products, via the pre-joined read view.
pub async fn recent_movements(
    session: &MobileSession,
) -> Result<Vec<MovementWithProduct>, StoreError> {
    decode_rows(
        session
            .store()
            .list("movements_with_products", "created_at.desc")
            .await?,
    )
}

fn build_view(products: Vec<Product>, categories: &[Category]) -> InventoryView {
    let names: HashMap<Uuid, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let items: Vec<InventoryItem> = products
        .into_iter()
        .map(|product| {
            let category_name = product
                .category_id
                .and_then(|id| names.get(&id))
                .map(|name| name.to_string());
            let low_stock = product.is_low_stock();
            InventoryItem {
                product,
                category_name,
                low_stock,
            }
        })
        .collect();

    let low_stock_count = items.iter().filter(|i| i.low_stock).count();
    let stock_value = items
        .iter()
        .map(|i| i.product.price * i64::from(i.product.quantity))
        .sum();

    InventoryView {
        items,
        low_stock_count,
        stock_value,
    }
}
