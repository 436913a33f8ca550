//! Sales screen — record a sale and summarize the day's takings.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::models::Sale;
use crate::store::{decode_rows, StoreError};

use super::session::MobileSession;

/// Record one sale line. The total is derived locally, same rule as the
/// backend uses.
pub async fn record(
    session: &MobileSession,
    product_id: Uuid,
    quantity: i32,
    unit_price: i64,
    payment_method: &str,
) -> Result<Sale, StoreError> {
    let total = unit_price * i64::from(quantity);
    let row = session
        .store()
        .insert_one(
            "sales",
            &json!({
                "product_id": product_id,
                "quantity": quantity,
                "unit_price": unit_price,
                "total": total,
                "payment_method": payment_method,
            }),
        )
        .await?;
    serde_json::from_value(row).map_err(|e| StoreError::Decode(e.to_string()))
}

/// The sales screen's day view.
#[derive(Debug, Clone)]
pub struct DaySales {
    pub sales: Vec<Sale>,
    pub revenue: i64,
    pub sale_count: usize,
}

/// Load all sales for one calendar day (UTC), newest first.
pub async fn for_day(
    session: &MobileSession,
    day: NaiveDate,
) -> Result<DaySales, StoreError> {
    let start: DateTime<Utc> = day
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or_else(Utc::now);
    let end = start + Duration::days(1);

    let rows = session
        .store()
        .select(
            "sales",
            &[
                ("order", "created_at.desc".to_string()),
                ("created_at", format!("gte.{}", start.to_rfc3339())),
                ("created_at", format!("lt.{}", end.to_rfc3339())),
            ],
        )
        .await?;
    let sales: Vec<Sale> = decode_rows(rows)?;
    Ok(summarize(sales))
}

fn summarize(sales: Vec<Sale>) -> DaySales {
    let revenue = sales.iter().map(|s| s.total).sum();
    let sale_count = sales.len();
    DaySales {
        sales,
        revenue,
        sale_count,
    }
}
