//! Analytics screen — client-side aggregation over fetched rows.
//!
//! The hosted store only serves raw rows; grouping and totals happen here,
//! on whatever window of sales the screen pulled down.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{MobileMoneyTransaction, Sale};
use crate::store::{decode_rows, StoreError};

use super::session::MobileSession;

/// Headline numbers for a set of sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesSummary {
    pub revenue: i64,
    pub sale_count: usize,
    /// Whole-franc average, zero for an empty window.
    pub average_sale: i64,
}

pub fn summarize(sales: &[Sale]) -> SalesSummary {
    let revenue: i64 = sales.iter().map(|s| s.total).sum();
    let sale_count = sales.len();
    let average_sale = if sale_count == 0 {
        0
    } else {
        revenue / sale_count as i64
    };
    SalesSummary {
        revenue,
        sale_count,
        average_sale,
    }
}

/// Revenue per UTC calendar day, oldest day first.
pub fn revenue_by_day(sales: &[Sale]) -> Vec<(NaiveDate, i64)> {
    let mut days: HashMap<NaiveDate, i64> = HashMap::new();
    for sale in sales {
        *days.entry(sale.created_at.date_naive()).or_insert(0) += sale.total;
    }
    let mut out: Vec<(NaiveDate, i64)> = days.into_iter().collect();
    out.sort_by_key(|(day, _)| *day);
    out
}

/// Products ranked by units sold, best seller first. Ties break on revenue.
pub fn top_products(sales: &[Sale], limit: usize) -> Vec<ProductRank> {
    let mut by_product: HashMap<Uuid, (i64, i64)> = HashMap::new();
    for sale in sales {
        let entry = by_product.entry(sale.product_id).or_insert((0, 0));
        entry.0 += i64::from(sale.quantity);
        entry.1 += sale.total;
    }
    let mut ranks: Vec<ProductRank> = by_product
        .into_iter()
        .map(|(product_id, (units, revenue))| ProductRank {
            product_id,
            units,
            revenue,
        })
        .collect();
    ranks.sort_by(|a, b| (b.units, b.revenue).cmp(&(a.units, a.revenue)));
    ranks.truncate(limit);
    ranks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductRank {
    pub product_id: Uuid,
    pub units: i64,
    pub revenue: i64,
}

/// Total agent commission earned across transactions.
pub fn commission_total(transactions: &[MobileMoneyTransaction]) -> i64 {
    transactions.iter().map(|t| t.commission).sum()
}

/// Everything the analytics screen renders.
#[derive(Debug, Clone)]
pub struct AnalyticsView {
    pub summary: SalesSummary,
    pub by_day: Vec<(NaiveDate, i64)>,
    pub top_products: Vec<ProductRank>,
    pub commission: i64,
}

/// Load and aggregate the analytics window (all rows the user may see).
pub async fn load(session: &MobileSession) -> Result<AnalyticsView, StoreError> {
    let sales: Vec<Sale> =
        decode_rows(session.store().list("sales", "created_at.asc").await?)?;
    let transactions: Vec<MobileMoneyTransaction> = decode_rows(
        session
            .store()
            .list("mobile_money_transactions", "created_at.asc")
            .await?,
    )?;

    Ok(AnalyticsView {
        summary: summarize(&sales),
        by_day: revenue_by_day(&sales),
        top_products: top_products(&sales, 5),
        commission: commission_total(&transactions),
    })
}
