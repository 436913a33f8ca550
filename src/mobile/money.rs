//! Mobile-money screen — platforms, transactions, projected balances.

use serde_json::json;
use uuid::Uuid;

use crate::models::{MobileMoneyPlatform, MobileMoneyTransaction, TransactionKind, Transfer};
use crate::store::{decode_rows, StoreError};

use super::balance::{project, PlatformBalances};
use super::session::MobileSession;

/// All platforms the shop is an agent for, alphabetical.
pub async fn platforms(
    session: &MobileSession,
) -> Result<Vec<MobileMoneyPlatform>, StoreError> {
    decode_rows(
        session
            .store()
            .list("mobile_money_platforms", "name.asc")
            .await?,
    )
}

/// A platform's transactions, newest first.
pub async fn transactions(
    session: &MobileSession,
    platform_id: Uuid,
) -> Result<Vec<MobileMoneyTransaction>, StoreError> {
    decode_rows(
        session
            .store()
            .select(
                "mobile_money_transactions",
                &[
                    ("order", "created_at.desc".to_string()),
                    ("platform_id", format!("eq.{platform_id}")),
                ],
            )
            .await?,
    )
}

/// Record an agent transaction and return the locally projected balances.
///
/// The projection is what the screen shows immediately; the authoritative
/// balances are whatever the hosted store says on the next read.
pub async fn record(
    session: &MobileSession,
    platform: &MobileMoneyPlatform,
    kind: TransactionKind,
    amount: i64,
    commission: i64,
) -> Result<PlatformBalances, StoreError> {
    session
        .store()
        .insert_one(
            "mobile_money_transactions",
            &json!({
                "platform_id": platform.id,
                "kind": kind,
                "amount": amount,
                "commission": commission,
            }),
        )
        .await?;

    Ok(project(
        PlatformBalances {
            float_balance: platform.float_balance,
            cash_balance: platform.cash_balance,
        },
        kind,
        amount,
        commission,
    ))
}

/// Cash/float transfers recorded against a platform, newest first.
pub async fn transfers(
    session: &MobileSession,
    platform_id: Uuid,
) -> Result<Vec<Transfer>, StoreError> {
    decode_rows(
        session
            .store()
            .select(
                "transfers",
                &[
                    ("order", "created_at.desc".to_string()),
                    ("platform_id", format!("eq.{platform_id}")),
                ],
            )
            .await?,
    )
}
