//! Mobile-money balance projection and end-of-day reconciliation.
//!
//! An agent transaction moves value between the physical till and the
//! platform float in opposite directions:
//!
//! - deposit: the customer hands over cash, the agent sends float out.
//! - withdrawal: the customer takes cash, the agent receives float back.
//!
//! Commission is credited on the cash side in both cases, so across any
//! transaction `cash + float` grows by exactly the commission.

use crate::models::{MobileMoneyTransaction, TransactionKind};

/// A platform's balances as seen from the agent's books.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformBalances {
    pub float_balance: i64,
    pub cash_balance: i64,
}

impl PlatformBalances {
    pub fn total(self) -> i64 {
        self.float_balance + self.cash_balance
    }
}

/// Project balances after applying one transaction.
pub fn project(
    balances: PlatformBalances,
    kind: TransactionKind,
    amount: i64,
    commission: i64,
) -> PlatformBalances {
    match kind {
        TransactionKind::Deposit => PlatformBalances {
            cash_balance: balances.cash_balance + amount + commission,
            float_balance: balances.float_balance - amount,
        },
        TransactionKind::Withdrawal => PlatformBalances {
            cash_balance: balances.cash_balance - amount + commission,
            float_balance: balances.float_balance + amount,
        },
    }
}

/// Project balances across a sequence of transactions, oldest first.
pub fn project_all(
    balances: PlatformBalances,
    transactions: &[MobileMoneyTransaction],
) -> PlatformBalances {
    transactions.iter().fold(balances, |acc, tx| {
        project(acc, tx.kind, tx.amount, tx.commission)
    })
}

/// Outcome of comparing a counted drawer against the projected cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub expected_cash: i64,
    pub counted_cash: i64,
    /// `counted - expected`: positive is a surplus, negative a shortfall.
    pub delta: i64,
}

impl Reconciliation {
    pub fn balanced(self) -> bool {
        self.delta == 0
    }
}

/// Reconcile a day: opening cash plus the day's transactions against what
/// was physically counted.
pub fn reconcile(
    opening_cash: i64,
    transactions: &[MobileMoneyTransaction],
    counted_cash: i64,
) -> Reconciliation {
    let opening = PlatformBalances {
        cash_balance: opening_cash,
        float_balance: 0,
    };
    let expected_cash = project_all(opening, transactions).cash_balance;
    Reconciliation {
        expected_cash,
        counted_cash,
        delta: counted_cash - expected_cash,
    }
}
