//! # Shopkeeper Ledger
//!
//! Sign rules for ledger entries and reconstruction of historical balances.
//!
//! ## Balance-Delta Sign Table
//! ```text
//! ┌────────────────────┬────────────┬───────────────────────────────────────┐
//! │ Transaction type   │ Δ balance  │ Meaning                               │
//! ├────────────────────┼────────────┼───────────────────────────────────────┤
//! │ SALE               │ −amount    │ they owe us more (we sold to them)    │
//! │ PURCHASE           │ +amount    │ we owe them more (we bought from them)│
//! │ PAYMENT_RECEIVED   │ +amount    │ reduces what they owe us              │
//! │ PAYMENT_MADE       │ −amount    │ reduces what we owe them              │
//! └────────────────────┴────────────┴───────────────────────────────────────┘
//!   balance < 0 → shopkeeper owes the business ("Due")
//!   balance > 0 → business owes the shopkeeper ("Owed")
//! ```
//!
//! ## Running Balance
//! The store only keeps the *current* balance. The balance right after an
//! older entry is found by walking back from the present and undoing every
//! newer entry:
//! ```text
//!   newest ─────────────────────────────────────────► oldest
//!   t0            t1            t2
//!   current       current       current
//!                 − Δ(t0)       − Δ(t0) − Δ(t1)
//! ```

use serde::Serialize;
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Shopkeeper, Transaction, TransactionType};

// =============================================================================
// Sign Table
// =============================================================================

impl TransactionType {
    /// Signed effect of an entry of this type on the shopkeeper balance.
    ///
    /// `amount` is the (positive) transaction amount.
    pub fn balance_delta(self, amount: Money) -> Money {
        match self {
            TransactionType::Sale => -amount,
            TransactionType::Purchase => amount,
            TransactionType::PaymentReceived => amount,
            TransactionType::PaymentMade => -amount,
        }
    }
}

impl Transaction {
    /// Signed effect of this entry on its shopkeeper's balance.
    #[inline]
    pub fn balance_delta(&self) -> Money {
        self.kind.balance_delta(self.amount)
    }
}

// =============================================================================
// Balance Status
// =============================================================================

/// Which way a balance points, with the magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "status", content = "amount", rename_all = "snake_case")]
#[ts(export)]
pub enum BalanceStatus {
    /// The shopkeeper owes the business this much.
    Due(Money),
    /// The business owes the shopkeeper this much.
    Owed(Money),
    Settled,
}

impl BalanceStatus {
    pub fn of(balance: Money) -> Self {
        if balance.is_negative() {
            BalanceStatus::Due(balance.abs())
        } else if balance.is_positive() {
            BalanceStatus::Owed(balance)
        } else {
            BalanceStatus::Settled
        }
    }

    /// Unsigned magnitude.
    pub fn amount(&self) -> Money {
        match self {
            BalanceStatus::Due(amount) | BalanceStatus::Owed(amount) => *amount,
            BalanceStatus::Settled => Money::zero(),
        }
    }
}

/// `Rs 1,000.00 Due`, `Rs 250.00 Owed` or `Settled`.
impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceStatus::Due(amount) => write!(f, "{amount} Due"),
            BalanceStatus::Owed(amount) => write!(f, "{amount} Owed"),
            BalanceStatus::Settled => write!(f, "Settled"),
        }
    }
}

impl Shopkeeper {
    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::of(self.balance)
    }
}

// =============================================================================
// Balance Reconstruction
// =============================================================================

/// Applies every entry's delta to `opening`, in any order.
pub fn replay_balance<'a, I>(opening: Money, transactions: I) -> Money
where
    I: IntoIterator<Item = &'a Transaction>,
{
    opening + transactions.into_iter().map(Transaction::balance_delta).sum::<Money>()
}

/// Balance immediately after each entry, for a newest-first list.
///
/// Element `i` is `current` with the deltas of entries `0..i` undone.
/// Element 0 is therefore the current balance.
pub fn running_balances(current: Money, newest_first: &[&Transaction]) -> Vec<Money> {
    let mut balance = current;
    newest_first
        .iter()
        .map(|tx| {
            let after = balance;
            balance -= tx.balance_delta();
            after
        })
        .collect()
}

/// One row of a shopkeeper statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LedgerEntry {
    pub transaction: Transaction,
    /// Shopkeeper balance right after this entry was applied.
    pub balance_after: Money,
}

/// A shopkeeper's full account history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Statement {
    pub shopkeeper: Shopkeeper,
    /// Balance before the oldest entry.
    pub opening_balance: Money,
    /// Newest first.
    pub entries: Vec<LedgerEntry>,
    pub closing_balance: Money,
    pub status: BalanceStatus,
}

/// Orders a shopkeeper's entries newest first.
///
/// Entries with the same date keep their recorded order reversed, so the
/// one recorded last is listed first.
pub fn entries_newest_first<'a>(
    shopkeeper_id: &str,
    transactions: &'a [Transaction],
) -> Vec<&'a Transaction> {
    let mut own: Vec<(usize, &Transaction)> = transactions
        .iter()
        .enumerate()
        .filter(|(_, tx)| tx.shopkeeper_id == shopkeeper_id)
        .collect();
    own.sort_by(|(ia, a), (ib, b)| b.date.cmp(&a.date).then(ib.cmp(ia)));
    own.into_iter().map(|(_, tx)| tx).collect()
}

/// A shopkeeper's entries, newest first, each with its running balance.
pub fn ledger(shopkeeper: &Shopkeeper, transactions: &[Transaction]) -> Vec<LedgerEntry> {
    let ordered = entries_newest_first(&shopkeeper.id, transactions);
    let balances = running_balances(shopkeeper.balance, &ordered);

    ordered
        .into_iter()
        .zip(balances)
        .map(|(tx, balance_after)| LedgerEntry {
            transaction: tx.clone(),
            balance_after,
        })
        .collect()
}

/// Builds the statement for one shopkeeper from the full transaction list.
pub fn statement(shopkeeper: &Shopkeeper, transactions: &[Transaction]) -> Statement {
    let entries = ledger(shopkeeper, transactions);
    let opening_balance = shopkeeper.balance
        - entries
            .iter()
            .map(|entry| entry.transaction.balance_delta())
            .sum::<Money>();

    Statement {
        shopkeeper: shopkeeper.clone(),
        opening_balance,
        entries,
        closing_balance: shopkeeper.balance,
        status: shopkeeper.status(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, day, 10, 0, 0).unwrap()
    }

    fn tx(id: &str, kind: TransactionType, amount: i64, day: u32) -> Transaction {
        Transaction {
            id: id.to_string(),
            shopkeeper_id: "s-1".to_string(),
            date: at(day),
            kind,
            amount: Money::from_major(amount),
            notes: String::new(),
            related_items: None,
            sale_id: None,
        }
    }

    fn shopkeeper(balance: i64) -> Shopkeeper {
        Shopkeeper {
            id: "s-1".to_string(),
            name: "Ali Computers".to_string(),
            contact: "0300-1234567".to_string(),
            address: "Hall Road, Lahore".to_string(),
            balance: Money::from_major(balance),
            created_at: at(1),
        }
    }

    #[test]
    fn test_sign_table() {
        let amount = Money::from_major(100);
        assert_eq!(TransactionType::Sale.balance_delta(amount), Money::from_major(-100));
        assert_eq!(TransactionType::Purchase.balance_delta(amount), Money::from_major(100));
        assert_eq!(
            TransactionType::PaymentReceived.balance_delta(amount),
            Money::from_major(100)
        );
        assert_eq!(TransactionType::PaymentMade.balance_delta(amount), Money::from_major(-100));
    }

    #[test]
    fn test_sale_then_payment_leaves_600_due() {
        let entries = [
            tx("t1", TransactionType::Sale, 1000, 1),
            tx("t2", TransactionType::PaymentReceived, 400, 2),
        ];
        let after_sale = replay_balance(Money::zero(), &entries[..1]);
        assert_eq!(after_sale, Money::from_major(-1000));
        assert_eq!(BalanceStatus::of(after_sale).to_string(), "Rs 1,000.00 Due");

        let balance = replay_balance(Money::zero(), &entries);
        assert_eq!(balance, Money::from_major(-600));
    }

    #[test]
    fn test_balance_status() {
        assert_eq!(BalanceStatus::of(Money::zero()), BalanceStatus::Settled);
        assert_eq!(
            BalanceStatus::of(Money::from_major(250)),
            BalanceStatus::Owed(Money::from_major(250))
        );
        assert_eq!(BalanceStatus::Owed(Money::from_major(250)).to_string(), "Rs 250.00 Owed");
        assert_eq!(BalanceStatus::of(Money::from_major(-40)).amount(), Money::from_major(40));
    }

    #[test]
    fn test_running_balances_walk_back_from_current() {
        // Oldest to newest: SALE 1000, PAYMENT_RECEIVED 400, PURCHASE 300.
        // Balances after each: -1000, -600, -300 (current).
        let sale = tx("t1", TransactionType::Sale, 1000, 1);
        let payment = tx("t2", TransactionType::PaymentReceived, 400, 2);
        let purchase = tx("t3", TransactionType::Purchase, 300, 3);

        let newest_first = [&purchase, &payment, &sale];
        let balances = running_balances(Money::from_major(-300), &newest_first);
        assert_eq!(
            balances,
            vec![
                Money::from_major(-300),
                Money::from_major(-600),
                Money::from_major(-1000)
            ]
        );
    }

    #[test]
    fn test_running_balances_empty() {
        assert!(running_balances(Money::from_major(10), &[]).is_empty());
    }

    #[test]
    fn test_statement_orders_and_filters() {
        let mut other = tx("x1", TransactionType::Sale, 999, 2);
        other.shopkeeper_id = "s-2".to_string();

        let transactions = vec![
            tx("t1", TransactionType::Sale, 1000, 1),
            other,
            tx("t2", TransactionType::PaymentReceived, 400, 3),
            tx("t3", TransactionType::PaymentMade, 50, 3),
        ];
        let sk = shopkeeper(-650);

        let stmt = statement(&sk, &transactions);
        let ids: Vec<&str> = stmt.entries.iter().map(|e| e.transaction.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2", "t1"]);

        assert_eq!(stmt.entries[0].balance_after, Money::from_major(-650));
        assert_eq!(stmt.entries[1].balance_after, Money::from_major(-600));
        assert_eq!(stmt.entries[2].balance_after, Money::from_major(-1000));
        assert_eq!(stmt.opening_balance, Money::zero());
        assert_eq!(stmt.status, BalanceStatus::Due(Money::from_major(650)));
    }

    #[test]
    fn test_statement_with_opening_balance() {
        let transactions = vec![tx("t1", TransactionType::Purchase, 200, 1)];
        let stmt = statement(&shopkeeper(700), &transactions);
        assert_eq!(stmt.opening_balance, Money::from_major(500));
        assert_eq!(stmt.closing_balance, Money::from_major(700));
    }
}
