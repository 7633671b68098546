//! # Sample Data
//!
//! The built-in data set a fresh installation starts with, so the reports
//! have something to show before the first real sale.
//!
//! ## What Gets Seeded
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products       8 items across CPUs, memory, storage, GPUs, PSUs,      │
//! │                 monitors and peripherals (one low, one out of stock)   │
//! │  shopkeepers    3 trade accounts: one Due, one Owed, one Settled       │
//! │  transactions   ledger entries that reproduce those balances exactly   │
//! │  sales          3 sales; the credit sale is linked to its SALE entry   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dates are placed relative to `now` so that daily and weekly reports on a
//! fresh install are not empty.

use chrono::{DateTime, Duration, Utc};
use stockbook_core::ledger::replay_balance;
use stockbook_core::timestamp::new_id;
use stockbook_core::{
    Money, PaymentMethod, Product, Sale, SaleItem, Shopkeeper, Transaction, TransactionType,
};

/// Everything the store seeds when a snapshot key is missing.
#[derive(Debug, Clone, Default)]
pub struct SampleData {
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub shopkeepers: Vec<Shopkeeper>,
    pub transactions: Vec<Transaction>,
}

/// (code, name, category, price, cost, quantity on hand)
const PRODUCTS: &[(&str, &str, &str, i64, i64, i64)] = &[
    ("CPU-I5-12400", "Intel Core i5-12400", "Processors", 52_000, 47_500, 11),
    ("CPU-R5-5600X", "AMD Ryzen 5 5600X", "Processors", 48_500, 44_000, 4),
    ("RAM-16-DDR4", "Kingston Fury 16GB DDR4 3200", "Memory", 12_500, 10_800, 23),
    ("SSD-512-NVME", "Samsung 980 512GB NVMe SSD", "Storage", 14_000, 12_200, 17),
    ("GPU-RTX3060", "MSI GeForce RTX 3060 12GB", "Graphics Cards", 105_000, 96_000, 0),
    ("PSU-650-BRZ", "Cooler Master MWE 650 Bronze", "Power Supplies", 17_500, 15_000, 7),
    ("MON-24-IPS", "Dell P2422H 24\" IPS Monitor", "Monitors", 42_000, 37_500, 2),
    ("KB-K120", "Logitech K120 Keyboard", "Peripherals", 2_200, 1_600, 39),
];

/// Builds the sample set around `now`.
pub fn sample_data(now: DateTime<Utc>) -> SampleData {
    let days_ago = |days: i64| now - Duration::days(days);

    let products: Vec<Product> = PRODUCTS
        .iter()
        .enumerate()
        .map(|(i, (code, name, category, price, cost, quantity))| {
            let created = days_ago(30 - i as i64);
            Product {
                id: new_id(),
                code: code.to_string(),
                name: name.to_string(),
                description: String::new(),
                price: Money::from_major(*price),
                cost_price: Money::from_major(*cost),
                quantity: *quantity,
                category: category.to_string(),
                created_at: created,
                updated_at: created,
            }
        })
        .collect();

    let shopkeeper = |name: &str, contact: &str, address: &str, created: DateTime<Utc>| Shopkeeper {
        id: new_id(),
        name: name.to_string(),
        contact: contact.to_string(),
        address: address.to_string(),
        balance: Money::zero(),
        created_at: created,
    };
    let mut shopkeepers = vec![
        shopkeeper("Al-Noor Computers", "0300-4567890", "Hall Road, Lahore", days_ago(45)),
        shopkeeper("Rehman Traders", "0321-2233445", "Saddar, Karachi", days_ago(40)),
        shopkeeper("City Tech", "0333-9988776", "Blue Area, Islamabad", days_ago(20)),
    ];

    // Products by position in PRODUCTS.
    let item = |idx: usize, qty: i64| SaleItem::from_product(&products[idx], qty);

    let credit_date = days_ago(6);
    let credit_items = vec![item(2, 2)];
    let credit_sale = sale(
        1,
        credit_date,
        credit_items,
        PaymentMethod::Credit,
        Some(shopkeepers[0].id.clone()),
    );
    let sales = vec![
        credit_sale.clone(),
        sale(2, days_ago(2), vec![item(0, 1), item(3, 1)], PaymentMethod::Cash, None),
        sale(
            3,
            now - Duration::minutes(30),
            vec![item(6, 1), item(7, 1)],
            PaymentMethod::Card,
            None,
        ),
    ];

    let entry = |shopkeeper: &Shopkeeper,
                 kind: TransactionType,
                 amount: i64,
                 date: DateTime<Utc>,
                 notes: &str| Transaction {
        id: new_id(),
        shopkeeper_id: shopkeeper.id.clone(),
        date,
        kind,
        amount: Money::from_major(amount),
        notes: notes.to_string(),
        related_items: None,
        sale_id: None,
    };

    let transactions = vec![
        Transaction {
            id: new_id(),
            shopkeeper_id: shopkeepers[0].id.clone(),
            date: credit_date,
            kind: TransactionType::Sale,
            amount: credit_sale.total,
            notes: format!("Sale - Invoice #{}", credit_sale.invoice_number),
            related_items: Some(credit_sale.items.clone()),
            sale_id: Some(credit_sale.id.clone()),
        },
        entry(
            &shopkeepers[0],
            TransactionType::PaymentReceived,
            15_000,
            days_ago(3),
            "Cash payment",
        ),
        entry(
            &shopkeepers[1],
            TransactionType::Purchase,
            192_000,
            days_ago(10),
            "2x RTX 3060 stock",
        ),
        entry(
            &shopkeepers[1],
            TransactionType::PaymentMade,
            150_000,
            days_ago(8),
            "Bank transfer",
        ),
        entry(
            &shopkeepers[2],
            TransactionType::Purchase,
            30_000,
            days_ago(5),
            "Keyboards and mice",
        ),
        entry(
            &shopkeepers[2],
            TransactionType::PaymentMade,
            30_000,
            days_ago(4),
            "Paid in full",
        ),
    ];

    for shopkeeper in &mut shopkeepers {
        let own = transactions
            .iter()
            .filter(|tx| tx.shopkeeper_id == shopkeeper.id);
        shopkeeper.balance = replay_balance(Money::zero(), own);
    }

    SampleData {
        products,
        sales,
        shopkeepers,
        transactions,
    }
}

fn sale(
    seq: u32,
    date: DateTime<Utc>,
    items: Vec<SaleItem>,
    payment_method: PaymentMethod,
    shopkeeper_id: Option<String>,
) -> Sale {
    Sale {
        id: new_id(),
        invoice_number: format!("INV-{}-{:04}", date.format("%Y%m%d"), seq),
        date,
        total: items.iter().map(|i| i.total).sum(),
        items,
        payment_method,
        shopkeeper_id,
        customer_id: None,
        notes: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbook_core::ledger::BalanceStatus;
    use stockbook_core::timestamp;

    #[test]
    fn test_balances_match_ledger() {
        let data = sample_data(timestamp::now());
        for shopkeeper in &data.shopkeepers {
            let own = data
                .transactions
                .iter()
                .filter(|tx| tx.shopkeeper_id == shopkeeper.id);
            assert_eq!(shopkeeper.balance, replay_balance(Money::zero(), own));
        }

        let statuses: Vec<BalanceStatus> = data.shopkeepers.iter().map(|s| s.status()).collect();
        assert_eq!(statuses[0], BalanceStatus::Due(Money::from_major(10_000)));
        assert_eq!(statuses[1], BalanceStatus::Owed(Money::from_major(42_000)));
        assert_eq!(statuses[2], BalanceStatus::Settled);
    }

    #[test]
    fn test_credit_sale_is_linked() {
        let data = sample_data(timestamp::now());
        let credit = &data.sales[0];
        let linked = data
            .transactions
            .iter()
            .find(|tx| tx.sale_id.as_deref() == Some(credit.id.as_str()))
            .unwrap();
        assert_eq!(linked.amount, credit.total);
        assert_eq!(Some(&linked.shopkeeper_id), credit.shopkeeper_id.as_ref());
    }

    #[test]
    fn test_codes_and_invoices_are_unique() {
        let data = sample_data(timestamp::now());
        let mut codes: Vec<&str> = data.products.iter().map(|p| p.code.as_str()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), data.products.len());

        let mut invoices: Vec<&str> = data.sales.iter().map(|s| s.invoice_number.as_str()).collect();
        invoices.sort();
        invoices.dedup();
        assert_eq!(invoices.len(), data.sales.len());
    }
}
