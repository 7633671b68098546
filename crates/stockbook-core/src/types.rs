//! # Domain Types
//!
//! The entities the shop keeps on its books.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │   Shopkeeper    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  items[]        │──►│  id (UUID)      │       │
//! │  │  code (SKU)     │   │  invoice_number │   │  balance (±)    │       │
//! │  │  price/cost     │   │  total          │   └────────▲────────┘       │
//! │  │  quantity       │   │  shopkeeper_id? │            │                │
//! │  └─────────────────┘   │  customer_id?   │   ┌────────┴────────┐       │
//! │                        └────────┬────────┘   │  Transaction    │       │
//! │  ┌─────────────────┐            │            │  ─────────────  │       │
//! │  │    Customer     │◄───────────┘            │  type (enum)    │       │
//! │  │  (summary is    │                         │  amount (> 0)   │       │
//! │  │   derived)      │                         │  sale_id?       │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  Expense, RepairTicket, User: standalone records                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Shape
//! Every entity serializes with camelCase keys and ISO-8601 dates, which is
//! exactly what the persistence layer writes under each key.
//!
//! `New*` structs are the inputs to the store's `add_*` operations; the
//! store assigns ids and timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product held in stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// SKU / barcode, unique across products.
    pub code: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Selling price per unit.
    pub price: Money,

    /// Purchase cost per unit (drives profit and stock valuation).
    pub cost_price: Money,

    /// Units on hand. Can go negative after an oversell.
    pub quantity: i64,

    #[serde(default)]
    pub category: String,

    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Stock valued at cost (quantity × cost price).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.cost_price.multiply_quantity(self.quantity)
    }

    /// Profit per unit at the current price.
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.price - self.cost_price
    }

    /// Exactly zero on hand. Oversold products (negative quantity) are
    /// neither out of stock nor low stock.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// In stock, but at or below `threshold` units.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.quantity > 0 && self.quantity <= threshold
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    pub cost_price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub category: String,
}

// =============================================================================
// Sale
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    BankTransfer,
    /// Sold on account; settled later through the shopkeeper ledger.
    Credit,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
            PaymentMethod::Credit => write!(f, "credit"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "bank_transfer" | "bank" | "transfer" => Ok(PaymentMethod::BankTransfer),
            "credit" => Ok(PaymentMethod::Credit),
            other => Err(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("'{other}' is not one of cash, card, bank_transfer, credit"),
            }),
        }
    }
}

/// A line on a sale.
///
/// Product name and code are snapshotted so that editing or deleting the
/// product later does not rewrite sales history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItem {
    pub product_id: String,
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    /// Unit price charged on this sale.
    pub price: Money,
    /// `price × quantity`.
    pub total: Money,
}

impl SaleItem {
    /// Builds a line at the product's current selling price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        Self::with_price(product, quantity, product.price)
    }

    /// Builds a line at a negotiated unit price.
    pub fn with_price(product: &Product, quantity: i64, price: Money) -> Self {
        SaleItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_code: product.code.clone(),
            quantity,
            price,
            total: price.multiply_quantity(quantity),
        }
    }

    /// Recomputes `total` from price and quantity.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,

    /// Human-facing invoice number, unique across sales.
    pub invoice_number: String,

    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    pub items: Vec<SaleItem>,

    /// Sum of item totals.
    pub total: Money,

    pub payment_method: PaymentMethod,

    /// Set when sold on account to a shopkeeper. Never set together with
    /// `customer_id`.
    #[serde(default)]
    pub shopkeeper_id: Option<String>,

    #[serde(default)]
    pub customer_id: Option<String>,

    #[serde(default)]
    pub notes: String,
}

impl Sale {
    /// Total units across all lines.
    pub fn units(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Input for recording a sale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    /// Generated by the store when absent.
    #[serde(default)]
    pub invoice_number: Option<String>,

    /// Defaults to now.
    #[serde(default, with = "crate::timestamp::iso_option")]
    pub date: Option<DateTime<Utc>>,

    pub items: Vec<SaleItem>,

    #[serde(default)]
    pub payment_method: PaymentMethod,

    #[serde(default)]
    pub shopkeeper_id: Option<String>,

    #[serde(default)]
    pub customer_id: Option<String>,

    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Shopkeeper
// =============================================================================

/// A trade account: another shop we sell to on credit or buy stock from.
///
/// ## Balance Sign
/// - `balance < 0`: the shopkeeper owes the business ("Due")
/// - `balance > 0`: the business owes the shopkeeper ("Owed")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Shopkeeper {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
    pub balance: Money,
    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for opening a shopkeeper account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShopkeeper {
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
    /// Balance carried over from before the account was opened here.
    #[serde(default)]
    pub opening_balance: Money,
}

// =============================================================================
// Transaction
// =============================================================================

/// What a ledger entry records.
///
/// The balance effect of each variant lives in [`crate::ledger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum TransactionType {
    /// We sold goods to the shopkeeper on account.
    Sale,
    /// We bought goods from the shopkeeper on account.
    Purchase,
    /// The shopkeeper paid us.
    PaymentReceived,
    /// We paid the shopkeeper.
    PaymentMade,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Sale,
        TransactionType::Purchase,
        TransactionType::PaymentReceived,
        TransactionType::PaymentMade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "SALE",
            TransactionType::Purchase => "PURCHASE",
            TransactionType::PaymentReceived => "PAYMENT_RECEIVED",
            TransactionType::PaymentMade => "PAYMENT_MADE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        TransactionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "transaction type".to_string(),
                reason: format!(
                    "'{s}' is not one of SALE, PURCHASE, PAYMENT_RECEIVED, PAYMENT_MADE"
                ),
            })
    }
}

/// An entry in a shopkeeper's ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub shopkeeper_id: String,

    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Always positive; direction comes from `kind`.
    pub amount: Money,

    #[serde(default)]
    pub notes: String,

    /// Snapshot of the sale lines, kept for audit.
    #[serde(default)]
    pub related_items: Option<Vec<SaleItem>>,

    /// The sale that produced this entry, if any.
    #[serde(default)]
    pub sale_id: Option<String>,
}

/// Input for recording a ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub shopkeeper_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Money,
    #[serde(default)]
    pub notes: String,
    /// Defaults to now.
    #[serde(default, with = "crate::timestamp::iso_option")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub related_items: Option<Vec<SaleItem>>,
    #[serde(default)]
    pub sale_id: Option<String>,
}

impl NewTransaction {
    pub fn new(shopkeeper_id: impl Into<String>, kind: TransactionType, amount: Money) -> Self {
        NewTransaction {
            shopkeeper_id: shopkeeper_id.into(),
            kind,
            amount,
            notes: String::new(),
            date: None,
            related_items: None,
            sale_id: None,
        }
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn dated(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A walk-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    /// National identity card number.
    #[serde(default)]
    pub cnic: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub cnic: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A customer together with figures derived from their sales.
///
/// Never persisted; see [`crate::report::customer_summary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerSummary {
    #[serde(flatten)]
    pub customer: Customer,
    pub total_purchases: usize,
    pub total_amount_spent: Money,
    /// Newest first.
    pub purchase_history: Vec<Sale>,
}

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UserRole {
    #[default]
    Admin,
    Staff,
}

/// The logged-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Expense
// =============================================================================

/// Money spent running the shop (rent, utilities, wages...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Expense {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub amount: Money,
    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub amount: Money,
    /// Defaults to now.
    #[serde(default, with = "crate::timestamp::iso_option")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Repair Ticket
// =============================================================================

/// Where a repair job stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RepairStatus {
    #[default]
    Received,
    InProgress,
    Completed,
    Delivered,
    Cancelled,
}

impl RepairStatus {
    /// Still on the bench (not finished, handed back or cancelled).
    pub fn is_open(&self) -> bool {
        matches!(self, RepairStatus::Received | RepairStatus::InProgress)
    }
}

impl fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RepairStatus::Received => "received",
            RepairStatus::InProgress => "in_progress",
            RepairStatus::Completed => "completed",
            RepairStatus::Delivered => "delivered",
            RepairStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

impl FromStr for RepairStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "received" => Ok(RepairStatus::Received),
            "in_progress" => Ok(RepairStatus::InProgress),
            "completed" => Ok(RepairStatus::Completed),
            "delivered" => Ok(RepairStatus::Delivered),
            "cancelled" | "canceled" => Ok(RepairStatus::Cancelled),
            other => Err(ValidationError::InvalidFormat {
                field: "repair status".to_string(),
                reason: format!(
                    "'{other}' is not one of received, in_progress, completed, delivered, cancelled"
                ),
            }),
        }
    }
}

/// A device booked in for repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RepairTicket {
    pub id: String,
    pub ticket_number: String,
    pub customer_name: String,
    #[serde(default)]
    pub contact: String,
    /// e.g. "Dell Latitude 5490".
    pub device: String,
    pub issue: String,
    pub status: RepairStatus,
    pub estimated_cost: Money,
    /// Charged amount, known once the job is completed.
    #[serde(default)]
    pub final_cost: Option<Money>,
    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub received_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRepair {
    /// Generated by the store when absent.
    #[serde(default)]
    pub ticket_number: Option<String>,
    pub customer_name: String,
    #[serde(default)]
    pub contact: String,
    pub device: String,
    pub issue: String,
    #[serde(default)]
    pub estimated_cost: Money,
    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
