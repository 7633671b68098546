//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! Everything the shop's books depend on, with zero I/O: the entity shapes,
//! integer money, the shopkeeper ledger sign rules and the read-side reports.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 stockbook CLI (apps/cli)                        │   │
//! │  │    config ──► validation ──► store mutators ──► JSON output     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            stockbook-store (EntityStore + snapshot)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │  report   │  │   │
//! │  │   │  Product  │  │   Money   │  │ sign table│  │  sales    │  │   │
//! │  │   │   Sale    │  │           │  │ running   │  │  stock    │  │   │
//! │  │   │Transaction│  │           │  │ balance   │  │ financial │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Product, Sale, Shopkeeper, Transaction, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - Balance deltas and running-balance reconstruction
//! - [`report`] - Sales, stock, financial, expense and repair reports
//! - [`validation`] - Input checks the front end runs before calling the store
//! - [`timestamp`] - Millisecond timestamps, ids and ISO-8601 serde helpers
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockbook_core::ledger::BalanceStatus;
//! use stockbook_core::{Money, TransactionType};
//!
//! let mut balance = Money::zero();
//! balance += TransactionType::Sale.balance_delta(Money::from_major(1000));
//! balance += TransactionType::PaymentReceived.balance_delta(Money::from_major(400));
//!
//! assert_eq!(balance, Money::from_major(-600));
//! assert_eq!(BalanceStatus::of(balance), BalanceStatus::Due(Money::from_major(600)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod report;
pub mod timestamp;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level at or below which a product counts as "low stock".
///
/// Products at zero (or below, after an oversell) are reported as out of
/// stock instead. The store can override this per installation.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Number of products listed in a sales report's top-sellers table.
pub const TOP_SELLING_LIMIT: usize = 5;
