//! # stockbook-store: Entity Store for Stockbook
//!
//! Owns the shop's collections and keeps a JSON snapshot of them in sync.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Data Flow                              │
//! │                                                                         │
//! │  CLI command (sale add)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 stockbook-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  EntityStore  │    │   Snapshot    │    │     Seed     │  │   │
//! │  │   │  (store.rs)   │───►│ (snapshot.rs) │    │  (seed.rs)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ collections   │    │ FileSnapshot  │    │ sample data  │  │   │
//! │  │   │ side effects  │    │ MemorySnapshot│    │ for new      │  │   │
//! │  │   │ reports       │    │               │    │ installs     │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data_dir>/products.json, sales.json, ...                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The entity store and its options
//! - [`snapshot`] - Snapshot backends and key names
//! - [`seed`] - Built-in sample data
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stockbook_store::{EntityStore, FileSnapshot, StoreOptions};
//!
//! let backend = FileSnapshot::open("./data")?;
//! let store = EntityStore::open(backend, StoreOptions::default())?;
//!
//! let report = store.stock_report();
//! println!("{} units on hand", report.total_items);
//! # Ok::<(), stockbook_store::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod seed;
pub mod snapshot;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use snapshot::{FileSnapshot, MemorySnapshot, SnapshotBackend};
pub use store::{Credentials, EntityStore, StoreOptions};
