//! # Snapshot Persistence
//!
//! A flat key-value mirror of the store's collections. Each key holds one
//! JSON document (an array per collection, a single object for the
//! logged-in user) and is overwritten whole on every save.
//!
//! ## Layout on Disk
//! ```text
//! <data_dir>/
//! ├── products.json       [Product, ...]
//! ├── sales.json          [Sale, ...]
//! ├── shopkeepers.json    [Shopkeeper, ...]
//! ├── transactions.json   [Transaction, ...]
//! ├── customers.json      [Customer, ...]
//! ├── expenses.json       [Expense, ...]
//! ├── repairs.json        [RepairTicket, ...]
//! └── currentUser.json    User
//! ```
//!
//! Writes go to `<key>.json.tmp` first and are renamed into place, so a
//! crash mid-write leaves the previous document intact.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Keys
// =============================================================================

/// Snapshot key names.
pub mod keys {
    pub const PRODUCTS: &str = "products";
    pub const SALES: &str = "sales";
    pub const SHOPKEEPERS: &str = "shopkeepers";
    pub const TRANSACTIONS: &str = "transactions";
    pub const CUSTOMERS: &str = "customers";
    pub const CURRENT_USER: &str = "currentUser";
    pub const EXPENSES: &str = "expenses";
    pub const REPAIRS: &str = "repairs";

    /// Every collection key (the logged-in user is not a collection).
    pub const COLLECTIONS: [&str; 7] = [
        PRODUCTS,
        SALES,
        SHOPKEEPERS,
        TRANSACTIONS,
        CUSTOMERS,
        EXPENSES,
        REPAIRS,
    ];
}

// =============================================================================
// Backend Trait
// =============================================================================

/// Where snapshot documents live.
pub trait SnapshotBackend {
    /// Raw document under `key`, or `None` when the key was never written.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the document under `key`.
    fn write(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// Reads and decodes `key`.
pub fn read_json<T, B>(backend: &B, key: &str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    B: SnapshotBackend + ?Sized,
{
    match backend.read(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encodes `value` and overwrites `key`.
pub fn write_json<T, B>(backend: &mut B, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    B: SnapshotBackend + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    backend.write(key, &raw)
}

// =============================================================================
// File Backend
// =============================================================================

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    dir: PathBuf,
}

impl FileSnapshot {
    /// Opens (and creates if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        debug!(dir = %dir.display(), "Opened snapshot directory");
        Ok(FileSnapshot { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotBackend for FileSnapshot {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));

        fs::write(&tmp, value).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))?;

        debug!(key = %key, bytes = value.len(), "Wrote snapshot key");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

// =============================================================================
// Memory Backend
// =============================================================================

/// Keeps documents in a map. Used by tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    entries: HashMap<String, String>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotBackend for MemorySnapshot {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
