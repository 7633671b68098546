//! # Command Handlers
//!
//! One module per area of the shop. Each handler checks the operator's
//! input, looks up referenced records (NOT_FOUND when missing), calls the
//! store, and hands back JSON for `main` to print.
//!
//! ```text
//! main.rs ── Commands ──► commands::<area>::run(action, &mut store)
//!                                   │
//!                                   ├── validation (stockbook-core)
//!                                   ├── EntityStore mutator / report
//!                                   └── serde_json::Value
//! ```

pub mod auth;
pub mod config;
pub mod customer;
pub mod data;
pub mod expense;
pub mod product;
pub mod repair;
pub mod report;
pub mod sale;
pub mod shopkeeper;
pub mod transaction;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use stockbook_core::report::{DateRange, Timeframe};
use stockbook_core::timestamp;
use stockbook_store::{EntityStore, SnapshotBackend};

use crate::error::{CliError, CliResult};

// =============================================================================
// Shared Helpers
// =============================================================================

/// Refuses to touch the books unless someone is logged in.
pub fn require_login<B: SnapshotBackend>(store: &EntityStore<B>) -> CliResult<()> {
    match store.current_user() {
        Some(_) => Ok(()),
        None => Err(CliError::unauthorized(
            "Not logged in; run `stockbook login` first",
        )),
    }
}

pub fn to_output<T: Serialize + ?Sized>(value: &T) -> CliResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Result of a delete command.
#[derive(Debug, Serialize)]
pub struct Deleted<'a> {
    pub id: &'a str,
    pub deleted: bool,
}

/// Maps a store delete result to output, or NOT_FOUND.
pub fn deleted(resource: &str, id: &str, removed: bool) -> CliResult<Value> {
    if !removed {
        return Err(CliError::not_found(resource, id));
    }
    to_output(&Deleted { id, deleted: true })
}

/// Empty strings mean "not given".
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` (local midnight).
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(at) = timestamp::parse_iso(s) {
        return Ok(at);
    }

    let day = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{s}' is not a date (expected YYYY-MM-DD or RFC 3339)"))?;
    Local
        .from_local_datetime(&day.and_time(NaiveTime::MIN))
        .earliest()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| format!("'{s}' does not exist in the local time zone"))
}

// =============================================================================
// Report Windows
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

/// `--period` with the `--from`/`--to` pair a custom window needs.
#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    /// Report window
    #[arg(short, long, value_enum, default_value = "daily")]
    pub period: Period,

    /// Start of a custom window (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<DateTime<Utc>>,

    /// End of a custom window, inclusive
    #[arg(long, value_parser = parse_date)]
    pub to: Option<DateTime<Utc>>,
}

impl WindowArgs {
    pub fn timeframe(&self) -> CliResult<Timeframe> {
        let timeframe = match self.period {
            Period::Daily => Timeframe::Daily,
            Period::Weekly => Timeframe::Weekly,
            Period::Monthly => Timeframe::Monthly,
            Period::Yearly => Timeframe::Yearly,
            Period::Custom => match (self.from, self.to) {
                (Some(start), Some(end)) => Timeframe::Custom(DateRange::new(start, end)),
                _ => {
                    return Err(CliError::validation(
                        "--period custom needs both --from and --to",
                    ))
                }
            },
        };

        if self.period != Period::Custom && (self.from.is_some() || self.to.is_some()) {
            return Err(CliError::validation(
                "--from/--to only apply to --period custom",
            ));
        }

        Ok(timeframe)
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use stockbook_store::{EntityStore, MemorySnapshot, StoreOptions};

    /// A seeded in-memory store with the default admin logged in.
    pub fn logged_in_store() -> EntityStore<MemorySnapshot> {
        let mut store = EntityStore::open(MemorySnapshot::new(), StoreOptions::default()).unwrap();
        assert!(store.login("admin", "admin123").unwrap());
        store
    }
}
