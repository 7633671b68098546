//! `stockbook data ...`

use clap::Subcommand;
use serde::Serialize;
use serde_json::Value;
use stockbook_store::{EntityStore, SnapshotBackend};

use super::{require_login, to_output};
use crate::error::{CliError, CliResult};

#[derive(Debug, Subcommand)]
pub enum DataAction {
    /// Replace every collection with the built-in sample data
    Seed {
        /// Confirm that existing data will be replaced
        #[arg(long)]
        yes: bool,
    },

    /// Delete every collection (the login session is kept)
    Clear {
        /// Confirm that all data will be deleted
        #[arg(long)]
        yes: bool,
    },
}

/// Collection sizes after a bulk operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Counts {
    products: usize,
    sales: usize,
    shopkeepers: usize,
    transactions: usize,
    customers: usize,
    expenses: usize,
    repairs: usize,
}

impl Counts {
    fn of<B: SnapshotBackend>(store: &EntityStore<B>) -> Self {
        Counts {
            products: store.products().len(),
            sales: store.sales().len(),
            shopkeepers: store.shopkeepers().len(),
            transactions: store.transactions().len(),
            customers: store.customers().len(),
            expenses: store.expenses().len(),
            repairs: store.repairs().len(),
        }
    }
}

fn confirm(yes: bool, what: &str) -> CliResult<()> {
    if yes {
        Ok(())
    } else {
        Err(CliError::validation(format!("{what}; pass --yes to confirm")))
    }
}

pub fn run<B: SnapshotBackend>(action: DataAction, store: &mut EntityStore<B>) -> CliResult<Value> {
    require_login(store)?;

    match action {
        DataAction::Seed { yes } => {
            confirm(yes, "This replaces all data with the sample set")?;
            store.reset_to_sample_data()?;
        }
        DataAction::Clear { yes } => {
            confirm(yes, "This deletes all data")?;
            store.clear_data()?;
        }
    }

    to_output(&Counts::of(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::logged_in_store;
    use crate::error::ErrorCode;

    #[test]
    fn test_clear_needs_confirmation() {
        let mut store = logged_in_store();
        let err = run(DataAction::Clear { yes: false }, &mut store).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!store.products().is_empty());
    }

    #[test]
    fn test_clear_then_seed() {
        let mut store = logged_in_store();

        let cleared = run(DataAction::Clear { yes: true }, &mut store).unwrap();
        assert_eq!(cleared["products"], 0);
        assert_eq!(cleared["transactions"], 0);
        assert!(store.current_user().is_some());

        let seeded = run(DataAction::Seed { yes: true }, &mut store).unwrap();
        assert_eq!(seeded["products"], 8);
        assert_eq!(seeded["shopkeepers"], 3);
        assert_eq!(seeded["customers"], 0);
    }
}
