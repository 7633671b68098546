//! `stockbook shopkeeper ...`

use clap::Subcommand;
use serde::Serialize;
use serde_json::Value;
use stockbook_core::validation::validate_name;
use stockbook_core::{Money, NewShopkeeper, Shopkeeper};
use stockbook_store::{EntityStore, SnapshotBackend};

use super::{deleted, require_login, to_output};
use crate::error::{CliError, CliResult};

#[derive(Debug, Subcommand)]
pub enum ShopkeeperAction {
    /// Open a trade account
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        contact: String,

        #[arg(short, long, default_value = "")]
        address: String,

        /// Balance carried over (negative: they owe us)
        #[arg(long, allow_hyphen_values = true, default_value = "0")]
        opening_balance: Money,
    },

    /// List accounts with their balance status
    List,

    /// Change name, contact or address
    Update {
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        contact: Option<String>,

        #[arg(short, long)]
        address: Option<String>,
    },

    /// Account statement, newest entry first with running balances
    Ledger { id: String },

    /// Close an account (ledger entries and sales are kept)
    Delete { id: String },
}

/// A shopkeeper with its balance spelled out for the operator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShopkeeperRow<'a> {
    #[serde(flatten)]
    shopkeeper: &'a Shopkeeper,
    /// e.g. `Rs 1,000.00 Due`
    balance_label: String,
}

impl<'a> From<&'a Shopkeeper> for ShopkeeperRow<'a> {
    fn from(shopkeeper: &'a Shopkeeper) -> Self {
        ShopkeeperRow {
            shopkeeper,
            balance_label: shopkeeper.status().to_string(),
        }
    }
}

pub fn find<'a, B: SnapshotBackend>(store: &'a EntityStore<B>, id: &str) -> CliResult<&'a Shopkeeper> {
    store
        .shopkeeper(id)
        .ok_or_else(|| CliError::not_found("Shopkeeper", id))
}

pub fn run<B: SnapshotBackend>(action: ShopkeeperAction, store: &mut EntityStore<B>) -> CliResult<Value> {
    require_login(store)?;

    match action {
        ShopkeeperAction::Add {
            name,
            contact,
            address,
            opening_balance,
        } => {
            validate_name("name", &name)?;
            let shopkeeper = store.add_shopkeeper(NewShopkeeper {
                name,
                contact: contact.trim().to_string(),
                address: address.trim().to_string(),
                opening_balance,
            })?;
            to_output(&ShopkeeperRow::from(&shopkeeper))
        }

        ShopkeeperAction::List => {
            let rows: Vec<ShopkeeperRow> = store.shopkeepers().iter().map(ShopkeeperRow::from).collect();
            to_output(&rows)
        }

        ShopkeeperAction::Update {
            id,
            name,
            contact,
            address,
        } => {
            let mut updated = find(store, &id)?.clone();
            if let Some(name) = name {
                validate_name("name", &name)?;
                updated.name = name.trim().to_string();
            }
            if let Some(contact) = contact {
                updated.contact = contact.trim().to_string();
            }
            if let Some(address) = address {
                updated.address = address.trim().to_string();
            }

            let saved = store
                .update_shopkeeper(updated)?
                .ok_or_else(|| CliError::not_found("Shopkeeper", &id))?;
            to_output(&ShopkeeperRow::from(&saved))
        }

        ShopkeeperAction::Ledger { id } => {
            let statement = store
                .shopkeeper_ledger(&id)
                .ok_or_else(|| CliError::not_found("Shopkeeper", &id))?;
            to_output(&statement)
        }

        ShopkeeperAction::Delete { id } => {
            let removed = store.delete_shopkeeper(&id)?;
            deleted("Shopkeeper", &id, removed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::logged_in_store;
    use crate::error::ErrorCode;

    #[test]
    fn test_add_with_opening_balance() {
        let mut store = logged_in_store();
        let added = run(
            ShopkeeperAction::Add {
                name: "Hafeez Center Stall 12".to_string(),
                contact: String::new(),
                address: "Lahore".to_string(),
                opening_balance: Money::from_major(-2_500),
            },
            &mut store,
        )
        .unwrap();

        assert_eq!(added["balance"], -250_000);
        assert_eq!(added["balanceLabel"], "Rs 2,500.00 Due");
    }

    #[test]
    fn test_seeded_ledger_statement() {
        let mut store = logged_in_store();
        let id = store.shopkeepers()[0].id.clone();

        let statement = run(ShopkeeperAction::Ledger { id }, &mut store).unwrap();
        assert_eq!(statement["closingBalance"], -1_000_000);
        assert_eq!(statement["openingBalance"], 0);
        assert_eq!(statement["entries"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_update_keeps_balance() {
        let mut store = logged_in_store();
        let before = store.shopkeepers()[1].clone();

        let saved = run(
            ShopkeeperAction::Update {
                id: before.id.clone(),
                name: Some("Rehman Traders (Saddar)".to_string()),
                contact: None,
                address: None,
            },
            &mut store,
        )
        .unwrap();

        assert_eq!(saved["name"], "Rehman Traders (Saddar)");
        assert_eq!(saved["balance"], before.balance.minor());
    }

    #[test]
    fn test_unknown_ledger() {
        let mut store = logged_in_store();
        let err = run(
            ShopkeeperAction::Ledger {
                id: "missing".to_string(),
            },
            &mut store,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
