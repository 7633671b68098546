//! `stockbook transaction ...`

use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde_json::Value;
use stockbook_core::validation::validate_positive_amount;
use stockbook_core::{Money, NewTransaction, TransactionType};
use stockbook_store::{EntityStore, SnapshotBackend};

use super::{deleted, parse_date, require_login, shopkeeper, to_output};
use crate::error::CliResult;

#[derive(Debug, Subcommand)]
pub enum TransactionAction {
    /// Record a ledger entry against a shopkeeper
    Add {
        /// Shopkeeper id
        #[arg(short, long)]
        shopkeeper: String,

        /// SALE, PURCHASE, PAYMENT_RECEIVED or PAYMENT_MADE
        #[arg(short = 't', long = "type")]
        kind: TransactionType,

        /// Amount in rupees; the type decides the direction
        #[arg(short, long)]
        amount: Money,

        #[arg(short, long, default_value = "")]
        notes: String,

        /// Defaults to now
        #[arg(short, long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,
    },

    /// Delete a ledger entry
    Delete { id: String },
}

pub fn run<B: SnapshotBackend>(action: TransactionAction, store: &mut EntityStore<B>) -> CliResult<Value> {
    require_login(store)?;

    match action {
        TransactionAction::Add {
            shopkeeper: account,
            kind,
            amount,
            notes,
            date,
        } => {
            validate_positive_amount("amount", amount)?;
            let shopkeeper_id = shopkeeper::find(store, &account)?.id.clone();

            let mut entry = NewTransaction::new(shopkeeper_id, kind, amount).notes(notes.trim());
            if let Some(date) = date {
                entry = entry.dated(date);
            }

            let transaction = store.add_transaction(entry)?;
            to_output(&transaction)
        }

        TransactionAction::Delete { id } => {
            let removed = store.delete_transaction(&id)?;
            deleted("Transaction", &id, removed)
        }
    }
}
