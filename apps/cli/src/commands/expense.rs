//! `stockbook expense ...`

use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde_json::Value;
use stockbook_core::validation::{validate_positive_amount, validate_required};
use stockbook_core::{Expense, Money, NewExpense};
use stockbook_store::{EntityStore, SnapshotBackend};

use super::{deleted, parse_date, require_login, to_output};
use crate::error::CliResult;

#[derive(Debug, Subcommand)]
pub enum ExpenseAction {
    /// Record money spent running the shop
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        amount: Money,

        /// e.g. Rent, Utilities, Salaries
        #[arg(short, long, default_value = "")]
        category: String,

        /// Defaults to now
        #[arg(short, long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,

        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List expenses, newest first
    List {
        #[arg(short, long)]
        category: Option<String>,
    },

    Delete { id: String },
}

pub fn run<B: SnapshotBackend>(action: ExpenseAction, store: &mut EntityStore<B>) -> CliResult<Value> {
    require_login(store)?;

    match action {
        ExpenseAction::Add {
            title,
            amount,
            category,
            date,
            notes,
        } => {
            validate_required("title", &title)?;
            validate_positive_amount("amount", amount)?;

            let expense = store.add_expense(NewExpense {
                title,
                category,
                amount,
                date,
                notes,
            })?;
            to_output(&expense)
        }

        ExpenseAction::List { category } => {
            let mut listed: Vec<&Expense> = store
                .expenses()
                .iter()
                .filter(|e| match &category {
                    Some(c) => e.category.eq_ignore_ascii_case(c.trim()),
                    None => true,
                })
                .collect();
            listed.sort_by(|a, b| b.date.cmp(&a.date));
            to_output(&listed)
        }

        ExpenseAction::Delete { id } => {
            let removed = store.delete_expense(&id)?;
            deleted("Expense", &id, removed)
        }
    }
}
