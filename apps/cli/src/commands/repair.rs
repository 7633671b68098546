//! `stockbook repair ...`

use clap::Subcommand;
use serde_json::Value;
use stockbook_core::validation::{validate_name, validate_price, validate_required};
use stockbook_core::{Money, NewRepair, RepairStatus, RepairTicket};
use stockbook_store::{EntityStore, SnapshotBackend};

use super::{deleted, non_empty, require_login, to_output};
use crate::error::{CliError, CliResult};

#[derive(Debug, Subcommand)]
pub enum RepairAction {
    /// Book a device in for repair
    Add {
        /// Customer's name
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        contact: String,

        /// e.g. "Dell Latitude 5490"
        #[arg(short, long)]
        device: String,

        #[arg(short, long)]
        issue: String,

        /// Quoted cost (rupees)
        #[arg(short, long, default_value = "0")]
        estimate: Money,

        /// Generated (REP-NNNN) when absent
        #[arg(long)]
        ticket: Option<String>,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List tickets
    List {
        /// Only tickets still on the bench
        #[arg(long)]
        open: bool,
    },

    /// Move a ticket (by id or ticket number) to a new status
    Status {
        ticket: String,

        /// received, in_progress, completed, delivered or cancelled
        status: RepairStatus,

        /// Amount charged
        #[arg(long)]
        final_cost: Option<Money>,
    },

    Delete { ticket: String },
}

fn find<'a, B: SnapshotBackend>(store: &'a EntityStore<B>, key: &str) -> CliResult<&'a RepairTicket> {
    let key = key.trim();
    store
        .repair(key)
        .or_else(|| {
            store
                .repairs()
                .iter()
                .find(|r| r.ticket_number.eq_ignore_ascii_case(key))
        })
        .ok_or_else(|| CliError::not_found("Repair", key))
}

pub fn run<B: SnapshotBackend>(action: RepairAction, store: &mut EntityStore<B>) -> CliResult<Value> {
    require_login(store)?;

    match action {
        RepairAction::Add {
            name,
            contact,
            device,
            issue,
            estimate,
            ticket,
            notes,
        } => {
            validate_name("customer name", &name)?;
            validate_required("device", &device)?;
            validate_required("issue", &issue)?;
            validate_price("estimate", estimate)?;

            let ticket = store.add_repair(NewRepair {
                ticket_number: non_empty(ticket),
                customer_name: name,
                contact: contact.trim().to_string(),
                device,
                issue: issue.trim().to_string(),
                estimated_cost: estimate,
                notes,
            })?;
            to_output(&ticket)
        }

        RepairAction::List { open } => {
            let listed: Vec<&RepairTicket> = store
                .repairs()
                .iter()
                .filter(|r| !open || r.status.is_open())
                .collect();
            to_output(&listed)
        }

        RepairAction::Status {
            ticket,
            status,
            final_cost,
        } => {
            if let Some(cost) = final_cost {
                validate_price("final cost", cost)?;
            }
            let id = find(store, &ticket)?.id.clone();
            let updated = store
                .set_repair_status(&id, status, final_cost)?
                .ok_or_else(|| CliError::not_found("Repair", &id))?;
            to_output(&updated)
        }

        RepairAction::Delete { ticket } => {
            let id = find(store, &ticket)?.id.clone();
            let removed = store.delete_repair(&id)?;
            deleted("Repair", &id, removed)
        }
    }
}
