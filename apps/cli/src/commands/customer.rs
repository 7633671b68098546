//! `stockbook customer ...`

use clap::Subcommand;
use serde_json::Value;
use stockbook_core::validation::{ensure_unique_customer, validate_cnic, validate_email, validate_name};
use stockbook_core::{Customer, NewCustomer};
use stockbook_store::{EntityStore, SnapshotBackend};

use super::{deleted, non_empty, require_login, to_output};
use crate::error::{CliError, CliResult};

#[derive(Debug, Subcommand)]
pub enum CustomerAction {
    /// Register a walk-in customer
    Add {
        #[arg(short, long)]
        name: String,

        /// Phone number, unique across customers
        #[arg(short, long)]
        contact: Option<String>,

        /// National identity card number (XXXXX-XXXXXXX-X)
        #[arg(long)]
        cnic: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
    },

    /// List customers with their purchase totals
    List,

    /// Show a customer with purchase history
    Show { id: String },

    /// Remove a customer (their sales stay on the books)
    Delete { id: String },
}

/// Checks a new customer's fields and registers them.
///
/// Shared with `sale add --new-customer`.
pub fn register<B: SnapshotBackend>(
    store: &mut EntityStore<B>,
    name: &str,
    contact: Option<String>,
    cnic: Option<String>,
    email: Option<String>,
) -> CliResult<Customer> {
    let contact = non_empty(contact);
    let cnic = non_empty(cnic);
    let email = non_empty(email);

    validate_name("name", name)?;
    if let Some(cnic) = &cnic {
        validate_cnic(cnic)?;
    }
    if let Some(email) = &email {
        validate_email(email)?;
    }
    ensure_unique_customer(store.customers(), contact.as_deref(), cnic.as_deref(), None)?;

    Ok(store.add_customer(NewCustomer {
        name: name.to_string(),
        contact,
        cnic,
        email,
    })?)
}

pub fn run<B: SnapshotBackend>(action: CustomerAction, store: &mut EntityStore<B>) -> CliResult<Value> {
    require_login(store)?;

    match action {
        CustomerAction::Add {
            name,
            contact,
            cnic,
            email,
        } => {
            let customer = register(store, &name, contact, cnic, email)?;
            to_output(&customer)
        }

        CustomerAction::List => to_output(&store.customer_summaries()),

        CustomerAction::Show { id } => {
            let summary = store
                .customer_summary(&id)
                .ok_or_else(|| CliError::not_found("Customer", &id))?;
            to_output(&summary)
        }

        CustomerAction::Delete { id } => {
            let removed = store.delete_customer(&id)?;
            deleted("Customer", &id, removed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::logged_in_store;
    use crate::error::ErrorCode;

    fn add(name: &str, contact: Option<&str>, cnic: Option<&str>) -> CustomerAction {
        CustomerAction::Add {
            name: name.to_string(),
            contact: contact.map(String::from),
            cnic: cnic.map(String::from),
            email: None,
        }
    }

    #[test]
    fn test_add_and_show() {
        let mut store = logged_in_store();
        let added = run(
            add("Ayesha Khan", Some("0301-1112223"), Some("35202-1234567-1")),
            &mut store,
        )
        .unwrap();

        let id = added["id"].as_str().unwrap().to_string();
        let shown = run(CustomerAction::Show { id }, &mut store).unwrap();
        assert_eq!(shown["name"], "Ayesha Khan");
        assert_eq!(shown["totalPurchases"], 0);
    }

    #[test]
    fn test_duplicate_contact_and_cnic() {
        let mut store = logged_in_store();
        run(add("Ayesha Khan", Some("0301-1112223"), Some("35202-1234567-1")), &mut store).unwrap();

        let err = run(add("Someone Else", Some("0301-1112223"), None), &mut store).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // Same CNIC written without dashes.
        let err = run(add("Someone Else", None, Some("3520212345671")), &mut store).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(store.customers().len(), 1);
    }

    #[test]
    fn test_bad_cnic_rejected() {
        let mut store = logged_in_store();
        let err = run(add("Bilal", None, Some("12-34")), &mut store).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_show_unknown() {
        let mut store = logged_in_store();
        let err = run(
            CustomerAction::Show {
                id: "missing".to_string(),
            },
            &mut store,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
