//! `stockbook sale ...`
//!
//! Items are given as `CODE:QTY` or `CODE:QTY@PRICE`, e.g.
//! `--item RAM-16-DDR4:2 --item KB-K120:1@2000`.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde_json::Value;
use std::str::FromStr;
use stockbook_core::validation::{validate_line, validate_sale_items, validate_sale_party};
use stockbook_core::{Money, NewSale, PaymentMethod, Sale, SaleItem, ValidationError};
use stockbook_store::{EntityStore, SnapshotBackend};

use super::{customer, deleted, non_empty, parse_date, product, require_login, shopkeeper, to_output};
use crate::error::{CliError, CliResult};

// =============================================================================
// Item Argument
// =============================================================================

/// One `--item` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    /// Product id or code.
    pub product: String,
    pub quantity: i64,
    /// Negotiated unit price; the product's price when absent.
    pub price: Option<Money>,
}

impl FromStr for ItemSpec {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "item".to_string(),
            reason: format!("'{s}' is not CODE:QTY or CODE:QTY@PRICE"),
        };

        let (product, rest) = s.trim().rsplit_once(':').ok_or_else(invalid)?;
        let (quantity, price) = match rest.split_once('@') {
            Some((qty, price)) => (qty, Some(price.parse::<Money>()?)),
            None => (rest, None),
        };

        if product.trim().is_empty() {
            return Err(invalid());
        }
        let quantity = quantity.trim().parse::<i64>().map_err(|_| invalid())?;

        Ok(ItemSpec {
            product: product.trim().to_string(),
            quantity,
            price,
        })
    }
}

// =============================================================================
// Actions
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum SaleAction {
    /// Record a sale (stock is reduced; on-account sales hit the ledger)
    Add {
        /// CODE:QTY or CODE:QTY@PRICE, repeatable
        #[arg(short, long = "item", required = true)]
        items: Vec<ItemSpec>,

        /// cash, card, bank_transfer or credit
        #[arg(short, long, default_value = "cash")]
        payment: PaymentMethod,

        /// Sell on account to this shopkeeper
        #[arg(short, long)]
        shopkeeper: Option<String>,

        /// Existing customer id
        #[arg(short, long)]
        customer: Option<String>,

        /// Register a new customer with this name and link the sale
        #[arg(long, conflicts_with = "customer")]
        new_customer: Option<String>,

        /// Contact number for --new-customer
        #[arg(long, requires = "new_customer")]
        customer_contact: Option<String>,

        /// Generated (INV-YYYYMMDD-NNNN) when absent
        #[arg(long)]
        invoice: Option<String>,

        #[arg(short, long, default_value = "")]
        notes: String,

        /// Defaults to now
        #[arg(short, long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,
    },

    /// List sales, newest first
    List {
        #[arg(short, long)]
        shopkeeper: Option<String>,

        #[arg(short, long)]
        customer: Option<String>,
    },

    /// Show a sale (by id or invoice number)
    Show { sale: String },

    /// Delete a sale, restoring stock and reversing any ledger entry
    Delete { sale: String },
}

fn find<'a, B: SnapshotBackend>(store: &'a EntityStore<B>, key: &str) -> CliResult<&'a Sale> {
    let key = key.trim();
    store
        .sale(key)
        .or_else(|| {
            store
                .sales()
                .iter()
                .find(|s| s.invoice_number.eq_ignore_ascii_case(key))
        })
        .ok_or_else(|| CliError::not_found("Sale", key))
}

pub fn run<B: SnapshotBackend>(action: SaleAction, store: &mut EntityStore<B>) -> CliResult<Value> {
    require_login(store)?;

    match action {
        SaleAction::Add {
            items,
            payment,
            shopkeeper: account,
            customer: customer_id,
            new_customer,
            customer_contact,
            invoice,
            notes,
            date,
        } => {
            let account = non_empty(account);
            let customer_id = non_empty(customer_id);
            let new_customer = non_empty(new_customer);

            validate_sale_party(
                account.as_deref(),
                customer_id.as_deref().or(new_customer.as_deref()),
            )?;
            if payment == PaymentMethod::Credit && account.is_none() {
                return Err(CliError::validation("Credit sales need --shopkeeper"));
            }

            let shopkeeper_id = match &account {
                Some(key) => Some(shopkeeper::find(store, key)?.id.clone()),
                None => None,
            };
            if let Some(id) = &customer_id {
                if store.customer(id).is_none() {
                    return Err(CliError::not_found("Customer", id));
                }
            }

            let invoice = non_empty(invoice);
            if let Some(number) = &invoice {
                if store.sales().iter().any(|s| &s.invoice_number == number) {
                    return Err(ValidationError::Duplicate {
                        field: "invoice number".to_string(),
                        value: number.clone(),
                    }
                    .into());
                }
            }

            let lines = items
                .iter()
                .map(|spec| {
                    let product = product::find(store, &spec.product)?;
                    let price = spec.price.unwrap_or(product.price);
                    validate_line(spec.quantity, price)?;
                    Ok(SaleItem::with_price(product, spec.quantity, price))
                })
                .collect::<CliResult<Vec<_>>>()?;
            validate_sale_items(&lines)?;

            let customer_id = match new_customer {
                Some(name) => Some(customer::register(store, &name, customer_contact, None, None)?.id),
                None => customer_id,
            };

            let sale = store.add_sale(NewSale {
                invoice_number: invoice,
                date,
                items: lines,
                payment_method: payment,
                shopkeeper_id,
                customer_id,
                notes: notes.trim().to_string(),
            })?;
            to_output(&sale)
        }

        SaleAction::List {
            shopkeeper: account,
            customer: customer_id,
        } => {
            let mut listed: Vec<&Sale> = store
                .sales()
                .iter()
                .filter(|s| account.is_none() || s.shopkeeper_id == account)
                .filter(|s| customer_id.is_none() || s.customer_id == customer_id)
                .collect();
            listed.sort_by(|a, b| b.date.cmp(&a.date));
            to_output(&listed)
        }

        SaleAction::Show { sale } => to_output(find(store, &sale)?),

        SaleAction::Delete { sale } => {
            let id = find(store, &sale)?.id.clone();
            let removed = store.delete_sale(&id)?;
            deleted("Sale", &id, removed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::logged_in_store;
    use crate::error::ErrorCode;
    use stockbook_core::TransactionType;

    fn sell(items: &[&str]) -> SaleAction {
        SaleAction::Add {
            items: items.iter().map(|i| i.parse().unwrap()).collect(),
            payment: PaymentMethod::Cash,
            shopkeeper: None,
            customer: None,
            new_customer: None,
            customer_contact: None,
            invoice: None,
            notes: String::new(),
            date: None,
        }
    }

    #[test]
    fn test_item_spec_parsing() {
        let spec: ItemSpec = "RAM-16-DDR4:2".parse().unwrap();
        assert_eq!(spec.product, "RAM-16-DDR4");
        assert_eq!(spec.quantity, 2);
        assert_eq!(spec.price, None);

        let spec: ItemSpec = "KB-K120:3@1,950.50".parse().unwrap();
        assert_eq!(spec.price, Some(Money::from_minor(195_050)));

        assert!("KB-K120".parse::<ItemSpec>().is_err());
        assert!(":2".parse::<ItemSpec>().is_err());
        assert!("KB-K120:two".parse::<ItemSpec>().is_err());
    }

    #[test]
    fn test_cash_sale_reduces_stock() {
        let mut store = logged_in_store();
        let before = store.product_by_code("KB-K120").unwrap().quantity;

        let sale = run(sell(&["KB-K120:3"]), &mut store).unwrap();
        assert_eq!(sale["total"], 3 * 220_000);
        assert!(sale["invoiceNumber"].as_str().unwrap().starts_with("INV-"));
        assert_eq!(store.product_by_code("KB-K120").unwrap().quantity, before - 3);
    }

    #[test]
    fn test_account_sale_and_delete() {
        let mut store = logged_in_store();
        let shopkeeper = store.shopkeepers()[2].clone();

        let mut action = sell(&["SSD-512-NVME:2@13500"]);
        if let SaleAction::Add {
            payment,
            shopkeeper: account,
            ..
        } = &mut action
        {
            *payment = PaymentMethod::Credit;
            *account = Some(shopkeeper.id.clone());
        }

        let sale = run(action, &mut store).unwrap();
        let sale_id = sale["id"].as_str().unwrap().to_string();
        assert_eq!(
            store.shopkeeper(&shopkeeper.id).unwrap().balance,
            shopkeeper.balance - Money::from_major(27_000)
        );
        assert!(store
            .transactions()
            .iter()
            .any(|tx| tx.kind == TransactionType::Sale && tx.sale_id.as_deref() == Some(sale_id.as_str())));

        run(SaleAction::Delete { sale: sale_id }, &mut store).unwrap();
        assert_eq!(store.shopkeeper(&shopkeeper.id).unwrap().balance, shopkeeper.balance);
    }

    #[test]
    fn test_credit_without_shopkeeper_rejected() {
        let mut store = logged_in_store();
        let mut action = sell(&["KB-K120:1"]);
        if let SaleAction::Add { payment, .. } = &mut action {
            *payment = PaymentMethod::Credit;
        }
        assert_eq!(run(action, &mut store).unwrap_err().code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_shopkeeper_and_customer_exclusive() {
        let mut store = logged_in_store();
        let shopkeeper_id = store.shopkeepers()[0].id.clone();
        let mut action = sell(&["KB-K120:1"]);
        if let SaleAction::Add {
            shopkeeper,
            new_customer,
            ..
        } = &mut action
        {
            *shopkeeper = Some(shopkeeper_id);
            *new_customer = Some("Walk-in".to_string());
        }

        let sales = store.sales().len();
        assert_eq!(run(action, &mut store).unwrap_err().code, ErrorCode::ValidationError);
        assert_eq!(store.sales().len(), sales);
        assert!(store.customers().is_empty());
    }

    #[test]
    fn test_new_customer_linked() {
        let mut store = logged_in_store();
        let mut action = sell(&["RAM-16-DDR4:1"]);
        if let SaleAction::Add {
            new_customer,
            customer_contact,
            ..
        } = &mut action
        {
            *new_customer = Some("Usman Ali".to_string());
            *customer_contact = Some("0345-0001112".to_string());
        }

        let sale = run(action, &mut store).unwrap();
        let customer = &store.customers()[0];
        assert_eq!(sale["customerId"], customer.id.as_str());

        let summary = store.customer_summary(&customer.id).unwrap();
        assert_eq!(summary.total_purchases, 1);
        assert_eq!(summary.total_amount_spent, Money::from_major(12_500));
    }

    #[test]
    fn test_zero_quantity_and_unknown_product() {
        let mut store = logged_in_store();
        assert_eq!(
            run(sell(&["KB-K120:0"]), &mut store).unwrap_err().code,
            ErrorCode::ValidationError
        );
        assert_eq!(
            run(sell(&["NOPE:1"]), &mut store).unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn test_huge_quantity_rejected() {
        let mut store = logged_in_store();
        let stock_before = product::find(&store, "KB-K120").unwrap().quantity;
        let sales_before = store.sales().len();

        let err = run(sell(&["KB-K120:90000000000000"]), &mut store).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = run(sell(&["KB-K120:2@92233720368547758"]), &mut store).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(store.sales().len(), sales_before);
        assert_eq!(product::find(&store, "KB-K120").unwrap().quantity, stock_before);
    }

    #[test]
    fn test_show_by_invoice() {
        let mut store = logged_in_store();
        let invoice = store.sales()[1].invoice_number.clone();
        let shown = run(SaleAction::Show { sale: invoice.clone() }, &mut store).unwrap();
        assert_eq!(shown["invoiceNumber"], invoice.as_str());
    }
}
