//! `stockbook product ...`

use clap::Subcommand;
use serde_json::Value;
use stockbook_core::validation::{
    ensure_unique_product_code, validate_name, validate_price, validate_product_code,
    validate_stock_level,
};
use stockbook_core::{Money, NewProduct, Product};
use stockbook_store::{EntityStore, SnapshotBackend};

use super::{deleted, require_login, to_output};
use crate::error::{CliError, CliResult};

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    /// Add a product to the catalogue
    Add {
        /// SKU / barcode, unique across products
        #[arg(long)]
        code: String,

        #[arg(short, long)]
        name: String,

        /// Selling price per unit (rupees)
        #[arg(long)]
        price: Money,

        /// Purchase cost per unit (rupees)
        #[arg(long)]
        cost: Money,

        /// Opening stock
        #[arg(short, long, default_value_t = 0)]
        quantity: i64,

        #[arg(long, default_value = "")]
        category: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List products
    List {
        /// Only products at or below the low-stock threshold
        #[arg(long)]
        low_stock: bool,

        /// Only products in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one product (by id or code)
    Show { product: String },

    /// Change fields of a product (by id or code)
    Update {
        product: String,

        #[arg(long)]
        code: Option<String>,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<Money>,

        #[arg(long)]
        cost: Option<Money>,

        /// Stock count after a recount or delivery
        #[arg(short, long)]
        quantity: Option<i64>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a product (sales keep their item snapshots)
    Delete { product: String },
}

/// Looks a product up by id, then by code.
pub fn find<'a, B: SnapshotBackend>(store: &'a EntityStore<B>, key: &str) -> CliResult<&'a Product> {
    store
        .product(key)
        .or_else(|| store.product_by_code(key))
        .ok_or_else(|| CliError::not_found("Product", key))
}

pub fn run<B: SnapshotBackend>(action: ProductAction, store: &mut EntityStore<B>) -> CliResult<Value> {
    require_login(store)?;

    match action {
        ProductAction::Add {
            code,
            name,
            price,
            cost,
            quantity,
            category,
            description,
        } => {
            validate_product_code(&code)?;
            ensure_unique_product_code(store.products(), &code, None)?;
            validate_name("name", &name)?;
            validate_price("price", price)?;
            validate_price("cost", cost)?;
            validate_stock_level(quantity)?;

            let product = store.add_product(NewProduct {
                code,
                name,
                description,
                price,
                cost_price: cost,
                quantity,
                category: category.trim().to_string(),
            })?;
            to_output(&product)
        }

        ProductAction::List {
            low_stock,
            category,
        } => {
            let threshold = store.options().low_stock_threshold;
            let listed: Vec<&Product> = store
                .products()
                .iter()
                .filter(|p| !low_stock || p.quantity <= threshold)
                .filter(|p| match &category {
                    Some(c) => p.category.eq_ignore_ascii_case(c.trim()),
                    None => true,
                })
                .collect();
            to_output(&listed)
        }

        ProductAction::Show { product } => to_output(find(store, &product)?),

        ProductAction::Update {
            product,
            code,
            name,
            price,
            cost,
            quantity,
            category,
            description,
        } => {
            let mut updated = find(store, &product)?.clone();

            if let Some(code) = code {
                validate_product_code(&code)?;
                ensure_unique_product_code(store.products(), &code, Some(updated.id.as_str()))?;
                updated.code = code.trim().to_string();
            }
            if let Some(name) = name {
                validate_name("name", &name)?;
                updated.name = name.trim().to_string();
            }
            if let Some(price) = price {
                validate_price("price", price)?;
                updated.price = price;
            }
            if let Some(cost) = cost {
                validate_price("cost", cost)?;
                updated.cost_price = cost;
            }
            if let Some(quantity) = quantity {
                validate_stock_level(quantity)?;
                updated.quantity = quantity;
            }
            if let Some(category) = category {
                updated.category = category.trim().to_string();
            }
            if let Some(description) = description {
                updated.description = description;
            }

            let id = updated.id.clone();
            let saved = store
                .update_product(updated)?
                .ok_or_else(|| CliError::not_found("Product", &id))?;
            to_output(&saved)
        }

        ProductAction::Delete { product } => {
            let id = find(store, &product)?.id.clone();
            let removed = store.delete_product(&id)?;
            deleted("Product", &id, removed)
        }
    }
}
