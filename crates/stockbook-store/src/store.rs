//! # Entity Store
//!
//! The single owner of every collection. Each mutator applies its
//! cross-entity side effects and then overwrites the snapshot keys it
//! touched.
//!
//! ## Side Effects per Mutator
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────────┐
//! │ Mutator              │ Effect                                           │
//! ├──────────────────────┼──────────────────────────────────────────────────┤
//! │ add_sale             │ stock −qty per item; if on account: SALE entry   │
//! │                      │ linked by sale_id, shopkeeper balance −total     │
//! │ delete_sale          │ stock +qty per item; linked SALE entry removed   │
//! │                      │ and its balance effect reversed                  │
//! │ add_transaction      │ shopkeeper balance += signed delta               │
//! │ update_transaction   │ old delta reversed, new delta applied (policy)   │
//! │ delete_transaction   │ delta reversed (policy)                          │
//! │ clear_data           │ every collection emptied and written back as []  │
//! └──────────────────────┴──────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Model
//! Unknown ids are silent no-ops: the mutator returns `Ok(None)` /
//! `Ok(false)` and changes nothing. The store does not validate input;
//! callers run [`stockbook_core::validation`] first. The only errors are
//! snapshot I/O failures.
//!
//! ## Example
//! ```rust
//! use stockbook_store::{EntityStore, MemorySnapshot, StoreOptions};
//! use stockbook_core::{Money, NewShopkeeper, NewTransaction, TransactionType};
//!
//! let mut store = EntityStore::open(MemorySnapshot::new(), StoreOptions::default())?;
//! store.clear_data()?;
//!
//! let shop = store.add_shopkeeper(NewShopkeeper {
//!     name: "Al-Noor Computers".into(),
//!     ..Default::default()
//! })?;
//! store.add_transaction(NewTransaction::new(&shop.id, TransactionType::Sale, Money::from_major(1000)))?;
//!
//! assert_eq!(store.shopkeeper(&shop.id).unwrap().balance, Money::from_major(-1000));
//! # Ok::<(), stockbook_store::StoreError>(())
//! ```

use chrono::{DateTime, Local, TimeZone, Utc};
use tracing::{debug, info, warn};

use stockbook_core::ledger::{self, Statement};
use stockbook_core::report::{
    self, ExpenseReport, FinancialSummary, RepairSummary, SalesReport, StockReport, Timeframe,
};
use stockbook_core::timestamp::{self, new_id};
use stockbook_core::{
    CoreResult, Customer, CustomerSummary, Expense, Money, NewCustomer, NewExpense, NewProduct,
    NewRepair, NewSale, NewShopkeeper, NewTransaction, Product, RepairStatus, RepairTicket, Sale,
    Shopkeeper, Transaction, TransactionType, User, UserRole, LOW_STOCK_THRESHOLD,
};

use crate::error::StoreResult;
use crate::seed::{self, SampleData};
use crate::snapshot::{keys, read_json, write_json, SnapshotBackend};

// =============================================================================
// Options
// =============================================================================

/// The username/password pair `login` accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

/// Per-installation store behaviour.
///
/// ## Example
/// ```rust
/// use stockbook_store::StoreOptions;
///
/// let options = StoreOptions::default()
///     .low_stock_threshold(3)
///     .reverse_balance_on_delete(false);
/// assert_eq!(options.low_stock_threshold, 3);
/// ```
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Products with `0 < quantity <= threshold` are low stock.
    /// Default: 5
    pub low_stock_threshold: i64,

    /// Whether deleting or editing a ledger entry undoes its balance effect.
    /// Default: true. With `false`, the entry is only redacted from the
    /// ledger and the shopkeeper balance is left as it was.
    pub reverse_balance_on_delete: bool,

    pub credentials: Credentials,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            reverse_balance_on_delete: true,
            credentials: Credentials::default(),
        }
    }
}

impl StoreOptions {
    pub fn low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    pub fn reverse_balance_on_delete(mut self, reverse: bool) -> Self {
        self.reverse_balance_on_delete = reverse;
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Credentials {
            username: username.into(),
            password: password.into(),
        };
        self
    }
}

// =============================================================================
// Entity Store
// =============================================================================

/// Authoritative in-memory state mirrored to a snapshot backend.
#[derive(Debug)]
pub struct EntityStore<B: SnapshotBackend> {
    backend: B,
    options: StoreOptions,
    products: Vec<Product>,
    sales: Vec<Sale>,
    shopkeepers: Vec<Shopkeeper>,
    transactions: Vec<Transaction>,
    customers: Vec<Customer>,
    expenses: Vec<Expense>,
    repairs: Vec<RepairTicket>,
    current_user: Option<User>,
}

impl<B: SnapshotBackend> EntityStore<B> {
    /// Loads every key from `backend`.
    ///
    /// Missing products, sales, shopkeepers or transactions are filled from
    /// the built-in sample data and written back straight away. Missing
    /// customers, expenses and repairs start empty.
    pub fn open(mut backend: B, options: StoreOptions) -> StoreResult<Self> {
        let products: Option<Vec<Product>> = read_json(&backend, keys::PRODUCTS)?;
        let sales: Option<Vec<Sale>> = read_json(&backend, keys::SALES)?;
        let shopkeepers: Option<Vec<Shopkeeper>> = read_json(&backend, keys::SHOPKEEPERS)?;
        let transactions: Option<Vec<Transaction>> = read_json(&backend, keys::TRANSACTIONS)?;
        let customers: Option<Vec<Customer>> = read_json(&backend, keys::CUSTOMERS)?;
        let expenses: Option<Vec<Expense>> = read_json(&backend, keys::EXPENSES)?;
        let repairs: Option<Vec<RepairTicket>> = read_json(&backend, keys::REPAIRS)?;
        let current_user: Option<User> = read_json(&backend, keys::CURRENT_USER)?;

        let needs_seed = products.is_none()
            || sales.is_none()
            || shopkeepers.is_none()
            || transactions.is_none();
        let mut sample = if needs_seed {
            seed::sample_data(timestamp::now())
        } else {
            SampleData::default()
        };

        let mut seeded: Vec<&str> = Vec::new();
        let products = products.unwrap_or_else(|| {
            seeded.push(keys::PRODUCTS);
            std::mem::take(&mut sample.products)
        });
        let sales = sales.unwrap_or_else(|| {
            seeded.push(keys::SALES);
            std::mem::take(&mut sample.sales)
        });
        let shopkeepers = shopkeepers.unwrap_or_else(|| {
            seeded.push(keys::SHOPKEEPERS);
            std::mem::take(&mut sample.shopkeepers)
        });
        let transactions = transactions.unwrap_or_else(|| {
            seeded.push(keys::TRANSACTIONS);
            std::mem::take(&mut sample.transactions)
        });

        let mut store = EntityStore {
            backend,
            options,
            products,
            sales,
            shopkeepers,
            transactions,
            customers: customers.unwrap_or_default(),
            expenses: expenses.unwrap_or_default(),
            repairs: repairs.unwrap_or_default(),
            current_user,
        };

        for key in &seeded {
            store.persist(key)?;
        }
        if !seeded.is_empty() {
            info!(keys = ?seeded, "Seeded missing snapshot keys with sample data");
        }

        info!(
            products = store.products.len(),
            sales = store.sales.len(),
            shopkeepers = store.shopkeepers.len(),
            transactions = store.transactions.len(),
            customers = store.customers.len(),
            "Loaded snapshot"
        );

        Ok(store)
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gives the backend back, e.g. to reopen a store over the same data.
    pub fn into_backend(self) -> B {
        self.backend
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Overwrites `key` with the current contents of its collection.
    fn persist(&mut self, key: &str) -> StoreResult<()> {
        let backend = &mut self.backend;
        match key {
            keys::PRODUCTS => write_json(backend, key, &self.products),
            keys::SALES => write_json(backend, key, &self.sales),
            keys::SHOPKEEPERS => write_json(backend, key, &self.shopkeepers),
            keys::TRANSACTIONS => write_json(backend, key, &self.transactions),
            keys::CUSTOMERS => write_json(backend, key, &self.customers),
            keys::EXPENSES => write_json(backend, key, &self.expenses),
            keys::REPAIRS => write_json(backend, key, &self.repairs),
            keys::CURRENT_USER => match &self.current_user {
                Some(user) => write_json(backend, key, user),
                None => backend.remove(key),
            },
            other => {
                warn!(key = %other, "Ignoring unknown snapshot key");
                Ok(())
            }
        }
    }

    fn persist_all(&mut self, keys: &[&str]) -> StoreResult<()> {
        for key in keys {
            self.persist(key)?;
        }
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks a product up by code, ignoring ASCII case.
    pub fn product_by_code(&self, code: &str) -> Option<&Product> {
        let code = code.trim();
        self.products
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(code))
    }

    pub fn add_product(&mut self, new: NewProduct) -> StoreResult<Product> {
        let now = timestamp::now();
        let product = Product {
            id: new_id(),
            code: new.code.trim().to_string(),
            name: new.name.trim().to_string(),
            description: new.description,
            price: new.price,
            cost_price: new.cost_price,
            quantity: new.quantity,
            category: new.category,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, code = %product.code, "Adding product");
        self.products.push(product.clone());
        self.persist(keys::PRODUCTS)?;
        Ok(product)
    }

    /// Replaces the product with the same id and stamps `updated_at`.
    pub fn update_product(&mut self, product: Product) -> StoreResult<Option<Product>> {
        let Some(slot) = self.products.iter_mut().find(|p| p.id == product.id) else {
            debug!(id = %product.id, "Product not found, nothing to update");
            return Ok(None);
        };

        *slot = Product {
            updated_at: timestamp::now(),
            ..product
        };
        let updated = slot.clone();

        debug!(id = %updated.id, quantity = updated.quantity, "Updated product");
        self.persist(keys::PRODUCTS)?;
        Ok(Some(updated))
    }

    /// Removes a product. Sales keep their item snapshots.
    pub fn delete_product(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        if self.products.len() == before {
            return Ok(false);
        }

        debug!(id = %id, "Deleted product");
        self.persist(keys::PRODUCTS)?;
        Ok(true)
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Registers a customer and returns it so a sale can be linked to it.
    pub fn add_customer(&mut self, new: NewCustomer) -> StoreResult<Customer> {
        let now = timestamp::now();
        let customer = Customer {
            id: new_id(),
            name: new.name.trim().to_string(),
            contact: new.contact,
            cnic: new.cnic,
            email: new.email,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %customer.id, name = %customer.name, "Adding customer");
        self.customers.push(customer.clone());
        self.persist(keys::CUSTOMERS)?;
        Ok(customer)
    }

    pub fn update_customer(&mut self, customer: Customer) -> StoreResult<Option<Customer>> {
        let Some(slot) = self.customers.iter_mut().find(|c| c.id == customer.id) else {
            return Ok(None);
        };

        *slot = Customer {
            updated_at: timestamp::now(),
            ..customer
        };
        let updated = slot.clone();

        debug!(id = %updated.id, "Updated customer");
        self.persist(keys::CUSTOMERS)?;
        Ok(Some(updated))
    }

    /// Removes a customer. Their sales stay on the books.
    pub fn delete_customer(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.customers.len();
        self.customers.retain(|c| c.id != id);
        if self.customers.len() == before {
            return Ok(false);
        }

        debug!(id = %id, "Deleted customer");
        self.persist(keys::CUSTOMERS)?;
        Ok(true)
    }

    pub fn customer_summary(&self, id: &str) -> Option<CustomerSummary> {
        self.customer(id)
            .map(|customer| report::customer_summary(customer, &self.sales))
    }

    pub fn customer_summaries(&self) -> Vec<CustomerSummary> {
        self.customers
            .iter()
            .map(|customer| report::customer_summary(customer, &self.sales))
            .collect()
    }

    // =========================================================================
    // Sales
    // =========================================================================

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    /// Records a sale.
    ///
    /// ## Flow
    /// ```text
    /// NewSale
    ///   │
    ///   ├── item totals and sale total recomputed
    ///   ├── each product: quantity −= item.quantity   (no sufficiency check)
    ///   ├── sale appended
    ///   └── shopkeeper_id set?
    ///         └── SALE entry {amount: total, sale_id, related_items}
    ///               └── shopkeeper balance −= total
    /// ```
    pub fn add_sale(&mut self, new: NewSale) -> StoreResult<Sale> {
        let now = timestamp::now();
        let date = new.date.unwrap_or(now);
        let invoice_number = match new.invoice_number {
            Some(number) if !number.trim().is_empty() => number.trim().to_string(),
            _ => self.next_invoice_number(&date),
        };

        let items: Vec<_> = new
            .items
            .into_iter()
            .map(|mut item| {
                item.total = item.line_total();
                item
            })
            .collect();

        let sale = Sale {
            id: new_id(),
            invoice_number,
            date,
            total: items.iter().map(|item| item.total).sum(),
            items,
            payment_method: new.payment_method,
            shopkeeper_id: new.shopkeeper_id,
            customer_id: new.customer_id,
            notes: new.notes,
        };

        for item in &sale.items {
            self.adjust_stock(&item.product_id, -item.quantity, now);
        }

        debug!(
            id = %sale.id,
            invoice = %sale.invoice_number,
            total = sale.total.minor(),
            items = sale.items.len(),
            "Recording sale"
        );
        self.sales.push(sale.clone());
        self.persist_all(&[keys::PRODUCTS, keys::SALES])?;

        if let Some(shopkeeper_id) = &sale.shopkeeper_id {
            let entry = NewTransaction {
                shopkeeper_id: shopkeeper_id.clone(),
                kind: TransactionType::Sale,
                amount: sale.total,
                notes: format!("Sale - Invoice #{}", sale.invoice_number),
                date: Some(sale.date),
                related_items: Some(sale.items.clone()),
                sale_id: Some(sale.id.clone()),
            };
            self.record_transaction(entry)?;
        }

        Ok(sale)
    }

    /// Deletes a sale and undoes its effects.
    ///
    /// Stock is always restored. For an on-account sale the linked SALE
    /// entry is removed and exactly its balance effect is reversed; when no
    /// linked entry can be found the balance is left alone.
    pub fn delete_sale(&mut self, id: &str) -> StoreResult<bool> {
        let Some(pos) = self.sales.iter().position(|s| s.id == id) else {
            return Ok(false);
        };
        let now = timestamp::now();
        let sale = self.sales[pos].clone();

        for item in &sale.items {
            self.adjust_stock(&item.product_id, item.quantity, now);
        }

        if let Some(shopkeeper_id) = &sale.shopkeeper_id {
            match self.find_sale_entry(&sale, shopkeeper_id) {
                Some(idx) => {
                    let entry = self.transactions.remove(idx);
                    self.adjust_balance(&entry.shopkeeper_id, -entry.balance_delta());
                    debug!(sale_id = %sale.id, transaction_id = %entry.id, "Removed linked SALE entry");
                    self.persist_all(&[keys::TRANSACTIONS, keys::SHOPKEEPERS])?;
                }
                None => warn!(
                    sale_id = %sale.id,
                    invoice = %sale.invoice_number,
                    shopkeeper_id = %shopkeeper_id,
                    "No SALE entry found for on-account sale; balance left unchanged"
                ),
            }
        }

        self.sales.remove(pos);
        debug!(id = %sale.id, invoice = %sale.invoice_number, "Deleted sale");
        self.persist_all(&[keys::PRODUCTS, keys::SALES])?;
        Ok(true)
    }

    /// The SALE entry produced by `sale`: by explicit link, else (for
    /// snapshots written before the link existed) by the invoice number in
    /// the notes.
    fn find_sale_entry(&self, sale: &Sale, shopkeeper_id: &str) -> Option<usize> {
        self.transactions
            .iter()
            .position(|tx| tx.sale_id.as_deref() == Some(sale.id.as_str()))
            .or_else(|| {
                self.transactions.iter().position(|tx| {
                    tx.sale_id.is_none()
                        && tx.kind == TransactionType::Sale
                        && tx.shopkeeper_id == shopkeeper_id
                        && tx.notes.contains(&sale.invoice_number)
                })
            })
    }

    /// `INV-YYYYMMDD-NNNN`, numbered within the sale's day.
    fn next_invoice_number(&self, date: &DateTime<Utc>) -> String {
        let prefix = format!("INV-{}-", date.format("%Y%m%d"));
        let mut seq = self
            .sales
            .iter()
            .filter_map(|s| s.invoice_number.strip_prefix(&prefix))
            .filter_map(|rest| rest.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        loop {
            let candidate = format!("{prefix}{seq:04}");
            if !self.sales.iter().any(|s| s.invoice_number == candidate) {
                return candidate;
            }
            seq += 1;
        }
    }

    fn adjust_stock(&mut self, product_id: &str, delta: i64, now: DateTime<Utc>) {
        match self.products.iter_mut().find(|p| p.id == product_id) {
            Some(product) => {
                product.quantity += delta;
                product.updated_at = now;
                if product.quantity < 0 {
                    warn!(
                        product_id = %product.id,
                        code = %product.code,
                        quantity = product.quantity,
                        "Product oversold; stock is negative"
                    );
                }
            }
            None => debug!(product_id = %product_id, "Stock change for unknown product skipped"),
        }
    }

    // =========================================================================
    // Shopkeepers
    // =========================================================================

    pub fn shopkeepers(&self) -> &[Shopkeeper] {
        &self.shopkeepers
    }

    pub fn shopkeeper(&self, id: &str) -> Option<&Shopkeeper> {
        self.shopkeepers.iter().find(|s| s.id == id)
    }

    pub fn add_shopkeeper(&mut self, new: NewShopkeeper) -> StoreResult<Shopkeeper> {
        let shopkeeper = Shopkeeper {
            id: new_id(),
            name: new.name.trim().to_string(),
            contact: new.contact,
            address: new.address,
            balance: new.opening_balance,
            created_at: timestamp::now(),
        };

        debug!(
            id = %shopkeeper.id,
            name = %shopkeeper.name,
            opening_balance = shopkeeper.balance.minor(),
            "Adding shopkeeper"
        );
        self.shopkeepers.push(shopkeeper.clone());
        self.persist(keys::SHOPKEEPERS)?;
        Ok(shopkeeper)
    }

    /// Updates name, contact and address. The balance only moves through
    /// ledger entries, so the stored balance is kept.
    pub fn update_shopkeeper(&mut self, shopkeeper: Shopkeeper) -> StoreResult<Option<Shopkeeper>> {
        let Some(slot) = self.shopkeepers.iter_mut().find(|s| s.id == shopkeeper.id) else {
            return Ok(None);
        };

        slot.name = shopkeeper.name;
        slot.contact = shopkeeper.contact;
        slot.address = shopkeeper.address;
        let updated = slot.clone();

        debug!(id = %updated.id, "Updated shopkeeper");
        self.persist(keys::SHOPKEEPERS)?;
        Ok(Some(updated))
    }

    /// Removes a shopkeeper. Their ledger entries and sales are kept.
    pub fn delete_shopkeeper(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.shopkeepers.len();
        self.shopkeepers.retain(|s| s.id != id);
        if self.shopkeepers.len() == before {
            return Ok(false);
        }

        debug!(id = %id, "Deleted shopkeeper");
        self.persist(keys::SHOPKEEPERS)?;
        Ok(true)
    }

    fn adjust_balance(&mut self, shopkeeper_id: &str, delta: Money) {
        match self.shopkeepers.iter_mut().find(|s| s.id == shopkeeper_id) {
            Some(shopkeeper) => {
                shopkeeper.balance += delta;
                debug!(
                    shopkeeper_id = %shopkeeper.id,
                    delta = delta.minor(),
                    balance = shopkeeper.balance.minor(),
                    "Adjusted shopkeeper balance"
                );
            }
            None => debug!(shopkeeper_id = %shopkeeper_id, "Balance change for unknown shopkeeper skipped"),
        }
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Records a ledger entry and applies its signed delta to the
    /// shopkeeper's balance.
    pub fn add_transaction(&mut self, new: NewTransaction) -> StoreResult<Transaction> {
        self.record_transaction(new)
    }

    fn record_transaction(&mut self, new: NewTransaction) -> StoreResult<Transaction> {
        let transaction = Transaction {
            id: new_id(),
            shopkeeper_id: new.shopkeeper_id,
            date: new.date.unwrap_or_else(timestamp::now),
            kind: new.kind,
            amount: new.amount,
            notes: new.notes,
            related_items: new.related_items,
            sale_id: new.sale_id,
        };

        debug!(
            id = %transaction.id,
            shopkeeper_id = %transaction.shopkeeper_id,
            kind = %transaction.kind,
            amount = transaction.amount.minor(),
            "Recording ledger entry"
        );
        self.adjust_balance(&transaction.shopkeeper_id, transaction.balance_delta());
        self.transactions.push(transaction.clone());
        self.persist_all(&[keys::TRANSACTIONS, keys::SHOPKEEPERS])?;
        Ok(transaction)
    }

    /// Replaces a ledger entry.
    ///
    /// With `reverse_balance_on_delete` the old entry's delta is undone and
    /// the new one applied, so the balance always equals the sum of the
    /// entries on file.
    pub fn update_transaction(&mut self, transaction: Transaction) -> StoreResult<Option<Transaction>> {
        let Some(idx) = self.transactions.iter().position(|t| t.id == transaction.id) else {
            return Ok(None);
        };

        let old = std::mem::replace(&mut self.transactions[idx], transaction.clone());
        if self.options.reverse_balance_on_delete {
            self.adjust_balance(&old.shopkeeper_id, -old.balance_delta());
            self.adjust_balance(&transaction.shopkeeper_id, transaction.balance_delta());
        }

        debug!(id = %transaction.id, "Updated ledger entry");
        self.persist_all(&[keys::TRANSACTIONS, keys::SHOPKEEPERS])?;
        Ok(Some(transaction))
    }

    /// Removes a ledger entry, reversing its delta unless the store is
    /// configured for redaction only.
    pub fn delete_transaction(&mut self, id: &str) -> StoreResult<bool> {
        let Some(idx) = self.transactions.iter().position(|t| t.id == id) else {
            return Ok(false);
        };

        let removed = self.transactions.remove(idx);
        if self.options.reverse_balance_on_delete {
            self.adjust_balance(&removed.shopkeeper_id, -removed.balance_delta());
            self.persist_all(&[keys::TRANSACTIONS, keys::SHOPKEEPERS])?;
        } else {
            debug!(id = %id, "Ledger entry redacted; balance left unchanged");
            self.persist(keys::TRANSACTIONS)?;
        }

        debug!(id = %id, kind = %removed.kind, "Deleted ledger entry");
        Ok(true)
    }

    /// Statement for one shopkeeper, newest entry first with running
    /// balances.
    pub fn shopkeeper_ledger(&self, shopkeeper_id: &str) -> Option<Statement> {
        self.shopkeeper(shopkeeper_id)
            .map(|shopkeeper| ledger::statement(shopkeeper, &self.transactions))
    }

    // =========================================================================
    // Expenses
    // =========================================================================

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn add_expense(&mut self, new: NewExpense) -> StoreResult<Expense> {
        let now = timestamp::now();
        let expense = Expense {
            id: new_id(),
            title: new.title.trim().to_string(),
            category: new.category.trim().to_string(),
            amount: new.amount,
            date: new.date.unwrap_or(now),
            notes: new.notes,
            created_at: now,
        };

        debug!(id = %expense.id, amount = expense.amount.minor(), "Adding expense");
        self.expenses.push(expense.clone());
        self.persist(keys::EXPENSES)?;
        Ok(expense)
    }

    pub fn update_expense(&mut self, expense: Expense) -> StoreResult<Option<Expense>> {
        let Some(slot) = self.expenses.iter_mut().find(|e| e.id == expense.id) else {
            return Ok(None);
        };
        *slot = expense.clone();

        debug!(id = %expense.id, "Updated expense");
        self.persist(keys::EXPENSES)?;
        Ok(Some(expense))
    }

    pub fn delete_expense(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        if self.expenses.len() == before {
            return Ok(false);
        }

        debug!(id = %id, "Deleted expense");
        self.persist(keys::EXPENSES)?;
        Ok(true)
    }

    // =========================================================================
    // Repairs
    // =========================================================================

    pub fn repairs(&self) -> &[RepairTicket] {
        &self.repairs
    }

    pub fn repair(&self, id: &str) -> Option<&RepairTicket> {
        self.repairs.iter().find(|r| r.id == id)
    }

    pub fn add_repair(&mut self, new: NewRepair) -> StoreResult<RepairTicket> {
        let now = timestamp::now();
        let ticket_number = match new.ticket_number {
            Some(number) if !number.trim().is_empty() => number.trim().to_string(),
            _ => self.next_ticket_number(),
        };

        let ticket = RepairTicket {
            id: new_id(),
            ticket_number,
            customer_name: new.customer_name.trim().to_string(),
            contact: new.contact,
            device: new.device.trim().to_string(),
            issue: new.issue,
            status: RepairStatus::Received,
            estimated_cost: new.estimated_cost,
            final_cost: None,
            received_at: now,
            updated_at: now,
            notes: new.notes,
        };

        debug!(id = %ticket.id, ticket = %ticket.ticket_number, "Booking repair");
        self.repairs.push(ticket.clone());
        self.persist(keys::REPAIRS)?;
        Ok(ticket)
    }

    pub fn update_repair(&mut self, ticket: RepairTicket) -> StoreResult<Option<RepairTicket>> {
        let Some(slot) = self.repairs.iter_mut().find(|r| r.id == ticket.id) else {
            return Ok(None);
        };

        *slot = RepairTicket {
            updated_at: timestamp::now(),
            ..ticket
        };
        let updated = slot.clone();

        debug!(id = %updated.id, status = %updated.status, "Updated repair");
        self.persist(keys::REPAIRS)?;
        Ok(Some(updated))
    }

    /// Moves a ticket to `status`, recording the charged amount when given.
    pub fn set_repair_status(
        &mut self,
        id: &str,
        status: RepairStatus,
        final_cost: Option<Money>,
    ) -> StoreResult<Option<RepairTicket>> {
        let Some(slot) = self.repairs.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        slot.status = status;
        if final_cost.is_some() {
            slot.final_cost = final_cost;
        }
        slot.updated_at = timestamp::now();
        let updated = slot.clone();

        debug!(id = %id, status = %status, "Repair status changed");
        self.persist(keys::REPAIRS)?;
        Ok(Some(updated))
    }

    pub fn delete_repair(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.repairs.len();
        self.repairs.retain(|r| r.id != id);
        if self.repairs.len() == before {
            return Ok(false);
        }

        debug!(id = %id, "Deleted repair");
        self.persist(keys::REPAIRS)?;
        Ok(true)
    }

    /// `REP-NNNN`, one past the highest number on file.
    fn next_ticket_number(&self) -> String {
        let next = self
            .repairs
            .iter()
            .filter_map(|r| r.ticket_number.strip_prefix("REP-"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        format!("REP-{next:04}")
    }

    // =========================================================================
    // Bulk Data
    // =========================================================================

    /// Empties every collection and writes the empty arrays back, so the
    /// next `open` does not reseed. The logged-in user stays logged in.
    pub fn clear_data(&mut self) -> StoreResult<()> {
        self.products.clear();
        self.sales.clear();
        self.shopkeepers.clear();
        self.transactions.clear();
        self.customers.clear();
        self.expenses.clear();
        self.repairs.clear();

        self.persist_all(&keys::COLLECTIONS)?;
        info!("Cleared all data");
        Ok(())
    }

    /// Replaces every collection with the built-in sample set.
    pub fn reset_to_sample_data(&mut self) -> StoreResult<()> {
        let sample = seed::sample_data(timestamp::now());
        self.products = sample.products;
        self.sales = sample.sales;
        self.shopkeepers = sample.shopkeepers;
        self.transactions = sample.transactions;
        self.customers.clear();
        self.expenses.clear();
        self.repairs.clear();

        self.persist_all(&keys::COLLECTIONS)?;
        info!(
            products = self.products.len(),
            shopkeepers = self.shopkeepers.len(),
            "Reset to sample data"
        );
        Ok(())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Checks the configured credential pair. On success the user is stored
    /// as the current user.
    pub fn login(&mut self, username: &str, password: &str) -> StoreResult<bool> {
        let expected = &self.options.credentials;
        if username != expected.username || password != expected.password {
            warn!(username = %username, "Login rejected");
            return Ok(false);
        }

        let user = User {
            id: new_id(),
            username: username.to_string(),
            role: UserRole::Admin,
            created_at: timestamp::now(),
        };
        info!(username = %user.username, "Logged in");
        self.current_user = Some(user);
        self.persist(keys::CURRENT_USER)?;
        Ok(true)
    }

    pub fn logout(&mut self) -> StoreResult<()> {
        if let Some(user) = self.current_user.take() {
            info!(username = %user.username, "Logged out");
        }
        self.persist(keys::CURRENT_USER)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Sales report on the local clock.
    pub fn sales_report(&self, timeframe: Timeframe) -> CoreResult<SalesReport> {
        self.sales_report_at(timeframe, &Local::now())
    }

    pub fn sales_report_at<Tz: TimeZone>(
        &self,
        timeframe: Timeframe,
        now: &DateTime<Tz>,
    ) -> CoreResult<SalesReport> {
        report::sales_report(&self.sales, &self.products, timeframe, now)
    }

    pub fn stock_report(&self) -> StockReport {
        report::stock_report(&self.products, self.options.low_stock_threshold)
    }

    pub fn financial_summary(&self) -> FinancialSummary {
        report::financial_summary(
            &self.products,
            &self.sales,
            &self.shopkeepers,
            &self.transactions,
        )
    }

    pub fn expense_report(&self, timeframe: Timeframe) -> CoreResult<ExpenseReport> {
        self.expense_report_at(timeframe, &Local::now())
    }

    pub fn expense_report_at<Tz: TimeZone>(
        &self,
        timeframe: Timeframe,
        now: &DateTime<Tz>,
    ) -> CoreResult<ExpenseReport> {
        report::expense_report(&self.expenses, timeframe, now)
    }

    pub fn repair_summary(&self) -> RepairSummary {
        report::repair_summary(&self.repairs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
