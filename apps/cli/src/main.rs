//! Stockbook CLI - inventory, trade ledger and reports for a computer shop.
//!
//! # Usage
//!
//! ```bash
//! # Log in (default credentials: admin / admin123)
//! stockbook login -u admin -p admin123
//!
//! # Add stock and sell it
//! stockbook product add --code PSU-CX650 -n "Corsair CX650" --price 18000 --cost 15500 -q 4
//! stockbook sale add --item PSU-CX650:1 --item KB-K120:2
//!
//! # Sell on account, then record the shopkeeper's payment
//! stockbook sale add --item RAM-16-DDR4:4 --payment credit --shopkeeper <ID>
//! stockbook transaction add -s <ID> -t PAYMENT_RECEIVED -a 25000
//! stockbook shopkeeper ledger <ID>
//!
//! # Reports
//! stockbook report sales --period weekly
//! stockbook report sales --period custom --from 2024-05-01 --to 2024-05-31
//! stockbook report stock
//! ```
//!
//! Results are printed to stdout as pretty JSON. Failures are printed to
//! stderr as `{"code": ..., "message": ...}` with exit status 1. Logs go to
//! stderr and follow `RUST_LOG`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use stockbook_store::{EntityStore, FileSnapshot};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use commands::customer::CustomerAction;
use commands::data::DataAction;
use commands::expense::ExpenseAction;
use commands::product::ProductAction;
use commands::repair::RepairAction;
use commands::report::ReportAction;
use commands::sale::SaleAction;
use commands::shopkeeper::ShopkeeperAction;
use commands::transaction::TransactionAction;
use config::AppConfig;
use error::CliResult;

#[derive(Parser)]
#[command(name = "stockbook")]
#[command(author, version, about = "Inventory, trade ledger and reports for a computer shop")]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the snapshot files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with the configured credentials
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage the product catalogue
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage walk-in customers
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Manage shopkeeper trade accounts
    Shopkeeper {
        #[command(subcommand)]
        action: ShopkeeperAction,
    },
    /// Record or remove ledger entries
    Transaction {
        #[command(subcommand)]
        action: TransactionAction,
    },
    /// Record, inspect or void sales
    Sale {
        #[command(subcommand)]
        action: SaleAction,
    },
    /// Track running expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },
    /// Track repair jobs
    Repair {
        #[command(subcommand)]
        action: RepairAction,
    },
    /// Sales, stock, financial, expense and repair reports
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
    /// Reset or wipe the books
    Data {
        #[command(subcommand)]
        action: DataAction,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                error!("Could not print output: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Command failed: {e}");
            let text = serde_json::to_string_pretty(&e).unwrap_or_else(|_| e.to_string());
            eprintln!("{text}");
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,stockbook=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> CliResult<Value> {
    let config = AppConfig::load(cli.config.clone(), cli.data_dir)?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&mut open_store(&config)?, &username, &password)
        }
        Commands::Logout => commands::auth::logout(&mut open_store(&config)?),
        Commands::Whoami => commands::auth::whoami(&open_store(&config)?),
        Commands::Product { action } => commands::product::run(action, &mut open_store(&config)?),
        Commands::Customer { action } => commands::customer::run(action, &mut open_store(&config)?),
        Commands::Shopkeeper { action } => {
            commands::shopkeeper::run(action, &mut open_store(&config)?)
        }
        Commands::Transaction { action } => {
            commands::transaction::run(action, &mut open_store(&config)?)
        }
        Commands::Sale { action } => commands::sale::run(action, &mut open_store(&config)?),
        Commands::Expense { action } => commands::expense::run(action, &mut open_store(&config)?),
        Commands::Repair { action } => commands::repair::run(action, &mut open_store(&config)?),
        Commands::Report { action } => commands::report::run(action, &mut open_store(&config)?),
        Commands::Data { action } => commands::data::run(action, &mut open_store(&config)?),
        Commands::Config { action } => commands::config::run(action, &config, cli.config),
    }
}

fn open_store(config: &AppConfig) -> CliResult<EntityStore<FileSnapshot>> {
    let data_dir = config.data_dir()?;
    debug!(?data_dir, "Opening store");
    Ok(EntityStore::open(
        FileSnapshot::open(data_dir)?,
        config.store_options(),
    )?)
}
