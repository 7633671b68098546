//! `stockbook report ...`
//!
//! Windowed reports (`sales`, `expenses`) run on the local clock; the rest
//! are point-in-time snapshots of the books.

use clap::Subcommand;
use serde_json::Value;
use stockbook_store::{EntityStore, SnapshotBackend};

use super::{require_login, to_output, WindowArgs};
use crate::error::CliResult;

#[derive(Debug, Subcommand)]
pub enum ReportAction {
    /// Revenue, profit and top sellers for a window
    Sales(WindowArgs),

    /// Units on hand, stock value, low and out-of-stock items
    Stock,

    /// Sales total, stock value, receivables and payables
    Financial,

    /// Expenses by category for a window
    Expenses(WindowArgs),

    /// Repair tickets by status
    Repairs,
}

pub fn run<B: SnapshotBackend>(action: ReportAction, store: &mut EntityStore<B>) -> CliResult<Value> {
    require_login(store)?;

    match action {
        ReportAction::Sales(window) => to_output(&store.sales_report(window.timeframe()?)?),
        ReportAction::Stock => to_output(&store.stock_report()),
        ReportAction::Financial => to_output(&store.financial_summary()),
        ReportAction::Expenses(window) => to_output(&store.expense_report(window.timeframe()?)?),
        ReportAction::Repairs => to_output(&store.repair_summary()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{parse_date, test_support::logged_in_store, Period};
    use crate::error::ErrorCode;

    fn window(period: Period) -> WindowArgs {
        WindowArgs {
            period,
            from: None,
            to: None,
        }
    }

    #[test]
    fn test_daily_sales_report_shape() {
        let mut store = logged_in_store();
        // The seeded card sale is 30 minutes old; near midnight it can fall
        // into yesterday, so only the shape is checked here.
        let report = run(ReportAction::Sales(window(Period::Daily)), &mut store).unwrap();
        assert_eq!(report["timeframe"]["kind"], "daily");
        assert!(report["dateRange"]["start"].is_string());
        assert!(report["topSellingProducts"].is_array());
    }

    #[test]
    fn test_wide_custom_window_covers_seeded_sales() {
        let mut store = logged_in_store();
        let custom = WindowArgs {
            period: Period::Custom,
            from: Some(parse_date("2000-01-01").unwrap()),
            to: Some(parse_date("2999-12-31").unwrap()),
        };
        let report = run(ReportAction::Sales(custom), &mut store).unwrap();
        assert_eq!(report["salesCount"], 3);
    }

    #[test]
    fn test_reversed_custom_window() {
        let mut store = logged_in_store();
        let custom = WindowArgs {
            period: Period::Custom,
            from: Some(parse_date("2024-03-10").unwrap()),
            to: Some(parse_date("2024-03-01").unwrap()),
        };
        let err = run(ReportAction::Sales(custom), &mut store).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_stock_report_flags_seeded_items() {
        let mut store = logged_in_store();
        let report = run(ReportAction::Stock, &mut store).unwrap();
        assert_eq!(report["outOfStockItems"].as_array().unwrap().len(), 1);
        assert_eq!(report["lowStockItems"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_reports_need_login() {
        let mut store = logged_in_store();
        store.logout().unwrap();
        let err = run(ReportAction::Financial, &mut store).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }
}
