//! # Reports
//!
//! Read-only aggregation over the store's collections. Nothing here is
//! cached; every call recomputes from the slices it is given.
//!
//! ## Report Windows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Timeframe     Window (inclusive, in the time zone of `now`)            │
//! │  ──────────    ─────────────────────────────────────────────────────    │
//! │  Daily         today 00:00:00.000 → today 23:59:59.999                  │
//! │  Weekly        Sunday 00:00:00.000 → Saturday 23:59:59.999              │
//! │  Monthly       1st 00:00:00.000 → last day 23:59:59.999                 │
//! │  Yearly        Jan 1 00:00:00.000 → Dec 31 23:59:59.999                 │
//! │  Custom        caller's start → end day 23:59:59.999                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers pass `now` explicitly so that reports are deterministic under
//! test; the store supplies the local clock.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    Customer, CustomerSummary, Expense, Product, RepairStatus, RepairTicket, Sale, Shopkeeper,
    Transaction, TransactionType,
};
use crate::TOP_SELLING_LIMIT;

// =============================================================================
// Windows
// =============================================================================

/// An inclusive time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DateRange {
    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub start: DateTime<Utc>,
    #[serde(with = "crate::timestamp::iso")]
    #[ts(as = "String")]
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        DateRange { start, end }
    }

    /// Both ends inclusive.
    #[inline]
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        *at >= self.start && *at <= self.end
    }
}

/// The period a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "range", rename_all = "snake_case")]
#[ts(export)]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom(DateRange),
}

/// Resolves a timeframe to a concrete window around `now`.
pub fn resolve_window<Tz: TimeZone>(
    timeframe: &Timeframe,
    now: &DateTime<Tz>,
) -> CoreResult<DateRange> {
    let tz = now.timezone();
    let today = now.date_naive();

    let (first, last) = match timeframe {
        Timeframe::Daily => (today, today),
        Timeframe::Weekly => {
            let sunday =
                today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
            (sunday, sunday + Duration::days(6))
        }
        Timeframe::Monthly => {
            let first = today.with_day(1).unwrap_or(today);
            let last = first
                .checked_add_months(Months::new(1))
                .map(|next| next - Duration::days(1))
                .unwrap_or(today);
            (first, last)
        }
        Timeframe::Yearly => (
            NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today),
        ),
        Timeframe::Custom(range) => {
            let end_day = range.end.with_timezone(&tz).date_naive();
            let window = DateRange::new(range.start, local_to_utc(&tz, end_of_day(end_day)));
            if window.start > window.end {
                return Err(CoreError::InvalidDateRange {
                    start: range.start,
                    end: range.end,
                });
            }
            return Ok(window);
        }
    };

    Ok(DateRange::new(
        local_to_utc(&tz, first.and_time(NaiveTime::MIN)),
        local_to_utc(&tz, end_of_day(last)),
    ))
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::milliseconds(86_400_000 - 1)
}

/// Maps a wall-clock time to UTC, taking the earlier instant when a clock
/// change makes it ambiguous.
fn local_to_utc<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(at) => at.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Wall time skipped by a DST jump; shift by the zone's offset at
            // that instant interpreted as UTC.
            let offset = tz.offset_from_utc_datetime(&local).fix();
            Utc.from_utc_datetime(
                &(local - Duration::seconds(i64::from(offset.local_minus_utc()))),
            )
        }
    }
}

// =============================================================================
// Sales Report
// =============================================================================

/// A best-seller row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopSellingProduct {
    pub product_id: String,
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesReport {
    pub timeframe: Timeframe,
    pub date_range: DateRange,
    pub total_sales: Money,
    pub total_profit: Money,
    pub sales_count: usize,
    pub top_selling_products: Vec<TopSellingProduct>,
}

/// Sales, profit and best sellers within a timeframe.
///
/// Profit per line is `(line price − current product cost) × quantity`.
/// Lines whose product has since been deleted contribute no profit.
pub fn sales_report<Tz: TimeZone>(
    sales: &[Sale],
    products: &[Product],
    timeframe: Timeframe,
    now: &DateTime<Tz>,
) -> CoreResult<SalesReport> {
    let window = resolve_window(&timeframe, now)?;
    let costs: HashMap<&str, Money> = products
        .iter()
        .map(|p| (p.id.as_str(), p.cost_price))
        .collect();

    let in_window: Vec<&Sale> = sales.iter().filter(|s| window.contains(&s.date)).collect();

    let total_sales: Money = in_window.iter().map(|s| s.total).sum();

    let total_profit: Money = in_window
        .iter()
        .flat_map(|s| s.items.iter())
        .map(|item| match costs.get(item.product_id.as_str()) {
            Some(cost) => (item.price - *cost).multiply_quantity(item.quantity),
            None => Money::zero(),
        })
        .sum();

    let mut top: Vec<TopSellingProduct> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for item in in_window.iter().flat_map(|s| s.items.iter()) {
        let idx = *slot.entry(item.product_id.as_str()).or_insert_with(|| {
            top.push(TopSellingProduct {
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                quantity_sold: 0,
                revenue: Money::zero(),
            });
            top.len() - 1
        });
        top[idx].quantity_sold += item.quantity;
        top[idx].revenue += item.total;
    }
    top.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold));
    top.truncate(TOP_SELLING_LIMIT);

    Ok(SalesReport {
        timeframe,
        date_range: window,
        total_sales,
        total_profit,
        sales_count: in_window.len(),
        top_selling_products: top,
    })
}

// =============================================================================
// Stock Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockReport {
    /// Units on hand across all products.
    pub total_items: i64,
    /// Stock valued at cost.
    pub total_value: Money,
    /// `0 < quantity <= threshold`.
    pub low_stock_items: Vec<Product>,
    /// `quantity == 0`; oversold (negative) products are in neither list.
    pub out_of_stock_items: Vec<Product>,
}

pub fn stock_report(products: &[Product], low_stock_threshold: i64) -> StockReport {
    StockReport {
        total_items: products.iter().map(|p| p.quantity).sum(),
        total_value: products.iter().map(Product::stock_value).sum(),
        low_stock_items: products
            .iter()
            .filter(|p| p.is_low_stock(low_stock_threshold))
            .cloned()
            .collect(),
        out_of_stock_items: products
            .iter()
            .filter(|p| p.is_out_of_stock())
            .cloned()
            .collect(),
    }
}

// =============================================================================
// Financial Summary
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FinancialSummary {
    pub total_stock_value: Money,
    /// All sales ever recorded.
    pub total_sales: Money,
    /// Sum of PURCHASE ledger entries.
    pub total_purchases: Money,
    /// What shopkeepers owe us (magnitude of negative balances).
    pub total_due_from_shopkeepers: Money,
    /// What we owe shopkeepers (positive balances).
    pub total_due_to_shopkeepers: Money,
    /// `stock value + due from − due to`.
    pub net_balance: Money,
}

pub fn financial_summary(
    products: &[Product],
    sales: &[Sale],
    shopkeepers: &[Shopkeeper],
    transactions: &[Transaction],
) -> FinancialSummary {
    let total_stock_value: Money = products.iter().map(Product::stock_value).sum();
    let total_sales: Money = sales.iter().map(|s| s.total).sum();
    let total_purchases: Money = transactions
        .iter()
        .filter(|tx| tx.kind == TransactionType::Purchase)
        .map(|tx| tx.amount)
        .sum();
    let total_due_from_shopkeepers: Money = shopkeepers
        .iter()
        .filter(|sk| sk.balance.is_negative())
        .map(|sk| sk.balance.abs())
        .sum();
    let total_due_to_shopkeepers: Money = shopkeepers
        .iter()
        .filter(|sk| sk.balance.is_positive())
        .map(|sk| sk.balance)
        .sum();

    FinancialSummary {
        total_stock_value,
        total_sales,
        total_purchases,
        total_due_from_shopkeepers,
        total_due_to_shopkeepers,
        net_balance: total_stock_value + total_due_from_shopkeepers - total_due_to_shopkeepers,
    }
}

// =============================================================================
// Expense Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExpenseReport {
    pub timeframe: Timeframe,
    pub date_range: DateRange,
    pub total_expenses: Money,
    pub expense_count: usize,
    /// Largest spend first.
    pub by_category: Vec<CategoryTotal>,
}

/// Label used for expenses filed without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

pub fn expense_report<Tz: TimeZone>(
    expenses: &[Expense],
    timeframe: Timeframe,
    now: &DateTime<Tz>,
) -> CoreResult<ExpenseReport> {
    let window = resolve_window(&timeframe, now)?;
    let in_window: Vec<&Expense> = expenses.iter().filter(|e| window.contains(&e.date)).collect();

    let mut by_category: Vec<CategoryTotal> = Vec::new();
    for expense in &in_window {
        let category = match expense.category.trim() {
            "" => UNCATEGORIZED,
            name => name,
        };
        match by_category.iter_mut().find(|c| c.category == category) {
            Some(bucket) => {
                bucket.total += expense.amount;
                bucket.count += 1;
            }
            None => by_category.push(CategoryTotal {
                category: category.to_string(),
                total: expense.amount,
                count: 1,
            }),
        }
    }
    by_category.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

    Ok(ExpenseReport {
        timeframe,
        date_range: window,
        total_expenses: in_window.iter().map(|e| e.amount).sum(),
        expense_count: in_window.len(),
        by_category,
    })
}

// =============================================================================
// Repair Summary
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RepairSummary {
    /// Received or in progress.
    pub open: usize,
    pub completed: usize,
    pub delivered: usize,
    pub cancelled: usize,
    /// Estimated value of jobs still on the bench.
    pub pending_estimated_value: Money,
    /// Charged value of delivered jobs (final cost, else the estimate).
    pub collected_value: Money,
}

pub fn repair_summary(repairs: &[RepairTicket]) -> RepairSummary {
    repairs
        .iter()
        .fold(RepairSummary::default(), |mut summary, ticket| {
            match ticket.status {
                RepairStatus::Received | RepairStatus::InProgress => {
                    summary.open += 1;
                    summary.pending_estimated_value += ticket.estimated_cost;
                }
                RepairStatus::Completed => summary.completed += 1,
                RepairStatus::Delivered => {
                    summary.delivered += 1;
                    summary.collected_value +=
                        ticket.final_cost.unwrap_or(ticket.estimated_cost);
                }
                RepairStatus::Cancelled => summary.cancelled += 1,
            }
            summary
        })
}

// =============================================================================
// Customer Summary
// =============================================================================

/// Joins a customer with their sales. The figures are never stored.
pub fn customer_summary(customer: &Customer, sales: &[Sale]) -> CustomerSummary {
    let mut purchase_history: Vec<Sale> = sales
        .iter()
        .filter(|s| s.customer_id.as_deref() == Some(customer.id.as_str()))
        .cloned()
        .collect();
    purchase_history.sort_by(|a, b| b.date.cmp(&a.date));

    CustomerSummary {
        customer: customer.clone(),
        total_purchases: purchase_history.len(),
        total_amount_spent: purchase_history.iter().map(|s| s.total).sum(),
        purchase_history,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, SaleItem};
    use chrono::FixedOffset;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn product(id: &str, quantity: i64, price: i64, cost: i64) -> Product {
        let at = utc(2024, 1, 1, 0, 0);
        Product {
            id: id.to_string(),
            code: format!("CODE-{id}"),
            name: format!("Product {id}"),
            description: String::new(),
            price: Money::from_major(price),
            cost_price: Money::from_major(cost),
            quantity,
            category: String::new(),
            created_at: at,
            updated_at: at,
        }
    }

    fn sale(id: &str, date: DateTime<Utc>, items: Vec<SaleItem>) -> Sale {
        Sale {
            id: id.to_string(),
            invoice_number: format!("INV-{id}"),
            date,
            total: items.iter().map(|i| i.total).sum(),
            items,
            payment_method: PaymentMethod::Cash,
            shopkeeper_id: None,
            customer_id: None,
            notes: String::new(),
        }
    }

    #[test]
    fn test_daily_window() {
        let now = utc(2024, 6, 12, 15, 30);
        let window = resolve_window(&Timeframe::Daily, &now).unwrap();
        assert_eq!(window.start, utc(2024, 6, 12, 0, 0));
        assert_eq!(
            window.end,
            utc(2024, 6, 12, 23, 59) + Duration::milliseconds(59_999)
        );
    }

    #[test]
    fn test_weekly_window_runs_sunday_to_saturday() {
        // 2024-06-12 is a Wednesday.
        let now = utc(2024, 6, 12, 15, 30);
        let window = resolve_window(&Timeframe::Weekly, &now).unwrap();
        assert_eq!(window.start, utc(2024, 6, 9, 0, 0));
        assert_eq!(window.end.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());

        // A Sunday is the first day of its own week.
        let sunday = utc(2024, 6, 9, 8, 0);
        let window = resolve_window(&Timeframe::Weekly, &sunday).unwrap();
        assert_eq!(window.start, utc(2024, 6, 9, 0, 0));
    }

    #[test]
    fn test_monthly_and_yearly_windows() {
        let now = utc(2024, 2, 10, 12, 0);
        let month = resolve_window(&Timeframe::Monthly, &now).unwrap();
        assert_eq!(month.start, utc(2024, 2, 1, 0, 0));
        assert_eq!(month.end.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let year = resolve_window(&Timeframe::Yearly, &now).unwrap();
        assert_eq!(year.start, utc(2024, 1, 1, 0, 0));
        assert_eq!(year.end.date_naive(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_window_follows_local_time_zone() {
        let karachi = FixedOffset::east_opt(5 * 3600).unwrap();
        let now = karachi.with_ymd_and_hms(2024, 6, 12, 1, 0, 0).unwrap();
        let window = resolve_window(&Timeframe::Daily, &now).unwrap();
        // Local midnight in UTC+5 is 19:00 UTC the previous day.
        assert_eq!(window.start, utc(2024, 6, 11, 19, 0));
    }

    #[test]
    fn test_custom_window_forces_end_of_day() {
        let range = DateRange::new(utc(2024, 3, 1, 0, 0), utc(2024, 3, 5, 9, 0));
        let now = utc(2024, 6, 1, 0, 0);
        let window = resolve_window(&Timeframe::Custom(range), &now).unwrap();
        assert_eq!(window.start, utc(2024, 3, 1, 0, 0));
        assert_eq!(window.end, utc(2024, 3, 6, 0, 0) - Duration::milliseconds(1));
    }

    #[test]
    fn test_custom_window_rejects_reversed_range() {
        let range = DateRange::new(utc(2024, 3, 9, 0, 0), utc(2024, 3, 5, 0, 0));
        let result = resolve_window(&Timeframe::Custom(range), &utc(2024, 6, 1, 0, 0));
        assert!(matches!(result, Err(CoreError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_sales_report_profit_and_totals() {
        let p = product("p1", 3, 100, 60);
        let sales = vec![sale(
            "s1",
            utc(2024, 6, 12, 11, 0),
            vec![SaleItem::from_product(&p, 2)],
        )];

        let report =
            sales_report(&sales, &[p], Timeframe::Daily, &utc(2024, 6, 12, 18, 0)).unwrap();
        assert_eq!(report.total_sales, Money::from_major(200));
        assert_eq!(report.total_profit, Money::from_major(80));
        assert_eq!(report.sales_count, 1);
    }

    #[test]
    fn test_sales_report_daily_excludes_previous_day() {
        let p = product("p1", 10, 100, 60);
        let day = |h| utc(2024, 6, 12, h, 0);
        let sales = vec![
            sale("a", day(0), vec![SaleItem::from_product(&p, 1)]),
            sale("b", day(12), vec![SaleItem::from_product(&p, 1)]),
            sale(
                "c",
                utc(2024, 6, 12, 23, 59) + Duration::seconds(59),
                vec![SaleItem::from_product(&p, 1)],
            ),
            sale(
                "d",
                utc(2024, 6, 11, 23, 59),
                vec![SaleItem::from_product(&p, 1)],
            ),
        ];

        let report = sales_report(&sales, &[p], Timeframe::Daily, &day(20)).unwrap();
        assert_eq!(report.sales_count, 3);
        assert_eq!(report.total_sales, Money::from_major(300));
    }

    #[test]
    fn test_deleted_product_contributes_no_profit() {
        let kept = product("p1", 10, 100, 60);
        let gone = product("p2", 10, 500, 100);
        let sales = vec![sale(
            "s1",
            utc(2024, 6, 12, 11, 0),
            vec![SaleItem::from_product(&kept, 1), SaleItem::from_product(&gone, 1)],
        )];

        let report =
            sales_report(&sales, &[kept], Timeframe::Daily, &utc(2024, 6, 12, 12, 0)).unwrap();
        assert_eq!(report.total_sales, Money::from_major(600));
        assert_eq!(report.total_profit, Money::from_major(40));
    }

    #[test]
    fn test_top_selling_sorted_and_capped() {
        let products: Vec<Product> = (1..=7)
            .map(|i| product(&format!("p{i}"), 100, 10, 5))
            .collect();
        let items: Vec<SaleItem> = products
            .iter()
            .enumerate()
            .map(|(i, p)| SaleItem::from_product(p, i as i64 + 1))
            .collect();
        let sales = vec![
            sale("s1", utc(2024, 6, 12, 9, 0), items),
            sale(
                "s2",
                utc(2024, 6, 12, 10, 0),
                vec![SaleItem::from_product(&products[0], 10)],
            ),
        ];

        let report =
            sales_report(&sales, &products, Timeframe::Daily, &utc(2024, 6, 12, 12, 0)).unwrap();
        let top: Vec<(&str, i64)> = report
            .top_selling_products
            .iter()
            .map(|t| (t.product_id.as_str(), t.quantity_sold))
            .collect();
        assert_eq!(top, vec![("p1", 11), ("p7", 7), ("p6", 6), ("p5", 5), ("p4", 4)]);
        assert_eq!(report.top_selling_products[0].revenue, Money::from_major(110));
    }

    #[test]
    fn test_stock_report_boundaries() {
        let products = vec![
            product("zero", 0, 10, 5),
            product("five", 5, 10, 5),
            product("six", 6, 10, 5),
            product("oversold", -2, 10, 5),
        ];
        let report = stock_report(&products, crate::LOW_STOCK_THRESHOLD);

        let low: Vec<&str> = report.low_stock_items.iter().map(|p| p.id.as_str()).collect();
        let out: Vec<&str> = report.out_of_stock_items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(low, vec!["five"]);
        assert_eq!(out, vec!["zero"]);
        assert_eq!(report.total_items, 9);
        assert_eq!(report.total_value, Money::from_major(45));
    }

    #[test]
    fn test_stock_report_is_idempotent() {
        let products = vec![product("a", 2, 10, 5), product("b", 0, 10, 5)];
        assert_eq!(stock_report(&products, 5), stock_report(&products, 5));
    }

    #[test]
    fn test_financial_summary() {
        let products = vec![product("a", 10, 100, 50)];
        let sales = vec![sale(
            "s1",
            utc(2023, 1, 1, 0, 0),
            vec![SaleItem::from_product(&products[0], 1)],
        )];
        let shopkeeper = |id: &str, balance: i64| Shopkeeper {
            id: id.to_string(),
            name: id.to_string(),
            contact: String::new(),
            address: String::new(),
            balance: Money::from_major(balance),
            created_at: utc(2023, 1, 1, 0, 0),
        };
        let shopkeepers = vec![shopkeeper("owes", -300), shopkeeper("owed", 120), shopkeeper("even", 0)];
        let purchase = Transaction {
            id: "t1".to_string(),
            shopkeeper_id: "owed".to_string(),
            date: utc(2023, 1, 1, 0, 0),
            kind: TransactionType::Purchase,
            amount: Money::from_major(120),
            notes: String::new(),
            related_items: None,
            sale_id: None,
        };

        let summary = financial_summary(&products, &sales, &shopkeepers, &[purchase]);
        assert_eq!(summary.total_stock_value, Money::from_major(500));
        assert_eq!(summary.total_sales, Money::from_major(100));
        assert_eq!(summary.total_purchases, Money::from_major(120));
        assert_eq!(summary.total_due_from_shopkeepers, Money::from_major(300));
        assert_eq!(summary.total_due_to_shopkeepers, Money::from_major(120));
        assert_eq!(summary.net_balance, Money::from_major(680));
    }

    #[test]
    fn test_expense_report_groups_by_category() {
        let expense = |id: &str, category: &str, amount: i64, day: u32| Expense {
            id: id.to_string(),
            title: id.to_string(),
            category: category.to_string(),
            amount: Money::from_major(amount),
            date: utc(2024, 6, day, 10, 0),
            notes: String::new(),
            created_at: utc(2024, 6, day, 10, 0),
        };
        let mut last_month = expense("old", "Rent", 30_000, 1);
        last_month.date = utc(2024, 5, 1, 10, 0);
        let expenses = vec![
            expense("rent", "Rent", 30_000, 1),
            expense("bill", "Utilities", 4_000, 3),
            expense("bill2", "Utilities", 2_500, 20),
            expense("tea", "", 300, 21),
            last_month,
        ];

        let report =
            expense_report(&expenses, Timeframe::Monthly, &utc(2024, 6, 25, 10, 0)).unwrap();
        assert_eq!(report.expense_count, 4);
        assert_eq!(report.total_expenses, Money::from_major(36_800));
        let categories: Vec<(&str, usize)> = report
            .by_category
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(
            categories,
            vec![("Rent", 1), ("Utilities", 2), (UNCATEGORIZED, 1)]
        );
    }

    #[test]
    fn test_repair_summary() {
        let ticket = |status: RepairStatus, estimate: i64, final_cost: Option<i64>| RepairTicket {
            id: String::new(),
            ticket_number: String::new(),
            customer_name: "Bilal".to_string(),
            contact: String::new(),
            device: "HP ProBook".to_string(),
            issue: "No display".to_string(),
            status,
            estimated_cost: Money::from_major(estimate),
            final_cost: final_cost.map(Money::from_major),
            received_at: utc(2024, 6, 1, 0, 0),
            updated_at: utc(2024, 6, 1, 0, 0),
            notes: String::new(),
        };
        let repairs = vec![
            ticket(RepairStatus::Received, 1_000, None),
            ticket(RepairStatus::InProgress, 2_000, None),
            ticket(RepairStatus::Delivered, 3_000, Some(3_500)),
            ticket(RepairStatus::Delivered, 800, None),
            ticket(RepairStatus::Cancelled, 500, None),
        ];

        let summary = repair_summary(&repairs);
        assert_eq!(summary.open, 2);
        assert_eq!(summary.delivered, 2);
        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.pending_estimated_value, Money::from_major(3_000));
        assert_eq!(summary.collected_value, Money::from_major(4_300));
    }

    #[test]
    fn test_customer_summary_is_derived_from_sales() {
        let p = product("p1", 10, 100, 60);
        let customer = Customer {
            id: "c1".to_string(),
            name: "Hamza".to_string(),
            contact: Some("0321-0000000".to_string()),
            cnic: None,
            email: None,
            created_at: utc(2024, 1, 1, 0, 0),
            updated_at: utc(2024, 1, 1, 0, 0),
        };
        let mut first = sale("s1", utc(2024, 6, 1, 0, 0), vec![SaleItem::from_product(&p, 1)]);
        first.customer_id = Some("c1".to_string());
        let mut second = sale("s2", utc(2024, 6, 5, 0, 0), vec![SaleItem::from_product(&p, 2)]);
        second.customer_id = Some("c1".to_string());
        let stranger = sale("s3", utc(2024, 6, 6, 0, 0), vec![SaleItem::from_product(&p, 5)]);

        let summary = customer_summary(&customer, &[first, second, stranger]);
        assert_eq!(summary.total_purchases, 2);
        assert_eq!(summary.total_amount_spent, Money::from_major(300));
        assert_eq!(summary.purchase_history[0].id, "s2");
    }
}
