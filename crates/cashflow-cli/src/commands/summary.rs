//! Summary command implementations

use anyhow::Result;
use cashflow_core::db::Database;
use cashflow_core::money::format_amount;
use cashflow_core::summary::LedgerSummary;
use chrono::{Datelike, Local};

use super::truncate;

/// Fill in whichever of month and year is missing from today
fn resolve_month(month: Option<u32>, year: Option<i32>) -> (i32, u32) {
    let today = Local::now().date_naive();
    (year.unwrap_or(today.year()), month.unwrap_or(today.month()))
}

pub fn cmd_summary_balance(db: &Database) -> Result<()> {
    let balance = db.balance()?;

    println!();
    println!("💰 Balance (all time): ${}", format_amount(balance));

    Ok(())
}

pub fn cmd_summary_monthly(db: &Database, month: Option<u32>, year: Option<i32>) -> Result<()> {
    let (year, month) = resolve_month(month, year);
    let summary = LedgerSummary::new(db).monthly(year, month)?;

    println!();
    println!("📅 Summary for {}-{:02}", year, month);
    println!("   ─────────────────────────────");
    println!("   Income:   ${:>12}", format_amount(summary.total_income));
    println!("   Expense:  ${:>12}", format_amount(summary.total_expense));
    println!("   Net:      ${:>12}", format_amount(summary.net_balance));

    Ok(())
}

pub fn cmd_summary_categories(
    db: &Database,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let (year, month) = resolve_month(month, year);
    let categories = LedgerSummary::new(db).categories(year, month)?;

    if categories.is_empty() {
        println!("No categorized transactions in {}-{:02}.", year, month);
        return Ok(());
    }

    println!();
    println!("🏷️  Categories for {}-{:02}", year, month);
    println!("   ─────────────────────────────────────────────");
    println!("   {:<20} {:>12} {:>12}", "Category", "Income", "Expense");

    for summary in &categories {
        println!(
            "   {:<20} {:>12} {:>12}",
            truncate(&summary.category_name, 20),
            format_amount(summary.total_income),
            format_amount(summary.total_expense)
        );
    }

    Ok(())
}
