//! Transaction command implementations

use anyhow::{anyhow, Result};
use cashflow_core::ai::{GeneratorClient, TextGenerator};
use cashflow_core::categorize::{CategorySuggester, CategorySuggestion};
use cashflow_core::db::Database;
use cashflow_core::models::{Category, NewTransaction, Transaction, TransactionType};
use cashflow_core::money::format_amount;
use cashflow_core::period::Granularity;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use super::truncate;

/// Find a category by ID or by name (case-insensitive)
pub fn resolve_category(db: &Database, name_or_id: &str) -> Result<Category> {
    if let Ok(id) = name_or_id.parse::<i64>() {
        if let Some(category) = db.get_category(id)? {
            return Ok(category);
        }
    }

    db.list_categories()?
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(name_or_id.trim()))
        .ok_or_else(|| anyhow!("Category not found: {}", name_or_id))
}

pub fn cmd_transactions_list(
    db: &Database,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let month = Granularity::Monthly.current_period(Local::now().date_naive());
    let from = from.unwrap_or(month.start);
    let to = to.unwrap_or(month.end);

    let transactions = db.list_transactions(from, to)?;

    if transactions.is_empty() {
        println!("No transactions between {} and {}. Record one with:", from, to);
        println!("  cashflow transactions add -t expense -a 12.50 -c Groceries");
        return Ok(());
    }

    println!();
    println!("📝 Transactions {} to {}", from, to);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in &transactions {
        println!(
            "   {} │ {:>12} │ {:<14} │ {}",
            tx.transaction_date,
            signed_amount(tx),
            truncate(tx.category_name().unwrap_or("-"), 14),
            truncate(&tx.description, 30)
        );
    }

    Ok(())
}

pub fn cmd_transactions_add(
    db: &Database,
    transaction_type: &str,
    amount: Decimal,
    category: &str,
    date: Option<NaiveDate>,
    description: &str,
) -> Result<()> {
    let kind: TransactionType = transaction_type.parse().map_err(|e: String| anyhow!(e))?;
    let category = resolve_category(db, category)?;

    let tx = db.create_transaction(&NewTransaction {
        transaction_type: kind,
        amount,
        description: description.to_string(),
        category_id: category.id,
        transaction_date: date.unwrap_or_else(|| Local::now().date_naive()),
    })?;

    println!(
        "✅ Recorded transaction {}: {} │ {} │ {}",
        tx.id,
        tx.transaction_date,
        signed_amount(&tx),
        category.name
    );

    Ok(())
}

pub async fn cmd_transactions_suggest(
    db: &Database,
    generator: &GeneratorClient,
    description: &str,
    transaction_type: &str,
) -> Result<CategorySuggestion> {
    let kind: TransactionType = transaction_type.parse().map_err(|e: String| anyhow!(e))?;
    let categories = db.list_categories()?;

    if generator.is_enabled() {
        println!(
            "🤖 Asking {} ({}) for a {} category...",
            generator.model(),
            generator.backend_name(),
            kind.as_str().to_lowercase()
        );
    }

    let suggestion = CategorySuggester::new(generator)
        .suggest(&categories, description, kind)
        .await?;

    match &suggestion.category {
        Some(category) => println!(
            "✅ Suggested category: {} (id {}, confidence {})",
            category.name, category.id, suggestion.confidence
        ),
        None => println!(
            "❓ No matching category ({}): {}",
            suggestion.confidence,
            truncate(&suggestion.reasoning, 60)
        ),
    }

    Ok(suggestion)
}

fn signed_amount(tx: &Transaction) -> String {
    match tx.transaction_type {
        TransactionType::Expense => format!("\x1b[31m-${}\x1b[0m", format_amount(tx.amount)), // Red for expenses
        TransactionType::Income => format!("\x1b[32m+${}\x1b[0m", format_amount(tx.amount)), // Green for income
    }
}
