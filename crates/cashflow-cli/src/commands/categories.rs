//! Category command implementations

use anyhow::{anyhow, Result};
use cashflow_core::db::Database;
use cashflow_core::models::{NewCategory, TransactionType};

pub fn cmd_categories_list(db: &Database, category_type: Option<&str>) -> Result<()> {
    let categories = match category_type {
        Some(raw) => {
            let kind: TransactionType = raw.parse().map_err(|e: String| anyhow!(e))?;
            db.list_categories_by_type(kind)?
        }
        None => db.list_categories()?,
    };

    if categories.is_empty() {
        println!("No categories yet. Add one with:");
        println!("  cashflow categories add Groceries --type expense");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────");

    for category in categories {
        println!(
            "   [{:>3}] {:<8} {}",
            category.id,
            category.category_type.as_str(),
            category.name
        );
    }

    Ok(())
}

pub fn cmd_categories_add(db: &Database, name: &str, category_type: &str) -> Result<()> {
    let kind: TransactionType = category_type.parse().map_err(|e: String| anyhow!(e))?;

    let category = db.create_category(&NewCategory {
        name: name.to_string(),
        category_type: kind,
    })?;

    println!(
        "✅ Created {} category '{}' (id {})",
        category.category_type, category.name, category.id
    );

    Ok(())
}
