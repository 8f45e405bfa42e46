//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `build_generator` - Text generator from the `[ai]` configuration
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use cashflow_core::ai::GeneratorClient;
use cashflow_core::config::Config;
use cashflow_core::db::Database;

/// Open (or create) the ledger database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Build the configured text generator
pub fn build_generator(config: &Config) -> GeneratorClient {
    GeneratorClient::from_config(&config.ai)
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a category: cashflow categories add Groceries --type expense");
    println!("  2. Record spending: cashflow transactions add -t expense -a 42.00 -c Groceries");
    println!("  3. Ask for insights: cashflow insights --period monthly");

    Ok(())
}
