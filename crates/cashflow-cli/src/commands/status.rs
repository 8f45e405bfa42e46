//! Status command implementation

use std::fs;
use std::path::Path;

use anyhow::Result;
use cashflow_core::ai::TextGenerator;
use cashflow_core::config::Config;

use super::{build_generator, open_db};

pub async fn cmd_status(db_path: &Path, config: &Config) -> Result<()> {
    println!();
    println!("📊 Cashflow Status");
    println!("   ─────────────────────────────────────────────────────────────");

    // Database path
    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }

        match open_db(db_path) {
            Ok(db) => {
                println!("   Categories: {}", db.list_categories()?.len());
                println!("   Transactions: {}", db.count_transactions()?);
            }
            Err(e) => println!("   ❌ Error opening database: {:#}", e),
        }
    } else {
        println!("   Size: (database not initialized, run 'cashflow init')");
    }

    // AI backend
    let generator = build_generator(config);
    println!();
    if !generator.is_enabled() {
        println!("   AI insights: disabled");
        println!("      Set [ai] enabled = true and a host (or OLLAMA_HOST) to enable");
    } else if generator.health_check().await {
        println!(
            "   ✅ AI backend: {} at {} (model: {})",
            generator.backend_name(),
            generator.host(),
            generator.model()
        );
    } else {
        println!(
            "   ⚠️  AI backend: {} at {} is not responding (model: {})",
            generator.backend_name(),
            generator.host(),
            generator.model()
        );
    }

    println!();
    Ok(())
}
