//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, build_generator)
//! - `categories` - Category commands (list, add)
//! - `transactions` - Transaction commands (list, add, suggest)
//! - `summary` - Month totals and balance
//! - `insights` - AI spending insights
//! - `status` - Ledger and AI backend status
//! - `serve` - Web server command

pub mod categories;
pub mod core;
pub mod insights;
pub mod serve;
pub mod status;
pub mod summary;
pub mod transactions;

// Re-export command functions for main.rs
pub use categories::*;
pub use self::core::*;
pub use insights::*;
pub use serve::*;
pub use status::*;
pub use summary::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
