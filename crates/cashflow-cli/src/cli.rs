//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Cashflow - Personal finance ledger with AI spending insights
#[derive(Parser)]
#[command(name = "cashflow")]
#[command(about = "Personal finance ledger with AI spending insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "cashflow.db", global = true)]
    pub db: PathBuf,

    /// Configuration file (overrides CASHFLOW_CONFIG and the data-dir file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Month totals and the all-time balance (defaults to this month)
    Summary {
        #[command(subcommand)]
        action: Option<SummaryAction>,
    },

    /// Generate AI spending insights for the current period
    Insights {
        /// Period: weekly, monthly, quarterly, yearly
        #[arg(short, long, default_value = "monthly")]
        period: String,

        /// Reference day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Print the prompt instead of calling the model
        #[arg(long)]
        show_prompt: bool,
    },

    /// Show ledger and AI backend status
    Status,

    /// Start the web server
    Serve {
        /// Port to listen on (defaults to [server] port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to [server] host)
        #[arg(long)]
        host: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories
    List {
        /// Only income or expense categories
        #[arg(short = 't', long = "type")]
        category_type: Option<String>,
    },

    /// Add a category
    Add {
        /// Category name
        name: String,

        /// income or expense
        #[arg(short = 't', long = "type")]
        category_type: String,
    },
}

#[derive(Subcommand)]
pub enum SummaryAction {
    /// All-time income minus expense
    Balance,

    /// Income, expense and net for one month
    Monthly {
        /// Month number 1-12 (defaults to this month)
        #[arg(long)]
        month: Option<u32>,

        /// Year (defaults to this year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Per-category totals for one month
    Categories {
        /// Month number 1-12 (defaults to this month)
        #[arg(long)]
        month: Option<u32>,

        /// Year (defaults to this year)
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions in a date range (defaults to this month)
    List {
        /// First day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Record a transaction
    Add {
        /// income or expense
        #[arg(short = 't', long = "type")]
        transaction_type: String,

        /// Positive amount with at most 2 decimal places
        #[arg(short, long)]
        amount: Decimal,

        /// Category name or ID
        #[arg(short, long)]
        category: String,

        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Free-text description
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },

    /// Ask the AI backend which category fits a description
    Suggest {
        /// Transaction description
        description: String,

        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: String,
    },
}
