//! Cashflow Core Library
//!
//! Shared functionality for the Cashflow personal finance ledger:
//! - SQLite ledger storage for categories and transactions
//! - Calendar period resolution (weekly, monthly, quarterly, yearly)
//! - Multi-view transaction aggregation for the current and previous period
//! - Month summaries and the all-time balance
//! - Spending insight pipeline (prompt rendering, response parsing, gating)
//! - AI category suggestions for new transactions
//! - Pluggable text-generation backends (Ollama, OpenAI-compatible)
//! - Layered configuration

pub mod aggregate;
pub mod ai;
pub mod analysis;
pub mod categorize;
pub mod config;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod money;
pub mod period;
pub mod source;
pub mod summary;

/// Test utilities including mock LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{aggregate, PeriodAggregate, TransactionAggregator};
pub use ai::{
    DisabledGenerator, GeneratorClient, MockGenerator, OllamaGenerator, OpenAICompatibleGenerator,
    TextGenerator,
};
pub use analysis::AnalysisAssembler;
pub use categorize::{CategorySuggester, CategorySuggestion};
pub use config::{AiConfig, BackendKind, Config, ServerSettings};
pub use db::Database;
pub use error::{Error, Result};
pub use insights::{InsightOrchestrator, InsightPlan};
pub use period::Granularity;
pub use source::TransactionSource;
pub use summary::{LedgerSummary, MonthlySummary};
