//! Period-over-period spending insights
//!
//! ## Pipeline
//!
//! - **Orchestrator** - data-sufficiency gate and wiring
//! - **Prompt** - deterministic rendering of the analysis payload
//! - **Parsing** - tolerant conversion of free text into insight lines
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cashflow_core::insights::InsightOrchestrator;
//!
//! let orchestrator = InsightOrchestrator::new(&db, &generator);
//! let insights = orchestrator.get_insights("monthly").await?;
//! ```

pub mod orchestrator;
pub mod parsing;
pub mod prompt;

pub use orchestrator::{InsightOrchestrator, InsightPlan, MIN_TRANSACTIONS_FOR_ANALYSIS};
pub use parsing::{parse_insights, parse_response, summarize, NO_PATTERNS_SUMMARY};
pub use prompt::build_prompt;
