//! Spending insight use case
//!
//! Gates on how much data the current period holds and on whether AI is
//! switched on, then either answers with a canned response or runs
//! assemble -> prompt -> generate -> parse.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::ai::TextGenerator;
use crate::analysis::AnalysisAssembler;
use crate::error::{Error, Result};
use crate::models::SpendingInsights;
use crate::period::Granularity;
use crate::source::TransactionSource;

use super::parsing::parse_response;
use super::prompt::build_prompt;

/// Fewest current-period transactions worth sending to a model
pub const MIN_TRANSACTIONS_FOR_ANALYSIS: usize = 3;

/// What a request will do, decided before any model call
#[derive(Debug, Clone, PartialEq)]
pub enum InsightPlan {
    /// Not enough data; answer without a model
    Canned(SpendingInsights),
    /// Enough data; this prompt goes to the model
    Generate { period: Granularity, prompt: String },
}

/// Top-level insight pipeline over a transaction source and a generator
pub struct InsightOrchestrator<'a, S: ?Sized, G: ?Sized> {
    source: &'a S,
    generator: &'a G,
}

impl<'a, S, G> InsightOrchestrator<'a, S, G>
where
    S: TransactionSource + ?Sized,
    G: TextGenerator + ?Sized,
{
    pub fn new(source: &'a S, generator: &'a G) -> Self {
        Self { source, generator }
    }

    /// Insights for the period containing today (local time)
    pub async fn get_insights(&self, period_label: &str) -> Result<SpendingInsights> {
        self.get_insights_at(period_label, Local::now().date_naive())
            .await
    }

    /// Insights for the period containing `reference`
    pub async fn get_insights_at(
        &self,
        period_label: &str,
        reference: NaiveDate,
    ) -> Result<SpendingInsights> {
        match self.plan(period_label, reference)? {
            InsightPlan::Canned(insights) => Ok(insights),
            InsightPlan::Generate { period, prompt } => self.generate(period, &prompt).await,
        }
    }

    /// Decide between a canned answer and a prompt, reading the source only
    pub fn plan(&self, period_label: &str, reference: NaiveDate) -> Result<InsightPlan> {
        let period = Granularity::from_label(period_label);
        let current = period.current_period(reference);
        let count = self
            .source
            .find_transactions_in_range(current.start, current.end)?
            .len();

        debug!(
            period = %period,
            start = %current.start,
            end = %current.end,
            transactions = count,
            "Checking data sufficiency"
        );

        if count == 0 {
            return Ok(InsightPlan::Canned(SpendingInsights::no_transactions(
                period.as_str(),
            )));
        }
        if count < MIN_TRANSACTIONS_FOR_ANALYSIS {
            return Ok(InsightPlan::Canned(SpendingInsights::insufficient_data(
                period.as_str(),
            )));
        }

        if !self.generator.is_enabled() {
            debug!(period = %period, "AI disabled, skipping analysis");
            return Ok(InsightPlan::Canned(SpendingInsights::disabled(
                period.as_str(),
            )));
        }

        let data = AnalysisAssembler::new(self.source).assemble(period, reference)?;
        Ok(InsightPlan::Generate {
            period,
            prompt: build_prompt(&data),
        })
    }

    async fn generate(&self, period: Granularity, prompt: &str) -> Result<SpendingInsights> {
        info!(
            period = %period,
            model = %self.generator.model(),
            host = %self.generator.host(),
            "Requesting spending insights"
        );

        let raw = self.generator.generate(prompt).await.map_err(|e| {
            warn!(period = %period, error = %e, "Insight generation failed");
            e
        })?;

        let raw = raw.trim();
        if raw.is_empty() {
            warn!(period = %period, "Model returned an empty response");
            return Err(Error::Generation("Empty response from model".into()));
        }

        let (insights, summary) = parse_response(raw);
        debug!(period = %period, insights = insights.len(), "Parsed insights");

        Ok(SpendingInsights {
            insights,
            period: period.as_str().to_string(),
            summary,
            confidence: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{DisabledGenerator, MockGenerator};
    use crate::insights::parsing::NO_PATTERNS_SUMMARY;
    use crate::models::{
        Category, Transaction, TransactionType, CONFIDENCE_DISABLED,
        CONFIDENCE_INSUFFICIENT_DATA, CONFIDENCE_NO_TRANSACTIONS,
    };
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// `n` expenses on consecutive days starting 2024-05-02
    fn transactions(n: i64) -> Vec<Transaction> {
        (0..n)
            .map(|i| Transaction {
                id: i + 1,
                transaction_type: TransactionType::Expense,
                amount: dec!(12.50),
                description: format!("purchase {}", i),
                category: Some(Category {
                    id: 1,
                    name: "Food".to_string(),
                    category_type: TransactionType::Expense,
                    created_at: Utc::now(),
                }),
                transaction_date: date(2024, 5, 2) + chrono::Duration::days(i),
                created_at: Utc::now(),
            })
            .collect()
    }

    fn reference() -> NaiveDate {
        date(2024, 5, 20)
    }

    #[tokio::test]
    async fn test_no_transactions_skips_generator() {
        let source = transactions(0);
        let generator = MockGenerator::new();
        let orchestrator = InsightOrchestrator::new(&source, &generator);

        let result = orchestrator
            .get_insights_at("monthly", reference())
            .await
            .unwrap();
        assert_eq!(result.confidence, CONFIDENCE_NO_TRANSACTIONS);
        assert_eq!(result.period, "monthly");
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_two_transactions_insufficient() {
        let source = transactions(2);
        let generator = MockGenerator::new();
        let orchestrator = InsightOrchestrator::new(&source, &generator);

        let result = orchestrator
            .get_insights_at("monthly", reference())
            .await
            .unwrap();
        assert_eq!(result.confidence, CONFIDENCE_INSUFFICIENT_DATA);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_three_transactions_calls_generator_once() {
        let source = transactions(3);
        let generator = MockGenerator::with_response("1. Food dominates\n2. Cook at home\n");
        let orchestrator = InsightOrchestrator::new(&source, &generator);

        let result = orchestrator
            .get_insights_at("monthly", reference())
            .await
            .unwrap();

        assert_eq!(generator.call_count(), 1);
        assert!(generator.prompts()[0].contains("monthly"));
        assert_eq!(result.insights, vec!["Food dominates", "Cook at home"]);
        assert_eq!(result.summary, "Food dominates");
        assert_eq!(result.confidence, "1. Food dominates\n2. Cook at home");
        assert!(!result.is_canned());
    }

    #[tokio::test]
    async fn test_transactions_outside_period_do_not_count() {
        // Five April transactions, reference in May
        let source: Vec<Transaction> = transactions(5)
            .into_iter()
            .map(|mut t| {
                t.transaction_date = date(2024, 4, 10);
                t
            })
            .collect();
        let generator = MockGenerator::new();
        let orchestrator = InsightOrchestrator::new(&source, &generator);

        let result = orchestrator
            .get_insights_at("monthly", reference())
            .await
            .unwrap();
        assert_eq!(result.confidence, CONFIDENCE_NO_TRANSACTIONS);
    }

    #[tokio::test]
    async fn test_unknown_label_uses_monthly() {
        let source = transactions(3);
        let generator = MockGenerator::new();
        let orchestrator = InsightOrchestrator::new(&source, &generator);

        let result = orchestrator
            .get_insights_at("Fortnightly", reference())
            .await
            .unwrap();
        assert_eq!(result.period, "monthly");
        assert!(generator.prompts()[0].contains("ANALYSIS PERIOD: monthly (2024-05-01 to 2024-05-31)"));
    }

    #[tokio::test]
    async fn test_blank_response_is_error() {
        let source = transactions(3);
        let generator = MockGenerator::with_response("  \n \n");
        let orchestrator = InsightOrchestrator::new(&source, &generator);

        let err = orchestrator
            .get_insights_at("monthly", reference())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let source = transactions(4);
        let generator = MockGenerator::failing("timeout");
        let orchestrator = InsightOrchestrator::new(&source, &generator);

        let err = orchestrator
            .get_insights_at("weekly", date(2024, 5, 3))
            .await
            .unwrap_err();
        assert!(err.is_generation_failure());
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_noise_only_response_degrades() {
        let source = transactions(3);
        let generator = MockGenerator::with_response("1.\n2.\n");
        let orchestrator = InsightOrchestrator::new(&source, &generator);

        let result = orchestrator
            .get_insights_at("monthly", reference())
            .await
            .unwrap();
        assert!(result.insights.is_empty());
        assert_eq!(result.summary, NO_PATTERNS_SUMMARY);
    }

    #[tokio::test]
    async fn test_disabled_generator_answers_with_disabled_marker() {
        let source = transactions(3);
        let generator = DisabledGenerator;
        let orchestrator = InsightOrchestrator::new(&source, &generator);

        let result = orchestrator
            .get_insights_at("monthly", reference())
            .await
            .unwrap();
        assert_eq!(result.insights, vec!["AI insights are disabled"]);
        assert_eq!(result.summary, "AI analysis unavailable");
        assert_eq!(result.confidence, CONFIDENCE_DISABLED);
        assert_eq!(result.period, "monthly");
        assert!(result.is_canned());
    }

    #[tokio::test]
    async fn test_data_gate_runs_before_disabled_check() {
        let source = transactions(1);
        let generator = DisabledGenerator;
        let orchestrator = InsightOrchestrator::new(&source, &generator);

        let result = orchestrator
            .get_insights_at("monthly", reference())
            .await
            .unwrap();
        assert_eq!(result.confidence, CONFIDENCE_INSUFFICIENT_DATA);
    }

    #[test]
    fn test_plan_exposes_prompt() {
        let source = transactions(3);
        let generator = MockGenerator::new();
        let orchestrator = InsightOrchestrator::new(&source, &generator);

        match orchestrator.plan("quarterly", reference()).unwrap() {
            InsightPlan::Generate { period, prompt } => {
                assert_eq!(period, Granularity::Quarterly);
                assert!(prompt.contains("ANALYSIS PERIOD: quarterly (2024-04-01 to 2024-06-30)"));
            }
            other => panic!("expected prompt, got {:?}", other),
        }
        assert_eq!(generator.call_count(), 0);
    }
}
