//! Analysis payload assembly
//!
//! Resolves the current and previous periods and aggregates each one
//! independently. No cross-period math happens here; percentage deltas are
//! rendered later by the prompt builder.

use chrono::NaiveDate;
use tracing::debug;

use crate::aggregate::TransactionAggregator;
use crate::error::Result;
use crate::models::TransactionAnalysisData;
use crate::period::Granularity;
use crate::source::TransactionSource;

/// Builds a [`TransactionAnalysisData`] for one insight request
pub struct AnalysisAssembler<'a, S: TransactionSource + ?Sized> {
    aggregator: TransactionAggregator<'a, S>,
}

impl<'a, S: TransactionSource + ?Sized> AnalysisAssembler<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            aggregator: TransactionAggregator::new(source),
        }
    }

    /// Collect current and previous period views for `granularity`, with
    /// `reference` as "today"
    pub fn assemble(
        &self,
        granularity: Granularity,
        reference: NaiveDate,
    ) -> Result<TransactionAnalysisData> {
        let current = granularity.current_period(reference);
        let previous = granularity.previous_period(reference);

        debug!(
            period = %granularity,
            current = %current,
            previous = %previous,
            "Assembling analysis data"
        );

        let now = self.aggregator.aggregate_range(current)?;
        let before = self.aggregator.aggregate_range(previous)?;

        Ok(TransactionAnalysisData {
            current,
            previous,
            period: granularity.as_str().to_string(),
            total_income: now.total_income,
            total_expense: now.total_expense,
            previous_period_income: before.total_income,
            previous_period_expense: before.total_expense,
            category_summaries: now.category_summaries,
            previous_category_summaries: before.category_summaries,
            expenses_by_weekday: now.expenses_by_weekday,
            transaction_count_by_category: now.transaction_count_by_category,
            average_amount_by_category: now.average_amount_by_category,
        })
    }
}
