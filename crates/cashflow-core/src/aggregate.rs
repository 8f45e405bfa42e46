//! Transaction aggregation
//!
//! Derives every view the insight prompt needs for one date range in a single
//! pass over the transactions: income/expense totals, per-category totals,
//! expenses by weekday, and per-category counts and average ticket size.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::Result;
use crate::models::{CategorySummary, DateRange, Transaction, TransactionType, WeekdayExpenses};
use crate::money::round_money;
use crate::source::TransactionSource;

/// Aggregated views over one date range
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodAggregate {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// One entry per named category with at least one transaction, by name
    pub category_summaries: Vec<CategorySummary>,
    pub expenses_by_weekday: WeekdayExpenses,
    /// Income and expense transactions together
    pub transaction_count_by_category: BTreeMap<String, u64>,
    /// Mean of all transaction amounts in the category, rounded half-up to cents
    pub average_amount_by_category: BTreeMap<String, Decimal>,
}

#[derive(Default)]
struct CategoryAccumulator {
    income: Decimal,
    expense: Decimal,
    count: u64,
    sum: Decimal,
}

/// Aggregate a list of transactions (no date filtering)
///
/// Transactions without a category name count toward the totals and the
/// weekday map but are left out of every per-category view.
pub fn aggregate(transactions: &[Transaction]) -> PeriodAggregate {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut expenses_by_weekday = WeekdayExpenses::default();
    let mut categories: BTreeMap<String, CategoryAccumulator> = BTreeMap::new();

    for tx in transactions {
        match tx.transaction_type {
            TransactionType::Income => total_income += tx.amount,
            TransactionType::Expense => {
                total_expense += tx.amount;
                expenses_by_weekday.add(tx.transaction_date.weekday(), tx.amount);
            }
        }

        let Some(name) = tx.category_name() else {
            continue;
        };

        let acc = categories.entry(name.to_string()).or_default();
        match tx.transaction_type {
            TransactionType::Income => acc.income += tx.amount,
            TransactionType::Expense => acc.expense += tx.amount,
        }
        acc.count += 1;
        acc.sum += tx.amount;
    }

    let mut category_summaries = Vec::with_capacity(categories.len());
    let mut transaction_count_by_category = BTreeMap::new();
    let mut average_amount_by_category = BTreeMap::new();

    for (name, acc) in categories {
        category_summaries.push(CategorySummary {
            category_name: name.clone(),
            total_income: acc.income,
            total_expense: acc.expense,
        });
        transaction_count_by_category.insert(name.clone(), acc.count);
        average_amount_by_category.insert(name, round_money(acc.sum / Decimal::from(acc.count)));
    }

    PeriodAggregate {
        total_income,
        total_expense,
        category_summaries,
        expenses_by_weekday,
        transaction_count_by_category,
        average_amount_by_category,
    }
}

/// Runs [`aggregate`] over whatever a [`TransactionSource`] holds for a range
pub struct TransactionAggregator<'a, S: TransactionSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: TransactionSource + ?Sized> TransactionAggregator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Aggregate every transaction dated inside `range`
    pub fn aggregate_range(&self, range: DateRange) -> Result<PeriodAggregate> {
        let transactions = self
            .source
            .find_transactions_in_range(range.start, range.end)?;

        debug!(
            start = %range.start,
            end = %range.end,
            transactions = transactions.len(),
            "Aggregating transactions"
        );

        Ok(aggregate(&transactions))
    }
}
