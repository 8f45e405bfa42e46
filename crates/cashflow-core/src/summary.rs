//! Ledger summaries
//!
//! Plain totals for one calendar month, with no model involved. Balances and
//! totals are reported to cents, rounded half-up.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::TransactionAggregator;
use crate::error::{Error, Result};
use crate::models::{CategorySummary, DateRange};
use crate::money::round_money;
use crate::period::calendar_month;
use crate::source::TransactionSource;

/// Income, expense and net for one month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_balance: Decimal,
}

/// Month summaries over any [`TransactionSource`]
pub struct LedgerSummary<'a, S: TransactionSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: TransactionSource + ?Sized> LedgerSummary<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Totals for `month` (1-12) of `year`
    pub fn monthly(&self, year: i32, month: u32) -> Result<MonthlySummary> {
        let range = month_of(year, month)?;
        let totals = TransactionAggregator::new(self.source).aggregate_range(range)?;

        Ok(MonthlySummary {
            total_income: round_money(totals.total_income),
            total_expense: round_money(totals.total_expense),
            net_balance: round_money(totals.total_income - totals.total_expense),
        })
    }

    /// Per-category totals for `month` (1-12) of `year`, by category name
    pub fn categories(&self, year: i32, month: u32) -> Result<Vec<CategorySummary>> {
        let range = month_of(year, month)?;
        let totals = TransactionAggregator::new(self.source).aggregate_range(range)?;

        Ok(totals
            .category_summaries
            .into_iter()
            .map(|summary| CategorySummary {
                total_income: round_money(summary.total_income),
                total_expense: round_money(summary.total_expense),
                ..summary
            })
            .collect())
    }
}

fn month_of(year: i32, month: u32) -> Result<DateRange> {
    calendar_month(year, month).ok_or_else(|| {
        Error::InvalidData(format!("Invalid month: {}-{:02}", year, month))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Transaction, TransactionType};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn tx(kind: TransactionType, amount: Decimal, category: &str, on: NaiveDate) -> Transaction {
        Transaction {
            id: 0,
            transaction_type: kind,
            amount,
            description: String::new(),
            category: Some(Category {
                id: 0,
                name: category.to_string(),
                category_type: kind,
                created_at: Utc::now(),
            }),
            transaction_date: on,
            created_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            tx(TransactionType::Income, dec!(2500.00), "Salary", date(2024, 5, 1)),
            tx(TransactionType::Expense, dec!(900.00), "Rent", date(2024, 5, 2)),
            tx(TransactionType::Expense, dec!(45.25), "Food", date(2024, 5, 31)),
            tx(TransactionType::Expense, dec!(14.75), "Food", date(2024, 5, 12)),
            // Outside May
            tx(TransactionType::Expense, dec!(80.00), "Food", date(2024, 4, 30)),
            tx(TransactionType::Income, dec!(100.00), "Salary", date(2024, 6, 1)),
        ]
    }

    #[test]
    fn test_monthly_totals_cover_whole_month() {
        let source = ledger();
        let summary = LedgerSummary::new(&source).monthly(2024, 5).unwrap();

        assert_eq!(summary.total_income, dec!(2500.00));
        assert_eq!(summary.total_expense, dec!(960.00));
        assert_eq!(summary.net_balance, dec!(1540.00));
        assert_eq!(summary.net_balance.to_string(), "1540.00");
    }

    #[test]
    fn test_monthly_empty_month_is_zero() {
        let source = ledger();
        let summary = LedgerSummary::new(&source).monthly(2023, 1).unwrap();
        assert_eq!(summary, MonthlySummary::default());
    }

    #[test]
    fn test_categories_by_name() {
        let source = ledger();
        let categories = LedgerSummary::new(&source).categories(2024, 5).unwrap();

        let names: Vec<_> = categories.iter().map(|c| c.category_name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Rent", "Salary"]);
        assert_eq!(categories[0].total_expense, dec!(60.00));
        assert_eq!(categories[0].total_income, Decimal::ZERO);
        assert_eq!(categories[2].total_income, dec!(2500.00));
    }

    #[test]
    fn test_invalid_month_rejected() {
        let source = ledger();
        let summary = LedgerSummary::new(&source);
        assert!(matches!(summary.monthly(2024, 13), Err(Error::InvalidData(_))));
        assert!(matches!(summary.categories(2024, 0), Err(Error::InvalidData(_))));
    }
}
