//! Transaction query seam
//!
//! The insight pipeline only ever reads transactions by date range. Anything
//! that can answer that question (the SQLite ledger, an in-memory list in tests)
//! can feed it.

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::Transaction;

/// Read-only access to transactions by date
pub trait TransactionSource: Send + Sync {
    /// Transactions dated within `start..=end`, ordered by date then id
    ///
    /// Returns an empty list when nothing matches, including `start == end`.
    fn find_transactions_in_range(&self, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Transaction>>;
}

impl TransactionSource for Vec<Transaction> {
    fn find_transactions_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let mut found: Vec<Transaction> = self
            .iter()
            .filter(|t| start <= t.transaction_date && t.transaction_date <= end)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.transaction_date
                .cmp(&b.transaction_date)
                .then(a.id.cmp(&b.id))
        });
        Ok(found)
    }
}
