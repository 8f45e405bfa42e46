//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use rust_decimal::Decimal;

use super::categories::optional_category_from_row;
use super::{parse_amount, parse_date, parse_datetime, Database, DATE_FORMAT};
use crate::error::{Error, Result};
use crate::money::{round_money, MONEY_SCALE};
use crate::models::{NewTransaction, Transaction, TransactionType};
use crate::source::TransactionSource;

const TRANSACTION_COLUMNS: &str = "t.id, t.type, t.amount, t.description, t.transaction_date, \
     t.created_at, c.id, c.name, c.type, c.created_at";

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let type_str: String = row.get(1)?;
    let amount_str: String = row.get(2)?;
    let date_str: String = row.get(4)?;
    let created_at_str: String = row.get(5)?;

    Ok(Transaction {
        id: row.get(0)?,
        transaction_type: type_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, e.into())
        })?,
        amount: parse_amount(2, &amount_str)?,
        description: row.get(3)?,
        transaction_date: parse_date(4, &date_str)?,
        created_at: parse_datetime(&created_at_str),
        category: optional_category_from_row(row, 6)?,
    })
}

impl Database {
    /// Record a transaction
    ///
    /// The amount must be positive with at most 2 decimal places, and the
    /// category must exist with the same type as the transaction.
    pub fn create_transaction(&self, tx: &NewTransaction) -> Result<Transaction> {
        if tx.amount <= Decimal::ZERO {
            return Err(Error::InvalidData(format!(
                "Amount must be greater than zero, got {}",
                tx.amount
            )));
        }
        if tx.amount.normalize().scale() > MONEY_SCALE {
            return Err(Error::InvalidData(format!(
                "Amount must have at most {} decimal places, got {}",
                MONEY_SCALE, tx.amount
            )));
        }

        let category = self
            .get_category(tx.category_id)?
            .ok_or_else(|| Error::NotFound(format!("Category {}", tx.category_id)))?;
        if category.category_type != tx.transaction_type {
            return Err(Error::InvalidData(format!(
                "Category '{}' is {} but the transaction is {}",
                category.name, category.category_type, tx.transaction_type
            )));
        }

        let mut amount = tx.amount;
        amount.rescale(MONEY_SCALE);

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO transactions (type, amount, description, category_id, transaction_date)
             VALUES (?, ?, ?, ?, ?)",
            params![
                tx.transaction_type.as_str(),
                amount.to_string(),
                tx.description.trim(),
                tx.category_id,
                tx.transaction_date.format(DATE_FORMAT).to_string(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// Get a transaction by ID, with its category
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transactions t
             LEFT JOIN categories c ON c.id = t.category_id
             WHERE t.id = ?",
            TRANSACTION_COLUMNS
        );
        let tx = conn
            .query_row(&sql, params![id], transaction_from_row)
            .optional()?;

        Ok(tx)
    }

    /// Transactions dated within `start..=end`, ordered by date then id
    pub fn list_transactions(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        if start > end {
            return Err(Error::InvalidData(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }

        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transactions t
             LEFT JOIN categories c ON c.id = t.category_id
             WHERE t.transaction_date BETWEEN ? AND ?
             ORDER BY t.transaction_date, t.id",
            TRANSACTION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let transactions = stmt
            .query_map(
                params![
                    start.format(DATE_FORMAT).to_string(),
                    end.format(DATE_FORMAT).to_string()
                ],
                transaction_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// All-time income minus all-time expense, to cents
    pub fn balance(&self) -> Result<Decimal> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT type, amount FROM transactions")?;
        let mut rows = stmt.query([])?;

        let mut balance = Decimal::ZERO;
        while let Some(row) = rows.next()? {
            let type_str: String = row.get(0)?;
            let amount_str: String = row.get(1)?;
            let amount = parse_amount(1, &amount_str)?;
            match type_str.parse::<TransactionType>().map_err(Error::InvalidData)? {
                TransactionType::Income => balance += amount,
                TransactionType::Expense => balance -= amount,
            }
        }

        Ok(round_money(balance))
    }

    /// Total number of transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl TransactionSource for Database {
    fn find_transactions_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        // An inverted range simply matches nothing
        if start > end {
            return Ok(Vec::new());
        }
        self.list_transactions(start, end)
    }
}
