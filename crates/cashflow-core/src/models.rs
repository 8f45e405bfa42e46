//! Data models for Cashflow

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

/// Direction of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!(
                "Unknown transaction type: {} (valid: income, expense)",
                s
            )),
        }
    }
}

/// A category transactions are filed under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    pub created_at: DateTime<Utc>,
}

/// Category to be created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

/// A ledger transaction
///
/// `amount` is always strictly positive; `transaction_type` carries the sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub category: Option<Category>,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Category name, or None when the transaction has no usable category
    pub fn category_name(&self) -> Option<&str> {
        self.category
            .as_ref()
            .map(|c| c.name.trim())
            .filter(|name| !name.is_empty())
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

/// Transaction to be created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub category_id: i64,
    pub transaction_date: NaiveDate,
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Income and expense totals for one category over one date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_name: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

/// Weekdays in calendar order, Monday first
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Expense total per weekday; every weekday is always present
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekdayExpenses([Decimal; 7]);

impl WeekdayExpenses {
    pub fn get(&self, day: Weekday) -> Decimal {
        self.0[day.num_days_from_monday() as usize]
    }

    pub fn add(&mut self, day: Weekday, amount: Decimal) {
        self.0[day.num_days_from_monday() as usize] += amount;
    }

    /// All seven weekdays, Monday to Sunday
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, Decimal)> + '_ {
        WEEKDAYS.iter().map(move |day| (*day, self.get(*day)))
    }

    pub fn total(&self) -> Decimal {
        self.0.iter().copied().sum()
    }
}

impl Serialize for WeekdayExpenses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (day, amount) in self.iter() {
            map.serialize_entry(weekday_name(day), &amount)?;
        }
        map.end()
    }
}

/// Everything the insight prompt needs for one request
///
/// Built once per request from two independent aggregation passes (current and
/// previous period). Cross-period math such as percentage deltas is left to
/// the prompt builder.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionAnalysisData {
    pub current: DateRange,
    pub previous: DateRange,
    pub period: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub previous_period_income: Decimal,
    pub previous_period_expense: Decimal,
    pub category_summaries: Vec<CategorySummary>,
    pub previous_category_summaries: Vec<CategorySummary>,
    pub expenses_by_weekday: WeekdayExpenses,
    pub transaction_count_by_category: BTreeMap<String, u64>,
    pub average_amount_by_category: BTreeMap<String, Decimal>,
}

impl TransactionAnalysisData {
    pub fn net_balance(&self) -> Decimal {
        self.total_income - self.total_expense
    }

    pub fn has_previous_activity(&self) -> bool {
        !self.previous_period_income.is_zero() || !self.previous_period_expense.is_zero()
    }
}

/// Confidence marker for a period with no transactions
pub const CONFIDENCE_NO_TRANSACTIONS: &str = "no_transactions";

/// Confidence marker for a period with too few transactions to analyze
pub const CONFIDENCE_INSUFFICIENT_DATA: &str = "insufficient_data";

/// Confidence marker when AI features are switched off
pub const CONFIDENCE_DISABLED: &str = "disabled";

/// Result of an insight request
///
/// `confidence` is either one of the canned markers above or, when a model was
/// consulted, the raw text it returned (kept for auditability).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingInsights {
    pub insights: Vec<String>,
    pub period: String,
    pub summary: String,
    pub confidence: String,
}

impl SpendingInsights {
    pub fn no_transactions(period: &str) -> Self {
        Self {
            insights: vec![
                "No transactions found for this period. Start tracking your expenses!".to_string(),
            ],
            period: period.to_string(),
            summary: "No data available".to_string(),
            confidence: CONFIDENCE_NO_TRANSACTIONS.to_string(),
        }
    }

    pub fn insufficient_data(period: &str) -> Self {
        Self {
            insights: vec![
                "Insufficient data for analysis. Add more transactions to get insights."
                    .to_string(),
            ],
            period: period.to_string(),
            summary: "Not enough data".to_string(),
            confidence: CONFIDENCE_INSUFFICIENT_DATA.to_string(),
        }
    }

    pub fn disabled(period: &str) -> Self {
        Self {
            insights: vec!["AI insights are disabled".to_string()],
            period: period.to_string(),
            summary: "AI analysis unavailable".to_string(),
            confidence: CONFIDENCE_DISABLED.to_string(),
        }
    }

    /// True for the canned responses that never consulted a model
    pub fn is_canned(&self) -> bool {
        [
            CONFIDENCE_NO_TRANSACTIONS,
            CONFIDENCE_INSUFFICIENT_DATA,
            CONFIDENCE_DISABLED,
        ]
        .contains(&self.confidence.as_str())
    }
}
