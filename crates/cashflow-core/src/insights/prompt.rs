//! Insight prompt rendering
//!
//! Pure and deterministic: the same analysis data always renders the same
//! prompt. Every amount uses [`format_amount`] (2 places, half-up).

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt::Write;

use rust_decimal::Decimal;

use crate::models::{weekday_name, TransactionAnalysisData};
use crate::money::{format_amount, format_percentage, percentage_change};

/// Maximum entries in each ranked category section
pub const TOP_CATEGORIES: usize = 10;

/// Render the analysis payload into the insight-generation prompt
pub fn build_prompt(data: &TransactionAnalysisData) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are a personal finance advisor analyzing spending patterns. ");
    prompt.push_str(
        "Based on the transaction data below, provide 5-8 actionable insights about spending behavior.\n\n",
    );

    // writeln! into a String cannot fail
    let _ = writeln!(
        prompt,
        "ANALYSIS PERIOD: {} ({} to {})\n",
        data.period, data.current.start, data.current.end
    );

    prompt.push_str("CURRENT PERIOD SUMMARY:\n");
    let _ = writeln!(prompt, "- Total Income: ${}", format_amount(data.total_income));
    let _ = writeln!(prompt, "- Total Expense: ${}", format_amount(data.total_expense));
    let _ = writeln!(prompt, "- Net Balance: ${}\n", format_amount(data.net_balance()));

    if data.has_previous_activity() {
        let income_change = percentage_change(data.previous_period_income, data.total_income);
        let expense_change = percentage_change(data.previous_period_expense, data.total_expense);

        prompt.push_str("PREVIOUS PERIOD COMPARISON:\n");
        let _ = writeln!(
            prompt,
            "- Previous Income: ${} ({})",
            format_amount(data.previous_period_income),
            format_percentage(income_change)
        );
        let _ = writeln!(
            prompt,
            "- Previous Expense: ${} ({})\n",
            format_amount(data.previous_period_expense),
            format_percentage(expense_change)
        );
    }

    let mut spending: Vec<_> = data
        .category_summaries
        .iter()
        .filter(|c| c.total_expense > Decimal::ZERO)
        .collect();
    if !spending.is_empty() {
        // Stable sort keeps name order among equal expense totals
        spending.sort_by_key(|c| Reverse(c.total_expense));

        prompt.push_str("TOP SPENDING CATEGORIES (Current Period):\n");
        for category in spending.into_iter().take(TOP_CATEGORIES) {
            let _ = writeln!(
                prompt,
                "- {}: ${}",
                category.category_name,
                format_amount(category.total_expense)
            );
        }
        prompt.push('\n');
    }

    prompt.push_str("SPENDING PATTERNS BY DAY OF WEEK:\n");
    for (day, amount) in data.expenses_by_weekday.iter() {
        let _ = writeln!(prompt, "- {}: ${}", weekday_name(day), format_amount(amount));
    }
    prompt.push('\n');

    if !data.transaction_count_by_category.is_empty() {
        prompt.push_str("TRANSACTION FREQUENCY:\n");
        for (name, count) in top_by_value(&data.transaction_count_by_category) {
            let _ = writeln!(prompt, "- {}: {} transactions", name, count);
        }
        prompt.push('\n');
    }

    if !data.average_amount_by_category.is_empty() {
        prompt.push_str("AVERAGE TRANSACTION AMOUNTS:\n");
        for (name, average) in top_by_value(&data.average_amount_by_category) {
            let _ = writeln!(
                prompt,
                "- {}: ${} per transaction",
                name,
                format_amount(average)
            );
        }
        prompt.push('\n');
    }

    prompt.push_str("Provide insights focusing on:\n");
    prompt.push_str("1. Trends (period-over-period changes)\n");
    prompt.push_str("2. Patterns (day-of-week, frequency)\n");
    prompt.push_str("3. Anomalies (unusual spikes)\n");
    prompt.push_str("4. Comparisons (category vs category)\n");
    prompt.push_str("5. Recommendations (budget suggestions)\n\n");

    prompt.push_str("Format: One insight per line, be specific with percentages and amounts.\n");
    prompt.push_str("Start each insight directly without numbering or bullet points.");

    prompt
}

/// Top entries by value, descending; ties keep name order
fn top_by_value<V: Ord + Copy>(map: &BTreeMap<String, V>) -> Vec<(&str, V)> {
    let mut entries: Vec<(&str, V)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by_key(|(_, value)| Reverse(*value));
    entries.truncate(TOP_CATEGORIES);
    entries
}
